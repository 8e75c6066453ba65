//! Writes the run's two artifacts: the mapping file and the AR pass-through copy.
//!
//! Nothing is written until the whole statement has been allocated; the commit writes the mapping
//! rows first and then the AR copy.

use crate::model::{MappingRecord, MAPPING_HEADERS};
use crate::table::Table;
use crate::Result;
use anyhow::Context;
use std::path::PathBuf;

pub(crate) const MAPPING_FILE: &str = "mapped_collections.csv";
pub(crate) const UPDATED_AR_FILE: &str = "updated_ar_file.csv";

/// Serializes the finished mapping records and the unmodified AR table into the output
/// directory. The directory is an explicit value supplied by the caller; there is no default
/// path state hiding in here.
#[derive(Debug, Clone)]
pub struct Exporter {
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Where the mapping file will be written.
    pub fn mapping_path(&self) -> PathBuf {
        self.out_dir.join(MAPPING_FILE)
    }

    /// Where the AR pass-through copy will be written.
    pub fn ar_path(&self) -> PathBuf {
        self.out_dir.join(UPDATED_AR_FILE)
    }

    /// Writes both artifacts: mapping rows first, then the AR copy.
    pub fn commit(&self, records: &[MappingRecord], ar: &Table) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("Unable to create directory {}", self.out_dir.display())
        })?;
        self.write_mapping(records)?;
        self.write_ar_passthrough(ar)?;
        Ok(())
    }

    fn write_mapping(&self, records: &[MappingRecord]) -> Result<()> {
        let path = self.mapping_path();
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("Unable to create file {}", path.display()))?;
        // `serialize` emits the header row with the first record, so a run in which every
        // payment was skipped needs the header written by hand
        if records.is_empty() {
            wtr.write_record(MAPPING_HEADERS)
                .with_context(|| format!("Unable to write to {}", path.display()))?;
        }
        for record in records {
            wtr.serialize(record)
                .with_context(|| format!("Unable to write to {}", path.display()))?;
        }
        wtr.flush()
            .with_context(|| format!("Unable to write to {}", path.display()))
    }

    /// Writes the AR table field-for-field: normalized headers, original cell values.
    fn write_ar_passthrough(&self, ar: &Table) -> Result<()> {
        let path = self.ar_path();
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("Unable to create file {}", path.display()))?;
        wtr.write_record(ar.normalized_headers())
            .with_context(|| format!("Unable to write to {}", path.display()))?;
        for row in ar.rows() {
            wtr.write_record(row)
                .with_context(|| format!("Unable to write to {}", path.display()))?;
        }
        wtr.flush()
            .with_context(|| format!("Unable to write to {}", path.display()))
    }
}
