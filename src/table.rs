//! A raw tabular snapshot of a CSV file.
//!
//! The original headers, their normalized forms, and the string cell values are all retained so
//! that the AR table can be re-exported field-for-field after the run.

use crate::columns::normalize_header;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;

/// Represents one input table: a header row followed by string data rows. Rows shorter than the
/// header are padded with empty cells; rows longer than the header are rejected.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    normalized: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S, R>(data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut data = data.into_iter();
        let headers: Vec<String> = match data.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => bail!("An empty data set cannot be parsed into a table"),
        };
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let len = headers.len();

        let mut rows = Vec::new();
        for (row_ix, row) in data.enumerate() {
            let mut values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.len() > len {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            values.resize(len, String::new());
            rows.push(values);
        }
        Ok(Self {
            headers,
            normalized,
            rows,
        })
    }

    /// Reads a table from a CSV file. The first row is taken as the header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Unable to open file {}", path.display()))?;
        let mut data: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.with_context(|| format!("Unable to read {}", path.display()))?;
            data.push(record.iter().map(str::to_string).collect());
        }
        Self::new(data).with_context(|| format!("Unable to parse {}", path.display()))
    }

    /// The headers exactly as they appeared in the file.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The headers after normalization, in file order.
    pub fn normalized_headers(&self) -> &[String] {
        &self.normalized
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The number of data rows (the header row is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
