use crate::args::MapArgs;
use crate::commands::Out;
use crate::engine::{self, Selector};
use crate::export::Exporter;
use crate::model::{Invoices, Payments};
use crate::selectors::{PlanSelector, PromptSelector};
use crate::table::Table;
use crate::{validate, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Structured result of a mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    /// Payments that produced a mapping row.
    pub mapped: usize,
    /// Payments skipped because their customer had no AR rows.
    pub skipped: usize,
    /// Where the mapping file was written.
    pub mapping_file: PathBuf,
    /// Where the AR pass-through copy was written.
    pub ar_file: PathBuf,
}

/// Runs the full pipeline: load both tables, validate schemas, allocate every payment, and commit
/// the two output files. With `--plan` the run is headless; otherwise the operator is prompted
/// for each payment. Nothing is written unless every payment has been decided.
pub fn map(out_dir: &Path, args: &MapArgs) -> Result<Out<MapSummary>> {
    let ar_table = Table::from_csv_path(args.ar())?;
    let bank_table = Table::from_csv_path(args.bank())?;
    validate::validate_tables(&ar_table, &bank_table)?;

    let invoices = Invoices::from_table(&ar_table)?;
    let payments = Payments::from_table(&bank_table)?;

    let mut selector: Box<dyn Selector> = match args.plan() {
        Some(path) => Box::new(PlanSelector::load(path)?),
        None => Box::new(PromptSelector::stdio()),
    };

    let outcome = engine::allocate(&payments, &invoices, selector.as_mut(), args.fifo())?;

    let exporter = Exporter::new(out_dir);
    exporter.commit(outcome.records(), &ar_table)?;

    let summary = MapSummary {
        mapped: outcome.records().len(),
        skipped: outcome.skipped().len(),
        mapping_file: exporter.mapping_path(),
        ar_file: exporter.ar_path(),
    };
    Ok(Out::new(
        format!(
            "Mapped {} payment(s), skipped {}. Wrote {} and {}",
            summary.mapped,
            summary.skipped,
            summary.mapping_file.display(),
            summary.ar_file.display()
        ),
        summary,
    ))
}
