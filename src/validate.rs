//! Schema validation for the two input tables.
//!
//! Validation is a hard precondition: if either table is missing a required column after
//! normalization, the run is aborted before any allocation is attempted.

use crate::columns::{REQUIRED_AR_COLUMNS, REQUIRED_BANK_COLUMNS};
use crate::table::Table;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// Returns the required names absent from `headers` after normalization, in required-list order.
pub(crate) fn missing_columns<S: AsRef<str>>(headers: &[S], required: &[&str]) -> Vec<String> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| crate::columns::normalize_header(h.as_ref()))
        .collect();
    required
        .iter()
        .filter(|r| !normalized.iter().any(|h| h == *r))
        .map(|r| r.to_string())
        .collect()
}

/// Checks both tables against their required column lists. Empty result means both are usable.
pub(crate) fn validate_tables(ar: &Table, bank: &Table) -> Result<(), SchemaError> {
    let err = SchemaError::new(
        missing_columns(ar.headers(), &REQUIRED_AR_COLUMNS),
        missing_columns(bank.headers(), &REQUIRED_BANK_COLUMNS),
    );
    if err.is_empty() {
        Ok(())
    } else {
        Err(err)
    }
}

/// A fatal validation failure: one or both input files are missing required columns. The message
/// names the missing columns per file.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct SchemaError {
    ar_missing: Vec<String>,
    bank_missing: Vec<String>,
}

impl SchemaError {
    pub fn new(ar_missing: Vec<String>, bank_missing: Vec<String>) -> Self {
        Self {
            ar_missing,
            bank_missing,
        }
    }

    /// True when neither file is missing anything.
    pub fn is_empty(&self) -> bool {
        self.ar_missing.is_empty() && self.bank_missing.is_empty()
    }

    pub fn ar_missing(&self) -> &[String] {
        &self.ar_missing
    }

    pub fn bank_missing(&self) -> &[String] {
        &self.bank_missing
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Missing required column(s): AR file: {}, bank file: {}",
            name_list(&self.ar_missing),
            name_list(&self.bank_missing)
        )
    }
}

impl StdError for SchemaError {}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        String::from("none")
    } else {
        names.join(", ")
    }
}
