pub mod args;
mod columns;
pub mod commands;
mod engine;
mod error;
mod export;
pub mod model;
mod selectors;
mod table;
mod validate;


pub use columns::{normalize_header, REQUIRED_AR_COLUMNS, REQUIRED_BANK_COLUMNS};
pub use engine::{allocate, AllocationOutcome, Selection, Selector};
pub use error::{Error, Result};
pub use export::Exporter;
pub use selectors::{Assignment, PlanSelector, PromptSelector};
pub use table::Table;
pub use validate::SchemaError;
