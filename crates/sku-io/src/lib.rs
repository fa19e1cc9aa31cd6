#![deny(warnings)]

//! Import/export for the SKU planner: category and plan CSV files, YAML
//! scenario files, and CSV export of simulation reports.

use sku_core::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

pub mod categories;
pub mod export;
pub mod plan_grid;
pub mod scenario;

pub use categories::{read_categories, read_categories_file};
pub use export::{export_report, write_labor, write_pivot, write_sales, write_summary};
pub use plan_grid::{read_plan_grid, read_plan_grid_file};
pub use scenario::{load_scenario, PlanCell, ScenarioFile};

/// Errors raised while reading or writing planner files.
#[derive(Debug, Error)]
pub enum IoError {
    /// Opening, creating or writing a file failed.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A CSV row could not be interpreted.
    #[error("line {line}: {message}")]
    Row { line: u64, message: String },
    /// A row was well-formed but violates a domain rule.
    #[error("line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The scenario file is internally inconsistent.
    #[error("scenario: {0}")]
    Scenario(String),
}

pub(crate) fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

pub(crate) fn open(path: &std::path::Path) -> Result<std::fs::File, IoError> {
    std::fs::File::open(path).map_err(|source| IoError::File {
        path: path.to_path_buf(),
        source,
    })
}
