use std::path::Path;

use thiserror::Error;

use walbench_domain::ReportRow;

pub trait ReportWriter: Send + Sync {
    /// Persist the ordered row set to `destination`, header first, rows in
    /// the exact order given.
    fn write(&self, rows: &[ReportRow], destination: &Path) -> Result<(), ReportError>;
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no benchmark rows to write")]
    EmptyReport,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
