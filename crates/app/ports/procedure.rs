use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use walbench_domain::AccountRow;

/// One concrete update algorithm under comparison.
///
/// Procedures are stateless pure effects: they map a row set, a database
/// handle they already hold, and a cancellation context to success or
/// failure. They never retry and release any transaction or prepared
/// statement they open on every exit path.
#[async_trait]
pub trait UpdateProcedure: Send + Sync {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    #[error("database error: {0}")]
    Database(String),
    #[error("operation cancelled")]
    Cancelled,
}
