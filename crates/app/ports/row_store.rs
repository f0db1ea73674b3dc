use async_trait::async_trait;
use thiserror::Error;

use walbench_domain::AccountRow;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch the full working row set from the benchmark table, ordered by
    /// id. Always a fresh fetch; handles are never reused across runs.
    async fn fetch_all(&self) -> Result<Vec<AccountRow>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}
