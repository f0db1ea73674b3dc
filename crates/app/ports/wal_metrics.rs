use async_trait::async_trait;
use thiserror::Error;

use walbench_domain::WalSnapshot;

/// Server-side WAL statistics. The underlying counters are cumulative and
/// process-global, so `reset` must run before each measured region or every
/// sample is contaminated by prior runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalMetrics: Send + Sync {
    async fn reset(&self) -> Result<(), WalMetricsError>;

    /// Read the WAL sync totals accumulated since the last reset.
    async fn sample(&self) -> Result<WalSnapshot, WalMetricsError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalMetricsError {
    /// The statistics view produced no row. A measurement without WAL data
    /// is not comparable to others, so this fails the whole run.
    #[error("WAL metrics unavailable: statistics view returned no row")]
    Unavailable,
    #[error("database error: {0}")]
    Database(String),
}
