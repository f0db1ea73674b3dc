pub mod procedure;
pub mod progress;
pub mod report;
pub mod row_store;
pub mod wal_metrics;

pub use procedure::{ProcedureError, UpdateProcedure};
pub use progress::{NoopProgress, ProgressObserver};
pub use report::{ReportError, ReportWriter};
pub use row_store::{RowStore, StoreError};
pub use wal_metrics::{WalMetrics, WalMetricsError};

#[cfg(test)]
pub use row_store::MockRowStore;
#[cfg(test)]
pub use wal_metrics::MockWalMetrics;
