/// Cumulative WAL fsync totals read from the server after a reset, so the
/// snapshot is equivalent to a since-reset delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WalSnapshot {
    /// Total time spent in WAL sync operations, in milliseconds.
    pub sync_time_ms: f64,
    /// Number of WAL sync operations.
    pub sync_count: i64,
}

impl WalSnapshot {
    pub fn new(sync_time_ms: f64, sync_count: i64) -> Self {
        Self {
            sync_time_ms,
            sync_count,
        }
    }
}
