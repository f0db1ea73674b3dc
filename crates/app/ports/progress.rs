use walbench_domain::{AggregateRecord, RunRecord};

/// Receives per-run and per-strategy progress so console reporting stays out
/// of the orchestration layer.
pub trait ProgressObserver: Send + Sync {
    fn run_completed(&self, record: &RunRecord, run: u32);

    fn strategy_completed(&self, aggregate: &AggregateRecord);
}

/// Observer that reports nothing.
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn run_completed(&self, _record: &RunRecord, _run: u32) {}

    fn strategy_completed(&self, _aggregate: &AggregateRecord) {}
}
