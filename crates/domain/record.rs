use std::time::Duration;

use crate::strategy::StrategyKind;
use crate::wal::WalSnapshot;

/// Column order of the benchmark report file.
pub const REPORT_HEADER: [&str; 5] = [
    "mode",
    "run",
    "elapsed_seconds",
    "wal_sync_time",
    "wal_sync_count",
];

/// Outcome of one strategy execution. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub strategy: StrategyKind,
    pub elapsed: Duration,
    pub wal: WalSnapshot,
    /// The strategy's failure, if any. WAL figures are recorded even for a
    /// failed attempt.
    pub error: Option<String>,
}

impl RunRecord {
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Arithmetic means over all repetitions of one strategy. Computed only after
/// the full repetition set completes; never partial.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    pub strategy: StrategyKind,
    pub mean_elapsed_seconds: f64,
    pub mean_wal_sync_time_ms: f64,
    pub mean_wal_sync_count: f64,
}

impl AggregateRecord {
    pub fn from_runs(strategy: StrategyKind, runs: &[RunRecord]) -> Self {
        let elapsed: Vec<f64> = runs.iter().map(|r| r.elapsed.as_secs_f64()).collect();
        let sync_times: Vec<f64> = runs.iter().map(|r| r.wal.sync_time_ms).collect();
        let sync_counts: Vec<f64> = runs.iter().map(|r| r.wal.sync_count as f64).collect();
        Self {
            strategy,
            mean_elapsed_seconds: mean(&elapsed),
            mean_wal_sync_time_ms: mean(&sync_times),
            mean_wal_sync_count: mean(&sync_counts),
        }
    }
}

/// One line of the benchmark report: a numbered repetition or a per-strategy
/// average.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    Run { run: u32, record: RunRecord },
    Average(AggregateRecord),
}

impl ReportRow {
    /// Fixed-precision report fields, in `REPORT_HEADER` order. Elapsed time
    /// uses 6 decimal places, WAL sync time 3; the sync count is an integer
    /// on run rows and a 1-decimal mean on average rows.
    pub fn fields(&self) -> [String; 5] {
        match self {
            Self::Run { run, record } => [
                record.strategy.name().to_string(),
                run.to_string(),
                format!("{:.6}", record.elapsed.as_secs_f64()),
                format!("{:.3}", record.wal.sync_time_ms),
                record.wal.sync_count.to_string(),
            ],
            Self::Average(aggregate) => [
                aggregate.strategy.name().to_string(),
                "avg".to_string(),
                format!("{:.6}", aggregate.mean_elapsed_seconds),
                format!("{:.3}", aggregate.mean_wal_sync_time_ms),
                format!("{:.1}", aggregate.mean_wal_sync_count),
            ],
        }
    }
}

/// Arithmetic mean; empty input is defined as 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
