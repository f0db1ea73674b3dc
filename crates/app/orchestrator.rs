use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use walbench_domain::{AggregateRecord, ReportRow, StrategyKind};

use crate::executor::{ExecutorError, SingleRunExecutor};
use crate::ports::ProgressObserver;
use crate::registry::StrategyRegistry;

/// Repetitions per strategy in a full benchmark session.
pub const DEFAULT_BENCHMARK_RUNS: u32 = 5;

/// Runs every registered strategy N times and collects the report rows.
///
/// Strategies run in registration order, repetitions 1..=N each, one average
/// row after the repetitions complete. Rows are appended in strict
/// strategy-then-repetition order, never speculatively. The first failure
/// aborts the whole session: an incomplete repetition set would make that
/// strategy's average meaningless.
pub struct BenchmarkOrchestrator {
    registry: Arc<StrategyRegistry>,
    executor: SingleRunExecutor,
    observer: Arc<dyn ProgressObserver>,
    runs_per_strategy: u32,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("strategy {strategy} run {run}: {source}")]
    Run {
        strategy: StrategyKind,
        run: u32,
        #[source]
        source: ExecutorError,
    },
    #[error("strategy {strategy} run {run} failed: {message}")]
    StrategyFailed {
        strategy: StrategyKind,
        run: u32,
        message: String,
    },
}

impl BenchmarkOrchestrator {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        executor: SingleRunExecutor,
        observer: Arc<dyn ProgressObserver>,
        runs_per_strategy: u32,
    ) -> Self {
        Self {
            registry,
            executor,
            observer,
            runs_per_strategy,
        }
    }

    pub async fn run_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReportRow>, SessionError> {
        let mut rows = Vec::new();

        for kind in self.registry.kinds() {
            let mut records = Vec::with_capacity(self.runs_per_strategy as usize);

            for run in 1..=self.runs_per_strategy {
                let record = self
                    .executor
                    .execute(kind.name(), cancel)
                    .await
                    .map_err(|source| SessionError::Run {
                        strategy: kind,
                        run,
                        source,
                    })?;

                if let Some(message) = record.error.clone() {
                    return Err(SessionError::StrategyFailed {
                        strategy: kind,
                        run,
                        message,
                    });
                }

                self.observer.run_completed(&record, run);
                records.push(record.clone());
                rows.push(ReportRow::Run { run, record });
            }

            let aggregate = AggregateRecord::from_runs(kind, &records);
            self.observer.strategy_completed(&aggregate);
            rows.push(ReportRow::Average(aggregate));
        }

        Ok(rows)
    }
}
