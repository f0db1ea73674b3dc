use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use walbench_domain::RunRecord;

use crate::ports::{RowStore, StoreError, WalMetrics, WalMetricsError};
use crate::registry::{RegistryError, StrategyRegistry};

/// Executes one run of one strategy against the full row set.
///
/// The measured region covers exactly the procedure invocation: row fetch
/// and WAL reset happen before the timer starts, the WAL sample after it
/// stops. Prepared-statement strategies prepare inside the procedure, so
/// prepare cost is included in the measurement.
pub struct SingleRunExecutor {
    registry: Arc<StrategyRegistry>,
    store: Arc<dyn RowStore>,
    wal: Arc<dyn WalMetrics>,
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("row fetch failed: {0}")]
    Store(#[from] StoreError),
    #[error("WAL metrics failed: {0}")]
    Wal(#[from] WalMetricsError),
}

impl SingleRunExecutor {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        store: Arc<dyn RowStore>,
        wal: Arc<dyn WalMetrics>,
    ) -> Self {
        Self {
            registry,
            store,
            wal,
        }
    }

    pub async fn execute(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<RunRecord, ExecutorError> {
        // Resolved before any database work so an invalid name never opens
        // a partial measurement window.
        let (kind, procedure) = self.registry.lookup(name)?;

        // Fetched fresh every run; the previous strategy mutated these rows.
        let rows = self.store.fetch_all().await?;

        self.wal.reset().await?;

        let started = Instant::now();
        let outcome = procedure.execute(&rows, cancel).await;
        let elapsed = started.elapsed();

        // Sampled whether the strategy succeeded or not; the cost of a
        // failed attempt is still part of the record.
        let wal = self.wal.sample().await?;

        Ok(RunRecord {
            strategy: kind,
            elapsed,
            wal,
            error: outcome.err().map(|e| e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use walbench_domain::{AccountRow, StrategyKind, WalSnapshot};

    use super::*;
    use crate::ports::{MockRowStore, MockWalMetrics, ProcedureError, UpdateProcedure};

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    struct LoggingStore {
        events: EventLog,
    }

    #[async_trait]
    impl RowStore for LoggingStore {
        async fn fetch_all(&self) -> Result<Vec<AccountRow>, StoreError> {
            self.events.lock().unwrap().push("fetch");
            Ok(vec![AccountRow::new(1, "inactive")])
        }
    }

    struct LoggingWal {
        events: EventLog,
    }

    #[async_trait]
    impl WalMetrics for LoggingWal {
        async fn reset(&self) -> Result<(), WalMetricsError> {
            self.events.lock().unwrap().push("reset");
            Ok(())
        }

        async fn sample(&self) -> Result<WalSnapshot, WalMetricsError> {
            self.events.lock().unwrap().push("sample");
            Ok(WalSnapshot::new(2.5, 3))
        }
    }

    struct LoggingProcedure {
        events: EventLog,
        outcome: Result<(), ProcedureError>,
    }

    #[async_trait]
    impl UpdateProcedure for LoggingProcedure {
        async fn execute(
            &self,
            _rows: &[AccountRow],
            _cancel: &CancellationToken,
        ) -> Result<(), ProcedureError> {
            self.events.lock().unwrap().push("procedure");
            self.outcome.clone()
        }
    }

    fn logging_executor(
        kind: StrategyKind,
        outcome: Result<(), ProcedureError>,
    ) -> (SingleRunExecutor, EventLog) {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let mut registry = StrategyRegistry::new();
        registry
            .register(
                kind,
                Arc::new(LoggingProcedure {
                    events: Arc::clone(&events),
                    outcome,
                }),
            )
            .unwrap();
        let executor = SingleRunExecutor::new(
            Arc::new(registry),
            Arc::new(LoggingStore {
                events: Arc::clone(&events),
            }),
            Arc::new(LoggingWal {
                events: Arc::clone(&events),
            }),
        );
        (executor, events)
    }

    #[tokio::test]
    async fn unknown_strategy_never_touches_the_database() {
        let registry = Arc::new(StrategyRegistry::new());
        // No expectations: any store or metrics call panics the test.
        let store = MockRowStore::new();
        let wal = MockWalMetrics::new();
        let executor = SingleRunExecutor::new(registry, Arc::new(store), Arc::new(wal));

        let err = executor
            .execute("nonexistent", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecutorError::Registry(RegistryError::Unknown(name)) if name == "nonexistent"
        ));
    }

    #[tokio::test]
    async fn fetch_reset_procedure_sample_in_that_order() {
        let (executor, events) = logging_executor(StrategyKind::WithoutTx, Ok(()));

        let record = executor
            .execute("without-tx", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["fetch", "reset", "procedure", "sample"]
        );
        assert_eq!(record.strategy, StrategyKind::WithoutTx);
        assert_eq!(record.error, None);
        assert_eq!(record.wal, WalSnapshot::new(2.5, 3));
    }

    #[tokio::test]
    async fn wal_is_sampled_even_when_the_strategy_fails() {
        let (executor, events) = logging_executor(
            StrategyKind::WithTx,
            Err(ProcedureError::Database("boom".to_string())),
        );

        let record = executor
            .execute("with-tx", &CancellationToken::new())
            .await
            .unwrap();

        assert!(events.lock().unwrap().contains(&"sample"));
        assert_eq!(record.error.as_deref(), Some("database error: boom"));
        assert_eq!(record.wal, WalSnapshot::new(2.5, 3));
    }

    struct SleepingProcedure;

    #[async_trait]
    impl UpdateProcedure for SleepingProcedure {
        async fn execute(
            &self,
            _rows: &[AccountRow],
            _cancel: &CancellationToken,
        ) -> Result<(), ProcedureError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn duration_covers_the_procedure_invocation() {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyKind::Bulk, Arc::new(SleepingProcedure))
            .unwrap();

        let mut store = MockRowStore::new();
        store.expect_fetch_all().times(1).returning(|| Ok(vec![]));
        let mut wal = MockWalMetrics::new();
        wal.expect_reset().times(1).returning(|| Ok(()));
        wal.expect_sample()
            .times(1)
            .returning(|| Ok(WalSnapshot::default()));

        let executor =
            SingleRunExecutor::new(Arc::new(registry), Arc::new(store), Arc::new(wal));
        let record = executor
            .execute("bulk", &CancellationToken::new())
            .await
            .unwrap();

        assert!(record.elapsed >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn metric_failure_is_a_hard_error_for_the_run() {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyKind::Bulk, Arc::new(SleepingProcedure))
            .unwrap();

        let mut store = MockRowStore::new();
        store.expect_fetch_all().returning(|| Ok(vec![]));
        let mut wal = MockWalMetrics::new();
        wal.expect_reset().returning(|| Ok(()));
        wal.expect_sample()
            .returning(|| Err(WalMetricsError::Unavailable));

        let executor =
            SingleRunExecutor::new(Arc::new(registry), Arc::new(store), Arc::new(wal));
        let err = executor
            .execute("bulk", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutorError::Wal(WalMetricsError::Unavailable)));
    }
}
