//! The concrete update procedures, one per point in the
//! {per-row vs. batched, transactional vs. autocommit, store-mediated vs.
//! raw SQL, prepared vs. ad-hoc} design space.
//!
//! Prepared-statement procedures prepare after the run timer has already
//! started, so prepare cost is part of every prepared strategy's measured
//! work.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use tokio_postgres::Transaction;

use walbench_app::ports::{ProcedureError, UpdateProcedure};
use walbench_app::registry::{RegistryError, StrategyRegistry};
use walbench_domain::{AccountRow, StrategyKind, TARGET_STATUS};

use super::postgres::{ACCOUNTS_TABLE, SharedClient};
use crate::sql::{build_bulk_status_update_sql, build_status_update_sql};

const RAW_UPDATE_SQL: &str = "UPDATE benchmark_accounts SET status = 'active' WHERE id = $1";

/// Register every update procedure, in canonical order, against one shared
/// connection.
pub fn register_update_strategies(
    registry: &mut StrategyRegistry,
    client: &SharedClient,
) -> Result<(), RegistryError> {
    registry.register(
        StrategyKind::WithoutTx,
        Arc::new(WithoutTx::new(Arc::clone(client))),
    )?;
    registry.register(StrategyKind::WithTx, Arc::new(WithTx::new(Arc::clone(client))))?;
    registry.register(
        StrategyKind::WithMultiTx,
        Arc::new(WithMultiTx::new(Arc::clone(client))),
    )?;
    registry.register(StrategyKind::Bulk, Arc::new(Bulk::new(Arc::clone(client))))?;
    registry.register(
        StrategyKind::RawSqlWithTx,
        Arc::new(RawSqlWithTx::new(Arc::clone(client))),
    )?;
    registry.register(
        StrategyKind::RawSqlWithTxPrepare,
        Arc::new(RawSqlWithTxPrepare::new(Arc::clone(client))),
    )?;
    registry.register(
        StrategyKind::RawSqlWithoutTx,
        Arc::new(RawSqlWithoutTx::new(Arc::clone(client))),
    )?;
    registry.register(
        StrategyKind::RawSqlWithoutTxPrepare,
        Arc::new(RawSqlWithoutTxPrepare::new(Arc::clone(client))),
    )?;
    Ok(())
}

/// Await one database operation, racing it against cancellation. A cancelled
/// token abandons the in-flight operation and surfaces `Cancelled`.
async fn db_call<T>(
    cancel: &CancellationToken,
    op: impl Future<Output = Result<T, tokio_postgres::Error>>,
) -> Result<T, ProcedureError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ProcedureError::Cancelled),
        result = op => result.map_err(|e| ProcedureError::Database(e.to_string())),
    }
}

/// A successful rollback surfaces the triggering row error; a failed
/// rollback surfaces the rollback error instead of masking it.
async fn roll_back(tx: Transaction<'_>, row_error: ProcedureError) -> ProcedureError {
    match tx.rollback().await {
        Ok(()) => row_error,
        Err(rollback_error) => ProcedureError::Database(rollback_error.to_string()),
    }
}

/// Store-mediated update per row under autocommit. The baseline.
pub struct WithoutTx {
    client: SharedClient,
}

impl WithoutTx {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for WithoutTx {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let client = self.client.lock().await;
        let sql = build_status_update_sql(ACCOUNTS_TABLE);
        for row in rows {
            db_call(cancel, client.execute(sql.as_str(), &[&TARGET_STATUS, &row.id])).await?;
        }
        Ok(())
    }
}

/// Store-mediated updates inside a single transaction; commits once, rolls
/// back entirely on the first row failure.
pub struct WithTx {
    client: SharedClient,
}

impl WithTx {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for WithTx {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let mut client = self.client.lock().await;
        let tx = db_call(cancel, client.transaction()).await?;
        let sql = build_status_update_sql(ACCOUNTS_TABLE);
        for row in rows {
            if let Err(err) =
                db_call(cancel, tx.execute(sql.as_str(), &[&TARGET_STATUS, &row.id])).await
            {
                return Err(roll_back(tx, err).await);
            }
        }
        db_call(cancel, tx.commit()).await
    }
}

/// One transaction per row, committed individually. A mid-run failure rolls
/// back only the failing row; prior committed rows keep the update.
pub struct WithMultiTx {
    client: SharedClient,
}

impl WithMultiTx {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for WithMultiTx {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let mut client = self.client.lock().await;
        let sql = build_status_update_sql(ACCOUNTS_TABLE);
        for row in rows {
            let tx = db_call(cancel, client.transaction()).await?;
            if let Err(err) =
                db_call(cancel, tx.execute(sql.as_str(), &[&TARGET_STATUS, &row.id])).await
            {
                return Err(roll_back(tx, err).await);
            }
            db_call(cancel, tx.commit()).await?;
        }
        Ok(())
    }
}

/// Single set-based statement covering the whole row set in one round trip.
pub struct Bulk {
    client: SharedClient,
}

impl Bulk {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for Bulk {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let client = self.client.lock().await;
        let sql = build_bulk_status_update_sql(ACCOUNTS_TABLE);
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        db_call(cancel, client.execute(sql.as_str(), &[&TARGET_STATUS, &ids])).await?;
        Ok(())
    }
}

/// Raw parameterized statement, re-parsed per row, inside one transaction.
pub struct RawSqlWithTx {
    client: SharedClient,
}

impl RawSqlWithTx {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for RawSqlWithTx {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let mut client = self.client.lock().await;
        let tx = db_call(cancel, client.transaction()).await?;
        for row in rows {
            if let Err(err) = db_call(cancel, tx.execute(RAW_UPDATE_SQL, &[&row.id])).await {
                return Err(roll_back(tx, err).await);
            }
        }
        db_call(cancel, tx.commit()).await
    }
}

/// Raw statement prepared once inside one transaction, executed per row.
pub struct RawSqlWithTxPrepare {
    client: SharedClient,
}

impl RawSqlWithTxPrepare {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for RawSqlWithTxPrepare {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let mut client = self.client.lock().await;
        let tx = db_call(cancel, client.transaction()).await?;
        let stmt = db_call(cancel, tx.prepare(RAW_UPDATE_SQL)).await?;
        for row in rows {
            if let Err(err) = db_call(cancel, tx.execute(&stmt, &[&row.id])).await {
                return Err(roll_back(tx, err).await);
            }
        }
        db_call(cancel, tx.commit()).await
    }
}

/// Raw parameterized statement, re-parsed per row, autocommit.
pub struct RawSqlWithoutTx {
    client: SharedClient,
}

impl RawSqlWithoutTx {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for RawSqlWithoutTx {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let client = self.client.lock().await;
        for row in rows {
            db_call(cancel, client.execute(RAW_UPDATE_SQL, &[&row.id])).await?;
        }
        Ok(())
    }
}

/// Raw statement prepared once, executed per row, autocommit.
pub struct RawSqlWithoutTxPrepare {
    client: SharedClient,
}

impl RawSqlWithoutTxPrepare {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpdateProcedure for RawSqlWithoutTxPrepare {
    async fn execute(
        &self,
        rows: &[AccountRow],
        cancel: &CancellationToken,
    ) -> Result<(), ProcedureError> {
        let client = self.client.lock().await;
        let stmt = db_call(cancel, client.prepare(RAW_UPDATE_SQL)).await?;
        for row in rows {
            db_call(cancel, client.execute(&stmt, &[&row.id])).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_wins_over_a_pending_operation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = db_call(
            &cancel,
            std::future::pending::<Result<(), tokio_postgres::Error>>(),
        )
        .await;

        assert_eq!(result, Err(ProcedureError::Cancelled));
    }

    #[tokio::test]
    async fn live_token_lets_the_operation_complete() {
        let cancel = CancellationToken::new();

        let result = db_call(&cancel, std::future::ready(Ok(7_u64))).await;

        assert_eq!(result, Ok(7));
    }
}
