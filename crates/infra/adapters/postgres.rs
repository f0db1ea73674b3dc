use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};

use walbench_app::ports::{RowStore, StoreError, WalMetrics, WalMetricsError};
use walbench_domain::{AccountRow, WalSnapshot};

use crate::sql::quote_ident;

/// Table holding the benchmark rows.
pub const ACCOUNTS_TABLE: &str = "benchmark_accounts";

const RESET_WAL_SQL: &str = "SELECT pg_stat_reset_shared('wal')";
const SAMPLE_WAL_SQL: &str =
    "SELECT COALESCE(wal_sync_time, 0)::float8, COALESCE(wal_sync, 0)::int8 FROM pg_stat_wal";

/// Connection handle shared between the row store, the WAL sampler and the
/// update procedures. Transactions need `&mut Client`, hence the mutex;
/// execution is sequential by design, so the lock is never contended.
pub type SharedClient = Arc<Mutex<Client>>;

pub struct PostgresAdapter {
    client: SharedClient,
}

impl PostgresAdapter {
    /// Connect to the target server and spawn the connection driver task.
    pub async fn connect(dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, connection) = tokio_postgres::connect(dsn, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("connection error: {e}");
            }
        });
        Ok(Self {
            client: Arc::new(Mutex::new(client)),
        })
    }

    pub fn shared_client(&self) -> SharedClient {
        Arc::clone(&self.client)
    }
}

#[async_trait]
impl RowStore for PostgresAdapter {
    async fn fetch_all(&self) -> Result<Vec<AccountRow>, StoreError> {
        let sql = format!(
            "SELECT {}, {} FROM {} ORDER BY {}",
            quote_ident("id"),
            quote_ident("status"),
            quote_ident(ACCOUNTS_TABLE),
            quote_ident("id")
        );
        let client = self.client.lock().await;
        let rows = client
            .query(sql.as_str(), &[])
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(rows
            .iter()
            .map(|row| AccountRow::new(row.get(0), row.get::<_, String>(1)))
            .collect())
    }
}

#[async_trait]
impl WalMetrics for PostgresAdapter {
    async fn reset(&self) -> Result<(), WalMetricsError> {
        let client = self.client.lock().await;
        client
            .execute(RESET_WAL_SQL, &[])
            .await
            .map_err(|e| WalMetricsError::Database(e.to_string()))?;
        Ok(())
    }

    async fn sample(&self) -> Result<WalSnapshot, WalMetricsError> {
        let client = self.client.lock().await;
        let row = client
            .query_opt(SAMPLE_WAL_SQL, &[])
            .await
            .map_err(|e| WalMetricsError::Database(e.to_string()))?
            .ok_or(WalMetricsError::Unavailable)?;
        Ok(WalSnapshot::new(row.get(0), row.get(1)))
    }
}
