use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail};
use tokio_util::sync::CancellationToken;

use walbench::app::executor::SingleRunExecutor;
use walbench::app::orchestrator::{BenchmarkOrchestrator, DEFAULT_BENCHMARK_RUNS};
use walbench::app::ports::{ProgressObserver, ReportWriter};
use walbench::app::registry::StrategyRegistry;
use walbench::domain::{AggregateRecord, RunRecord, StrategyKind};
use walbench::error;
use walbench::infra::adapters::{PostgresAdapter, register_update_strategies};
use walbench::infra::config::resolve_database_url;
use walbench::infra::export::{CsvReportWriter, timestamped_report_path};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one update strategy once and print its timing
    ExecOnce {
        /// Strategy to run (see `list` for valid names)
        #[arg(long, default_value = "without-tx")]
        mode: String,
        /// Connection string; defaults to $DATABASE_URL
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Run every strategy repeatedly and write the results as CSV
    Benchmark {
        /// Connection string; defaults to $DATABASE_URL
        #[arg(long)]
        database_url: Option<String>,
        /// Repetitions per strategy
        #[arg(long, default_value_t = DEFAULT_BENCHMARK_RUNS)]
        runs: u32,
        /// Directory the report file is written into
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// List the available strategies
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;

    let args = Args::parse();
    match args.command {
        Command::ExecOnce { mode, database_url } => {
            exec_once(&mode, database_url.as_deref()).await
        }
        Command::Benchmark {
            database_url,
            runs,
            output_dir,
        } => benchmark(database_url.as_deref(), runs, &output_dir).await,
        Command::List => {
            list();
            Ok(())
        }
    }
}

fn list() {
    println!("Available strategies:");
    for kind in StrategyKind::ALL {
        println!("  {:<28} {}", kind.name(), kind.description());
    }
}

async fn exec_once(mode: &str, database_url: Option<&str>) -> Result<()> {
    // Reject a bad name before opening any connection.
    let kind: StrategyKind = mode.parse()?;

    let dsn = resolve_database_url(database_url);
    let (_registry, executor) = build_executor(&dsn).await?;
    let cancel = cancel_on_ctrl_c();

    let record = executor.execute(kind.name(), &cancel).await?;
    if let Some(message) = record.error {
        bail!("strategy {mode} failed: {message}");
    }

    println!(
        "[{}] seconds={:.6} wal_sync_time={:.3} wal_sync={}",
        record.strategy,
        record.elapsed.as_secs_f64(),
        record.wal.sync_time_ms,
        record.wal.sync_count
    );
    Ok(())
}

async fn benchmark(database_url: Option<&str>, runs: u32, output_dir: &Path) -> Result<()> {
    let dsn = resolve_database_url(database_url);
    let (registry, executor) = build_executor(&dsn).await?;
    let cancel = cancel_on_ctrl_c();

    let orchestrator =
        BenchmarkOrchestrator::new(registry, executor, Arc::new(ConsoleProgress), runs);
    let rows = orchestrator.run_all(&cancel).await?;

    let destination = timestamped_report_path(output_dir);
    CsvReportWriter::new().write(&rows, &destination)?;
    println!("Wrote benchmark results to {}", destination.display());
    Ok(())
}

async fn build_executor(dsn: &str) -> Result<(Arc<StrategyRegistry>, SingleRunExecutor)> {
    let adapter = Arc::new(PostgresAdapter::connect(dsn).await?);

    let mut registry = StrategyRegistry::new();
    register_update_strategies(&mut registry, &adapter.shared_client())?;
    let registry = Arc::new(registry);

    let executor = SingleRunExecutor::new(
        Arc::clone(&registry),
        Arc::clone(&adapter) as _,
        Arc::clone(&adapter) as _,
    );
    Ok((registry, executor))
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn run_completed(&self, record: &RunRecord, run: u32) {
        println!(
            "[{}] run {} seconds={:.6} wal_sync_time={:.3} wal_sync={}",
            record.strategy,
            run,
            record.elapsed.as_secs_f64(),
            record.wal.sync_time_ms,
            record.wal.sync_count
        );
    }

    fn strategy_completed(&self, aggregate: &AggregateRecord) {
        println!(
            "[{}] avg seconds={:.6} wal_sync_time={:.3} wal_sync={:.1}",
            aggregate.strategy,
            aggregate.mean_elapsed_seconds,
            aggregate.mean_wal_sync_time_ms,
            aggregate.mean_wal_sync_count
        );
    }
}
