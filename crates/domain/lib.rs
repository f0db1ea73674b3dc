pub mod record;
pub mod row;
pub mod strategy;
pub mod wal;

pub use record::{AggregateRecord, REPORT_HEADER, ReportRow, RunRecord, mean};
pub use row::{AccountRow, TARGET_STATUS};
pub use strategy::{StrategyKind, UnknownStrategyError};
pub use wal::WalSnapshot;
