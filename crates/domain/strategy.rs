use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of update strategies under comparison.
///
/// Each variant is a distinct point in the {per-row vs. batched,
/// transactional vs. autocommit, store-mediated vs. raw SQL, prepared vs.
/// ad-hoc} design space. `ALL` fixes the canonical registration order, which
/// is also the report order; reports must stay diffable across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    WithoutTx,
    WithTx,
    WithMultiTx,
    Bulk,
    RawSqlWithTx,
    RawSqlWithTxPrepare,
    RawSqlWithoutTx,
    RawSqlWithoutTxPrepare,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy: {name}")]
pub struct UnknownStrategyError {
    pub name: String,
}

impl StrategyKind {
    pub const ALL: [Self; 8] = [
        Self::WithoutTx,
        Self::WithTx,
        Self::WithMultiTx,
        Self::Bulk,
        Self::RawSqlWithTx,
        Self::RawSqlWithTxPrepare,
        Self::RawSqlWithoutTx,
        Self::RawSqlWithoutTxPrepare,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::WithoutTx => "without-tx",
            Self::WithTx => "with-tx",
            Self::WithMultiTx => "with-multi-tx",
            Self::Bulk => "bulk",
            Self::RawSqlWithTx => "raw-sql-with-tx",
            Self::RawSqlWithTxPrepare => "raw-sql-with-tx-prepare",
            Self::RawSqlWithoutTx => "raw-sql-without-tx",
            Self::RawSqlWithoutTxPrepare => "raw-sql-without-tx-prepare",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::WithoutTx => "store-mediated update per row, autocommit",
            Self::WithTx => "store-mediated updates inside one transaction",
            Self::WithMultiTx => "one transaction per row, committed individually",
            Self::Bulk => "single set-based statement for all rows",
            Self::RawSqlWithTx => "raw statement per row inside one transaction",
            Self::RawSqlWithTxPrepare => "prepared raw statement inside one transaction",
            Self::RawSqlWithoutTx => "raw statement per row, autocommit",
            Self::RawSqlWithoutTxPrepare => "prepared raw statement, autocommit",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownStrategyError {
                name: s.to_string(),
            })
    }
}
