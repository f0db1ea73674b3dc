/// Status value every strategy drives rows toward. The update is idempotent,
/// so repeated benchmark runs operate on the same logical rows.
pub const TARGET_STATUS: &str = "active";

/// One mutable row handle from the benchmark table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub id: i64,
    pub status: String,
}

impl AccountRow {
    pub fn new(id: i64, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
        }
    }
}
