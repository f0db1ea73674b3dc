//! SQL statement building for the store-mediated update forms.
//!
//! Identifiers follow PostgreSQL quoting rules: embedded double quotes are
//! doubled and the name is wrapped in double quotes.

/// Quote identifier for safe SQL representation (PostgreSQL style).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Per-row status update: `$1` is the new status, `$2` the row id.
pub fn build_status_update_sql(table: &str) -> String {
    format!(
        "UPDATE {} SET {} = $1 WHERE {} = $2",
        quote_ident(table),
        quote_ident("status"),
        quote_ident("id")
    )
}

/// Set-based status update: `$1` is the new status, `$2` the full id array.
/// One round trip for the whole row set.
pub fn build_bulk_status_update_sql(table: &str) -> String {
    format!(
        "UPDATE {} SET {} = $1 WHERE {} = ANY($2)",
        quote_ident(table),
        quote_ident("status"),
        quote_ident("id")
    )
}
