mod postgres;
mod strategies;

pub use postgres::{ACCOUNTS_TABLE, PostgresAdapter, SharedClient};
pub use strategies::register_update_strategies;
