pub use walbench_app as app;
pub use walbench_domain as domain;
pub use walbench_infra as infra;

pub mod error;
