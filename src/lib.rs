pub mod api;
pub mod common;
pub mod config;
pub mod error;
pub mod retry;

pub use api::hackerone::reports::{DEFAULT_REPORTS_WINDOW_DAYS, reports_since_default};
pub use api::{HackerOneClient, Report, Severity};
pub use config::{Config, Credentials, SeverityRanges};
pub use error::{Error, Result};
pub use retry::{RetryPolicy, with_retry};
