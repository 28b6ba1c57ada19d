pub mod hackerone;
pub mod transport;

pub use hackerone::HackerOneClient;
pub use hackerone::types::{Report, Severity};
