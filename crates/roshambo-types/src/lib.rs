//! Shared domain types for the Roshambo project.

pub mod account;
pub mod config;
pub mod moves;
pub mod record;

mod errors;

pub use errors::{AuthError, Result, RoshamboError};

/// Format used for every persisted timestamp (second precision, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
