//! Shared types for the loghandle library.

pub mod error;
pub mod level;
pub mod options;

pub use error::{LogError, LogResult};
pub use level::MessageLevel;
pub use options::{LogOptions, OpenMode};

/// Default chrono format for the optional timestamp prefix.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m - %H:%M:%S";

/// Separator between the timestamp prefix and the rest of a record.
pub const TIMESTAMP_SEPARATOR: &str = "  ";

/// Render the current local time with `format`.
pub fn local_timestamp(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}
