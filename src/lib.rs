//! loghandle — leveled log files that clean up after themselves.
//!
//! A [`LogHandle`] owns one append-only text file. Each message is written
//! as a single `<level> <text>` line, the handle counts what it wrote, and
//! closing it deletes the file again if nothing ever landed in it.

pub mod cli;
pub mod format;
pub mod handle;
pub mod sink;
pub mod types;

// Re-export commonly used types at the crate root
pub use format::{format_record, LineLayout, Record, RecordReader};
pub use handle::LogHandle;
pub use sink::LogFileSink;
pub use types::{
    LogError, LogOptions, LogResult, MessageLevel, OpenMode, DEFAULT_TIMESTAMP_FORMAT,
};
