//! Text format of log files.

pub mod reader;
pub mod record;

pub use reader::RecordReader;
pub use record::{format_record, LineLayout, Record};
