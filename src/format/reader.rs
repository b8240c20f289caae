//! Reads log files back into records.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::LogResult;

use super::record::{LineLayout, Record};

/// Reader for plain-text log files.
pub struct RecordReader;

impl RecordReader {
    /// Read every record in the file at `path`.
    pub fn read_from_file(path: &Path) -> LogResult<Vec<Record>> {
        Self::read_from_file_as(path, LineLayout::Auto)
    }

    /// Read every record in the file at `path` using a known layout.
    pub fn read_from_file_as(path: &Path, layout: LineLayout) -> LogResult<Vec<Record>> {
        let file = std::fs::File::open(path)?;
        Self::read_from_as(BufReader::new(file), layout)
    }

    /// Read every record from any buffered reader, skipping lines that do
    /// not parse.
    pub fn read_from(reader: impl BufRead) -> LogResult<Vec<Record>> {
        Self::read_from_as(reader, LineLayout::Auto)
    }

    /// Like [`RecordReader::read_from`], with a known layout.
    pub fn read_from_as(reader: impl BufRead, layout: LineLayout) -> LogResult<Vec<Record>> {
        let mut records = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            match Record::parse_as(&line, layout) {
                Some(rec) => records.push(rec),
                None if line.is_empty() => {}
                None => log::debug!("Skipping unparseable line {}", lineno + 1),
            }
        }
        Ok(records)
    }

    /// Count the records in the file at `path`.
    pub fn count(path: &Path) -> LogResult<usize> {
        Ok(Self::read_from_file(path)?.len())
    }
}
