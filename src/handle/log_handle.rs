//! The log handle: one append target, its message count, and close-time cleanup.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};

use crate::format::format_record;
use crate::types::{local_timestamp, LogError, LogOptions, LogResult, MessageLevel, OpenMode};

use super::fs;

/// An open log file.
///
/// The handle owns its path for its whole lifetime. When it is closed (or
/// dropped) the file is deleted if it is empty, so a log that never
/// received a message leaves nothing behind.
pub struct LogHandle {
    /// Path to the log file
    path: PathBuf,

    /// Writer, `None` until the first message in deferred mode
    writer: Option<BufWriter<File>>,

    /// Options the handle was opened with
    options: LogOptions,

    /// Messages written during this session
    msg_count: u64,

    /// Set once cleanup has run
    closed: bool,
}

impl LogHandle {
    /// Open `path` with default options and the given mode.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> LogResult<Self> {
        Self::open_with(path, LogOptions::with_mode(mode))
    }

    /// Open `path` with explicit options.
    pub fn open_with(path: impl AsRef<Path>, options: LogOptions) -> LogResult<Self> {
        let path = fs::validate_path(path.as_ref())?;
        if options.timestamps {
            validate_timestamp_format(&options.timestamp_format)?;
        }

        let file = match options.mode {
            OpenMode::Deferred => {
                if path.exists() {
                    Some(fs::open_append(&path, false)?)
                } else {
                    fs::ensure_parent_writable(&path)?;
                    None
                }
            }
            OpenMode::Create => Some(fs::open_append(&path, true)?),
            OpenMode::Truncate => Some(fs::open_truncate(&path)?),
        };

        log::debug!("Opened log {} ({})", path.display(), options.mode);

        Ok(Self {
            path,
            writer: file.map(BufWriter::new),
            options,
            msg_count: 0,
            closed: false,
        })
    }

    /// Append one message.
    ///
    /// Returns `Ok(false)` when the level is above the threshold and nothing
    /// was written. The count only moves when the record reached the writer.
    pub fn add_message(&mut self, level: MessageLevel, text: &str) -> LogResult<bool> {
        if !level.passes(self.options.threshold) {
            return Ok(false);
        }

        let timestamp = self
            .options
            .timestamps
            .then(|| local_timestamp(&self.options.timestamp_format));
        let line = format_record(level, text, timestamp.as_deref());

        match self.write_line(&line) {
            Ok(()) => {
                self.msg_count += 1;
                Ok(true)
            }
            Err(e) => {
                log::warn!("Failed to append to {}: {}", self.path.display(), e);
                Err(e)
            }
        }
    }

    fn write_line(&mut self, line: &str) -> LogResult<()> {
        if self.writer.is_none() {
            let file = fs::open_append(&self.path, true)?;
            self.writer = Some(BufWriter::new(file));
        }
        if let Some(writer) = &mut self.writer {
            writer.write_all(line.as_bytes())?;
            if self.options.sync_on_write {
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Number of messages written since this handle was opened.
    pub fn message_count(&self) -> u64 {
        self.msg_count
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open mode the handle was created with.
    pub fn mode(&self) -> OpenMode {
        self.options.mode
    }

    /// Options the handle was created with.
    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Most verbose level currently written.
    pub fn threshold(&self) -> Option<MessageLevel> {
        self.options.threshold
    }

    /// Change the level threshold; `None` writes everything.
    pub fn set_threshold(&mut self, threshold: Option<MessageLevel>) {
        self.options.threshold = threshold;
    }

    /// Whether a file descriptor is currently held.
    pub fn is_file_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Push buffered records to the file.
    pub fn flush(&mut self) -> LogResult<()> {
        if let Some(w) = &mut self.writer {
            w.flush()?;
        }
        Ok(())
    }

    /// Switch to a different log file.
    ///
    /// The new file is opened first; if that fails the handle keeps writing
    /// to the old one. On success the old file gets the usual close-time
    /// cleanup and the message count starts again at zero. Reopening the
    /// same file under any spelling keeps its content.
    pub fn reopen(&mut self, path: impl AsRef<Path>, mode: OpenMode) -> LogResult<()> {
        let options = LogOptions {
            mode,
            ..self.options.clone()
        };
        self.flush()?;

        let next = Self::open_with(path, options)?;
        let mut previous = std::mem::replace(self, next);
        // Identity is checked after the open so that an aliased path the
        // new handle just created is never deleted by the old one.
        let same_file = match fs::same_file(&previous.path, &self.path) {
            Ok(same) => same,
            Err(e) => {
                log::warn!("Cannot compare {}: {}", previous.path.display(), e);
                true
            }
        };
        previous.finish(!same_file)
    }

    /// Close the handle, deleting the file if it is empty.
    ///
    /// A file that was removed by someone else in the meantime is not an
    /// error.
    pub fn close(mut self) -> LogResult<()> {
        self.finish(true)
    }

    fn finish(&mut self, cleanup: bool) -> LogResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let flushed = match self.writer.take() {
            Some(mut w) => w.flush(),
            None => Ok(()),
        };
        let removed = if cleanup {
            fs::remove_if_empty(&self.path)
        } else {
            Ok(false)
        };
        if let Ok(true) = removed {
            log::debug!("Removed empty log {}", self.path.display());
        }
        log::debug!(
            "Closed log {} after {} messages",
            self.path.display(),
            self.msg_count
        );
        close_result(&self.path, flushed, removed)
    }
}

/// Combine the two close-time outcomes. A flush failure wins because it
/// means records were lost; a cleanup failure behind it is only logged.
fn close_result(
    path: &Path,
    flushed: std::io::Result<()>,
    removed: std::io::Result<bool>,
) -> LogResult<()> {
    match (flushed, removed) {
        (Ok(()), Ok(_)) => Ok(()),
        (Err(flush_err), removed) => {
            log::warn!("Failed to flush {}: {}", path.display(), flush_err);
            if let Err(e) = removed {
                log::warn!("Failed to remove empty log {}: {}", path.display(), e);
            }
            Err(flush_err.into())
        }
        (Ok(()), Err(e)) => Err(e.into()),
    }
}

impl Drop for LogHandle {
    fn drop(&mut self) {
        if let Err(e) = self.finish(true) {
            log::warn!("Cleanup of {} failed: {}", self.path.display(), e);
        }
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("path", &self.path)
            .field("mode", &self.options.mode)
            .field("msg_count", &self.msg_count)
            .field("file_open", &self.writer.is_some())
            .finish()
    }
}

fn validate_timestamp_format(format: &str) -> LogResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(LogError::Config(format!(
            "invalid timestamp format: {:?}",
            format
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn flush_error_takes_precedence_over_cleanup_error() {
        let path = Path::new("x.log");
        let result = close_result(
            path,
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full")),
            Err(io::Error::new(io::ErrorKind::Other, "stat failed")),
        );
        match result {
            Err(LogError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            other => panic!("expected flush error, got {:?}", other),
        }
    }

    #[test]
    fn cleanup_error_surfaces_when_flush_succeeds() {
        let result = close_result(
            Path::new("x.log"),
            Ok(()),
            Err(io::Error::new(io::ErrorKind::Other, "stat failed")),
        );
        assert!(matches!(result, Err(LogError::Io(_))));
        assert!(close_result(Path::new("x.log"), Ok(()), Ok(true)).is_ok());
    }
}
