//! A `log` facade backend that writes through a [`LogHandle`].

use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Metadata, Record};

use crate::handle::{fs, LogHandle};
use crate::types::{LogOptions, LogResult, MessageLevel, OpenMode};

/// Routes `log` records into a log file.
///
/// Every record is flushed as soon as it is written. Records from this
/// crate itself are dropped: the handle reports its own failures through
/// `log`, and the sink holds its lock while writing. Write failures go to
/// stderr instead.
pub struct LogFileSink {
    handle: Mutex<Option<LogHandle>>,
    max_level: LevelFilter,
}

impl LogFileSink {
    /// Open `path` and wrap it in a sink that accepts records up to `max_level`.
    ///
    /// An installed logger is never dropped, so the file is not created until
    /// the first record arrives: `Create` is opened as `Deferred`, and
    /// `Truncate` removes the old file instead of leaving an empty one.
    pub fn open(
        path: impl AsRef<Path>,
        mut options: LogOptions,
        max_level: LevelFilter,
    ) -> LogResult<Self> {
        let path = fs::validate_path(path.as_ref())?;
        match options.mode {
            OpenMode::Deferred => {}
            OpenMode::Create => options.mode = OpenMode::Deferred,
            OpenMode::Truncate => {
                fs::remove_file(&path)?;
                options.mode = OpenMode::Deferred;
            }
        }
        let handle = LogHandle::open_with(path, options)?;
        Ok(Self::new(handle, max_level))
    }

    /// Wrap an already open handle.
    pub fn new(handle: LogHandle, max_level: LevelFilter) -> Self {
        Self {
            handle: Mutex::new(Some(handle)),
            max_level,
        }
    }

    /// Register this sink as the global logger.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Messages written so far, or 0 once closed.
    pub fn message_count(&self) -> u64 {
        match self.handle.lock() {
            Ok(guard) => guard.as_ref().map_or(0, LogHandle::message_count),
            Err(_) => 0,
        }
    }

    /// Close the underlying handle. Later records are discarded.
    pub fn close(&self) -> LogResult<()> {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match handle {
            Some(h) => h.close(),
            None => Ok(()),
        }
    }
}

fn is_own_record(target: &str) -> bool {
    let own = env!("CARGO_CRATE_NAME");
    target == own || target.starts_with(&format!("{}::", own))
}

impl log::Log for LogFileSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level && !is_own_record(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let text = format!("{}: {}", record.target(), record.args());
        if let Ok(mut guard) = self.handle.lock() {
            if let Some(handle) = guard.as_mut() {
                let written = handle
                    .add_message(MessageLevel::from(record.level()), &text)
                    .and_then(|_| handle.flush());
                if let Err(e) = written {
                    eprintln!(
                        "loghandle: cannot write to {}: {}",
                        handle.path().display(),
                        e
                    );
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.handle.lock() {
            if let Some(handle) = guard.as_mut() {
                if let Err(e) = handle.flush() {
                    eprintln!("loghandle: cannot flush {}: {}", handle.path().display(), e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn emit(sink: &LogFileSink, level: log::Level, target: &str, msg: &str) {
        sink.log(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{}", msg))
                .build(),
        );
    }

    #[test]
    fn records_are_written_with_mapped_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.log");
        let sink = LogFileSink::open(
            &path,
            LogOptions::with_mode(OpenMode::Deferred),
            LevelFilter::Info,
        )
        .unwrap();

        emit(&sink, log::Level::Error, "app", "disk gone");
        emit(&sink, log::Level::Info, "app::net", "connected");
        emit(&sink, log::Level::Debug, "app", "filtered");
        emit(&sink, log::Level::Warn, "loghandle::handle", "own record");

        assert_eq!(sink.message_count(), 2);
        sink.close().unwrap();
        assert_eq!(sink.message_count(), 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1 app: disk gone\n3 app::net: connected\n");
    }

    #[test]
    fn records_reach_disk_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.log");
        let sink = LogFileSink::open(&path, LogOptions::default(), LevelFilter::Info).unwrap();

        emit(&sink, log::Level::Error, "app", "important");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1 app: important\n"
        );
        sink.close().unwrap();
    }

    #[test]
    fn unused_sink_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiet.log");
        let sink = LogFileSink::open(&path, LogOptions::default(), LevelFilter::Trace).unwrap();
        assert!(!path.exists());
        sink.close().unwrap();
        assert!(!path.exists());

        emit(&sink, log::Level::Error, "app", "after close");
        assert!(!path.exists());
    }

    #[test]
    fn write_failures_do_not_panic_or_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked.log");
        let sink = LogFileSink::open(&path, LogOptions::default(), LevelFilter::Info).unwrap();
        std::fs::create_dir(&path).unwrap();

        emit(&sink, log::Level::Error, "app", "nowhere to go");
        assert_eq!(sink.message_count(), 0);

        std::fs::remove_dir(&path).unwrap();
        emit(&sink, log::Level::Error, "app", "recovered");
        assert_eq!(sink.message_count(), 1);
        sink.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1 app: recovered\n");
    }

    #[test]
    fn truncating_sink_drops_old_content_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.log");
        std::fs::write(&path, "1 stale\n").unwrap();

        let sink = LogFileSink::open(
            &path,
            LogOptions::with_mode(OpenMode::Truncate),
            LevelFilter::Info,
        )
        .unwrap();
        assert!(!path.exists());
        emit(&sink, log::Level::Warn, "app", "fresh");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 app: fresh\n");
        sink.close().unwrap();
    }
}
