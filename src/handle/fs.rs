//! File-system predicates and mutators used by the handle.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::types::{LogError, LogResult};

/// Reject paths that can never name a log file.
pub fn validate_path(path: &Path) -> LogResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(LogError::InvalidPath("path is empty".to_string()));
    }
    if path.is_dir() {
        return Err(LogError::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Metadata for `path`, or `None` if nothing is there.
fn metadata_if_exists(path: &Path) -> io::Result<Option<std::fs::Metadata>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Size of the file at `path`, or `None` if nothing is there.
pub fn file_size(path: &Path) -> io::Result<Option<u64>> {
    Ok(metadata_if_exists(path)?.map(|meta| meta.len()))
}

/// Remove `path`; a file that is already gone is not an error.
pub fn remove_file(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Delete the file at `path` if it is a regular file and empty.
///
/// Returns whether a file was removed.
pub fn remove_if_empty(path: &Path) -> io::Result<bool> {
    match metadata_if_exists(path)? {
        Some(meta) if meta.is_file() && meta.len() == 0 => {
            remove_file(path)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Whether `a` and `b` name the same file, however they are spelled.
///
/// Paths that do not exist never match.
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let (meta_a, meta_b) = match (metadata_if_exists(a)?, metadata_if_exists(b)?) {
        (Some(ma), Some(mb)) => (ma, mb),
        _ => return Ok(false),
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
    }
    #[cfg(not(unix))]
    {
        drop((meta_a, meta_b));
        Ok(std::fs::canonicalize(a)? == std::fs::canonicalize(b)?)
    }
}

/// Open `path` for appending, optionally creating it.
pub fn open_append(path: &Path, create: bool) -> LogResult<File> {
    OpenOptions::new()
        .append(true)
        .create(create)
        .open(path)
        .map_err(|e| LogError::from_open(e, path))
}

/// Create `path`, discarding any existing content.
pub fn open_truncate(path: &Path) -> LogResult<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| LogError::from_open(e, path))
}

/// Check that a file could be created at `path` without creating it.
///
/// Asks the OS whether the calling process may write to the parent
/// directory, so ownership and privileges are taken into account.
pub fn ensure_parent_writable(path: &Path) -> LogResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let meta = std::fs::metadata(parent).map_err(|e| LogError::from_open(e, path))?;
    if !meta.is_dir() {
        return Err(LogError::InvalidPath(format!(
            "{} is not a directory",
            parent.display()
        )));
    }
    if !dir_writable(parent, &meta)? {
        return Err(LogError::PermissionDenied {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn dir_writable(dir: &Path, _meta: &std::fs::Metadata) -> LogResult<bool> {
    use nix::errno::Errno;
    use nix::unistd::{access, AccessFlags};

    match access(dir, AccessFlags::W_OK | AccessFlags::X_OK) {
        Ok(()) => Ok(true),
        Err(Errno::EACCES) | Err(Errno::EROFS) | Err(Errno::EPERM) => Ok(false),
        Err(errno) => Err(LogError::Io(io::Error::from(errno))),
    }
}

#[cfg(not(unix))]
fn dir_writable(_dir: &Path, meta: &std::fs::Metadata) -> LogResult<bool> {
    Ok(!meta.permissions().readonly())
}
