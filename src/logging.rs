//! Log output for the shell
//!
//! The terminal belongs to the prompt, so tracing events go to a size-rotated file
//! instead of stderr. `RUST_LOG` overrides the configured level.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Rotate once the log grows past this many bytes
pub const MAX_LOG_BYTES: u64 = 1_000_000;

/// Log file name inside [`log_dir`]
pub const LOG_FILE: &str = "dbsh.log";

/// A file appender that rotates logs based on size.
///
/// Keeps exactly two files: `dbsh.log` and `dbsh.log.old`. The file is re-created
/// if deleted externally, writes are serialized through an internal mutex, and
/// created files get 0o600 permissions on Unix.
pub struct RotatingFileAppender {
    path: PathBuf,
    backup_path: PathBuf,
    max_size_bytes: u64,
    file: Mutex<Option<File>>,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender writing `dir/filename`.
    pub fn new(dir: impl Into<PathBuf>, filename: &str, max_size_bytes: u64) -> Self {
        let dir = dir.into();
        let path = dir.join(filename);
        let backup_path = dir.join(format!("{filename}.old"));

        Self {
            path,
            backup_path,
            max_size_bytes,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_secure(path: &Path, append: bool) -> io::Result<File> {
        let mut options = fs::OpenOptions::new();
        options.create(true).write(true);

        if append {
            options.append(true);
        } else {
            options.truncate(true);
        }

        #[cfg(unix)]
        {
            options.mode(0o600);
        }

        options.open(path)
    }

    /// Open the file if not open, or re-open if deleted.
    fn get_file<'a>(&self, guard: &'a mut Option<File>) -> io::Result<&'a mut File> {
        if !self.path.exists() {
            *guard = None;
        }

        let file = match guard.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                Self::open_secure(&self.path, true)?
            }
        };
        Ok(guard.insert(file))
    }

    /// Current -> backup, then start an empty current file
    fn rotate(&self, guard: &mut Option<File>) -> io::Result<()> {
        *guard = None;

        if self.path.exists() {
            fs::rename(&self.path, &self.backup_path)?;
        }

        *guard = Some(Self::open_secure(&self.path, false)?);
        Ok(())
    }
}

impl Write for RotatingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        let current_size = match self.get_file(&mut guard) {
            Ok(f) => f.metadata()?.len(),
            Err(_) => 0,
        };

        if current_size >= self.max_size_bytes {
            // On failure get_file re-opens the current file and keeps appending;
            // the terminal belongs to the prompt, so there is nowhere to report it
            let _ = self.rotate(&mut guard);
        }

        let file = self.get_file(&mut guard)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        if let Some(file) = guard.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Directory for the log file: `$XDG_STATE_HOME/dbsh`, else the cache dir
#[must_use]
pub fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("dbsh"))
}

/// Install the global subscriber writing to the rotating log file.
///
/// Returns the worker guard that flushes pending events on drop; keep it alive
/// for the life of the program. Returns `None` when no log directory exists, in
/// which case events are discarded.
pub fn init(log_level: &str) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    let appender = RotatingFileAppender::new(dir, LOG_FILE, MAX_LOG_BYTES);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Filter format: "dbsh=LEVEL" keeps dependency noise out of the log
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dbsh={log_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotates_when_limit_reached() {
        let dir = TempDir::new().unwrap();
        let mut appender = RotatingFileAppender::new(dir.path(), "t.log", 10);

        appender.write_all(b"0123456789").unwrap();
        appender.write_all(b"abc").unwrap();
        appender.flush().unwrap();

        let current = fs::read_to_string(dir.path().join("t.log")).unwrap();
        let backup = fs::read_to_string(dir.path().join("t.log.old")).unwrap();
        assert_eq!(current, "abc");
        assert_eq!(backup, "0123456789");
    }

    #[test]
    fn recreates_deleted_file() {
        let dir = TempDir::new().unwrap();
        let mut appender = RotatingFileAppender::new(dir.path().join("sub"), "t.log", 1_000);

        appender.write_all(b"first\n").unwrap();
        fs::remove_file(appender.path()).unwrap();
        appender.write_all(b"second\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(appender.path()).unwrap(), "second\n");
    }
}
