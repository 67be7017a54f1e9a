//! Command history persisted between runs
//!
//! Stored as plain text, one entry per line, oldest first. Prompt sessions only
//! borrow the entries; lines are appended here after a session commits.

use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Bounded list of previously submitted lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    max_entries: usize,
    path: Option<PathBuf>,
}

impl History {
    /// History that never touches disk
    #[must_use]
    pub fn in_memory(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            path: None,
        }
    }

    /// Load entries from `path`, keeping the `max_entries` most recent.
    ///
    /// A missing file is an empty history.
    ///
    /// # Errors
    /// Returns an error if the file exists but can not be read.
    pub fn load(path: impl Into<PathBuf>, max_entries: usize) -> Result<Self> {
        let path = path.into();
        let mut history = Self {
            entries: Vec::new(),
            max_entries,
            path: None,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read history: {}", path.display()))?;
            history.entries = contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
            history.truncate();
            debug!(entries = history.entries.len(), path = %path.display(), "history loaded");
        }

        history.path = Some(path);
        Ok(history)
    }

    /// Default location: `$XDG_STATE_HOME/dbsh/history` (falls back to the data dir)
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|dir| dir.join("dbsh").join("history"))
    }

    /// Record a committed line. Blank lines and an immediate repeat are skipped.
    pub fn push(&mut self, line: &str) {
        if line.trim().is_empty() || self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        self.truncate();
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(0..excess);
        }
    }

    /// Entries oldest first, as borrowed by prompt sessions
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write entries back to disk; a no-op for in-memory history.
    ///
    /// # Errors
    /// Returns an error if the directory or file can not be written.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create history dir: {}", parent.display()))?;
        }

        let mut options = fs::OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .wrap_err_with(|| format!("Failed to open history: {}", path.display()))?;

        let mut contents = self.entries.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        file.write_all(contents.as_bytes())
            .wrap_err_with(|| format!("Failed to write history: {}", path.display()))?;

        info!(entries = self.entries.len(), path = %path.display(), "history saved");
        Ok(())
    }
}
