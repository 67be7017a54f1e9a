//! `dbsh` - interactive database shell
//!
//! A REPL that reads statements with an embedded single-line editor and hands them
//! to a database backend.
//!
//! # Features
//! - Line editing with character and word-wise motion and deletion
//! - Up/Down recall of previously submitted lines, persisted between runs
//! - Table or CSV result output, chosen per invocation
//! - Piped mode: statements read from stdin, optionally in one transaction
//! - Connection targets given by flag or by alias from an alias file
//!
//! The editor core lives in [`prompt`]: [`prompt::LineEditor`] (buffer and cursor)
//! and [`prompt::InputSession`] (history recall, submit/cancel). Both are driven by
//! discrete [`prompt::KeyEvent`]s and are testable without a terminal.

pub mod backend;
pub mod cli;
pub mod config;
pub mod history;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod repl;
pub mod style;
pub mod target;

// Re-export commonly used types for convenience
pub use cli::Args;
pub use config::Config;
pub use history::History;

/// Build-time metadata generated by `build.rs`
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Version string with the short git hash when built from a checkout
#[must_use]
pub fn version_string() -> String {
    match built_info::GIT_COMMIT_HASH_SHORT {
        Some(hash) => format!("{} ({hash})", built_info::PKG_VERSION),
        None => built_info::PKG_VERSION.to_string(),
    }
}
