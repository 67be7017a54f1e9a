//! Command-line interface definitions
//!
//! Uses clap for argument parsing with derive macros.

use crate::config::Config;
use crate::output::OutputFormat;
use crate::target::{self, Target};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{ContextCompat, Result};
use std::path::{Path, PathBuf};

/// dbsh - interactive database shell
#[derive(Debug, Parser)]
#[command(name = "dbsh")]
#[command(version)]
#[command(about = "Interactive database shell with line editing and command history")]
#[command(after_help = "\
KEYS:
  Enter                      Run the line
  Esc, Ctrl+Q                Quit
  Ctrl+C                     Clear the line, or quit when it is empty
  Up / Down                  Older / newer history entry
  Left/Right, Ctrl+B/Ctrl+F  Move one character
  Alt+Left/Right, Alt+B/F    Move one word
  Home/End, Ctrl+A/Ctrl+E    Start / end of line
  Backspace, Delete, Ctrl+D  Delete one character
  Ctrl+W, Alt+Backspace      Delete the previous word
  Alt+D, Alt+Delete          Delete the next word

TARGETS:
  An alias is looked up in $XDG_CONFIG_HOME/dbsh/alias, one per line:
    <alias> <spanner|bigquery> <connection>
  Lines starting with '#' are comments.

COMMANDS:
  exit                       Leave the shell
  \\dt                        List tables

PIPED INPUT:
  When stdin is not a terminal, statements are read until EOF, split on ';'
  and executed one by one (or in a single transaction with --transaction).")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Alias name from the alias file
    #[arg(conflicts_with_all = ["spanner", "bigquery"])]
    pub alias: Option<String>,

    /// Spanner database: projects/P/instances/I/databases/D or P/I/D
    #[arg(long, value_name = "DATABASE", conflicts_with = "bigquery")]
    pub spanner: Option<String>,

    /// BigQuery project ID
    #[arg(long, value_name = "PROJECT")]
    pub bigquery: Option<String>,

    /// Name shown in the prompt (overrides config and target)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Result output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Execute piped statements in a single transaction
    #[arg(short, long)]
    pub transaction: bool,

    /// Do not read or write the history file
    #[arg(long)]
    pub no_history: bool,

    /// Use this config file instead of the XDG default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the config file and print a summary
    Validate,
}

impl Args {
    /// Apply flag overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(prompt) = &self.prompt {
            config.settings.prompt.clone_from(prompt);
        }
        if let Some(format) = self.format {
            config.settings.format = format;
        }
        if self.no_history {
            config.settings.persist_history = false;
        }
    }
}

impl Args {
    /// Connection target from the flags, or from the alias looked up in `alias_file`
    ///
    /// # Errors
    /// Returns an error if a flag value is malformed, or an alias is given and
    /// can not be resolved.
    pub fn target_with(&self, alias_file: Option<&Path>) -> Result<Option<Target>> {
        if let Some(alias) = &self.alias {
            let path = alias_file.context("Could not determine the alias file location")?;
            return target::resolve_alias(path, alias).map(Some);
        }
        if let Some(database) = &self.spanner {
            return Target::from_kind("spanner", database).map(Some);
        }
        if let Some(project) = &self.bigquery {
            return Target::from_kind("bigquery", project).map(Some);
        }
        Ok(None)
    }

    /// [`target_with`](Self::target_with) using the default alias file
    ///
    /// # Errors
    /// See [`target_with`](Self::target_with).
    pub fn target(&self) -> Result<Option<Target>> {
        self.target_with(target::alias_path().as_deref())
    }

    /// Name for the prompt: `--prompt`, else the target's name, else the config value
    #[must_use]
    pub fn connection_name(&self, config: &Config, target: Option<&Target>) -> String {
        match (&self.prompt, target) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(target)) => target.prompt_name(),
            (None, None) => config.settings.prompt.clone(),
        }
    }
}
