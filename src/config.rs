//! Configuration management
//!
//! Handles loading, parsing, and validating the TOML configuration file.
//! Command-line flags override individual settings after loading.

use crate::output::OutputFormat;
use color_eyre::eyre::{ContextCompat, Result, WrapErr, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Public Configuration Types
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
}

/// Shell settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection name shown before `> ` in the prompt
    pub prompt: String,
    pub format: OutputFormat,
    /// Maximum number of history entries kept
    pub history_size: usize,
    /// Save history to disk between runs
    pub persist_history: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_config_file(ConfigFile::default())
    }
}

// ============================================================================
// Config File Deserialization (TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default = "default_prompt")]
    prompt: String,
    #[serde(default)]
    format: OutputFormat,
    #[serde(default = "default_history_size")]
    history_size: usize,
    #[serde(default = "default_true")]
    persist_history: bool,
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_prompt() -> String {
    "db".to_string()
}

fn default_history_size() -> usize {
    1000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            format: OutputFormat::default(),
            history_size: default_history_size(),
            persist_history: true,
            log_level: default_log_level(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# dbsh configuration

[settings]
prompt = "db"            # Name shown before "> " in the prompt
format = "table"         # Result format: table or csv
history_size = 1000      # Entries kept in history (oldest dropped first)
persist_history = true   # Save history between runs
log_level = "warn"       # error, warn, info, debug, trace (RUST_LOG overrides)
"#;

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from the default XDG config path, creating it if missing
    ///
    /// # Errors
    /// Returns an error if the config directory is unavailable or the file is invalid.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Creating default config at {}", config_path.display());
            Self::create_default_config(&config_path)?;
        }

        Self::load_from_path(&config_path)
    }

    /// Load and validate a specific config file
    ///
    /// # Errors
    /// Returns an error if the file can not be read, parsed, or fails validation.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config: {}", path.display()))?;

        let config_file: ConfigFile = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config: {}", path.display()))?;

        let config = Self::from_config_file(config_file);
        config.validate()?;
        Ok(config)
    }

    fn from_config_file(config_file: ConfigFile) -> Self {
        let s = config_file.settings;
        Self {
            settings: Settings {
                prompt: s.prompt,
                format: s.format,
                history_size: s.history_size,
                persist_history: s.persist_history,
                log_level: s.log_level,
            },
        }
    }

    /// Check value ranges that serde can not express
    ///
    /// # Errors
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        match self.settings.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => bail!(
                "Invalid log_level '{level}'. Must be: error, warn, info, debug, or trace"
            ),
        }

        if self.settings.history_size == 0 {
            bail!("history_size must be at least 1");
        }

        if self.settings.prompt.chars().any(char::is_control) {
            bail!("prompt must not contain control characters");
        }

        Ok(())
    }

    /// Get the XDG config path for dbsh
    ///
    /// # Errors
    /// Returns an error if no config directory can be determined or created.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("dbsh");
        fs::create_dir_all(&config_dir)
            .wrap_err_with(|| format!("Failed to create config dir: {}", config_dir.display()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_CONFIG)
            .wrap_err_with(|| format!("Failed to write config: {}", path.display()))?;
        eprintln!("Created default config at: {}", path.display());
        Ok(())
    }

    /// Print a human-readable summary of the configuration
    pub fn print_summary(&self, path: Option<&Path>) {
        use crate::style::DbshStyle;

        println!("{}\n", "✓ Configuration valid".success());
        println!("{}", "Settings:".header());
        println!("  prompt: {}", self.settings.prompt);
        println!("  format: {}", self.settings.format);
        println!("  history_size: {}", self.settings.history_size);
        println!("  persist_history: {}", self.settings.persist_history);
        println!("  log_level: {}", self.settings.log_level);

        if let Some(path) = path {
            println!("\nConfig: {}", path.display().to_string().technical());
        }
    }
}
