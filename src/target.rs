//! Connection targets and the alias file
//!
//! A target names the database the shell connects to. It comes either from an
//! explicit flag (`--spanner`, `--bigquery`) or from an alias looked up in
//! `$XDG_CONFIG_HOME/dbsh/alias`, one alias per line:
//!
//! ```text
//! # name   type      connection
//! prod     spanner   my-project/main/orders
//! stats    bigquery  analytics-project
//! ```

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// A Spanner database, `projects/<p>/instances/<i>/databases/<d>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePath {
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl DatabasePath {
    /// Full resource name used to open the connection
    #[must_use]
    pub fn resource_name(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }

    /// `<project>/<instance>/<database>`, shown in the prompt
    #[must_use]
    pub fn short_name(&self) -> String {
        format!("{}/{}/{}", self.project, self.instance, self.database)
    }
}

impl FromStr for DatabasePath {
    type Err = color_eyre::Report;

    /// Accepts the full resource name or the `<project>/<instance>/<database>` shorthand
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        let (project, instance, database) = match parts.as_slice() {
            [p, i, d] => (*p, *i, *d),
            ["projects", p, "instances", i, "databases", d] => (*p, *i, *d),
            _ => bail!(
                "Invalid Spanner database '{s}'. Use projects/P/instances/I/databases/D or P/I/D"
            ),
        };
        if [project, instance, database].iter().any(|part| part.is_empty()) {
            bail!("Invalid Spanner database '{s}': empty path segment");
        }
        Ok(Self {
            project: project.to_string(),
            instance: instance.to_string(),
            database: database.to_string(),
        })
    }
}

/// Database the shell talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Spanner(DatabasePath),
    /// BigQuery project ID
    BigQuery(String),
}

impl Target {
    /// Build a target from a type name (`spanner` or `bigquery`) and its connection string
    ///
    /// # Errors
    /// Returns an error for an unknown type or a malformed connection string.
    pub fn from_kind(kind: &str, connection: &str) -> Result<Self> {
        match kind {
            "spanner" => Ok(Self::Spanner(connection.parse()?)),
            "bigquery" => {
                if connection.is_empty() || connection.contains('/') {
                    bail!("Invalid BigQuery project '{connection}'");
                }
                Ok(Self::BigQuery(connection.to_string()))
            }
            other => bail!("Unknown database type '{other}'. Must be: spanner or bigquery"),
        }
    }

    /// Name shown before `> ` in the prompt
    #[must_use]
    pub fn prompt_name(&self) -> String {
        match self {
            Self::Spanner(path) => path.short_name(),
            Self::BigQuery(project) => project.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spanner(path) => write!(f, "spanner {}", path.resource_name()),
            Self::BigQuery(project) => write!(f, "bigquery {project}"),
        }
    }
}

/// Default alias file: `$XDG_CONFIG_HOME/dbsh/alias`
#[must_use]
pub fn alias_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dbsh").join("alias"))
}

/// Find `alias` in alias file contents; returns `(type, connection)`.
///
/// Blank lines and lines starting with `#` are skipped, as are lines with fewer
/// than three fields. The first matching line wins.
#[must_use]
pub fn lookup_alias<'a>(contents: &'a str, alias: &str) -> Option<(&'a str, &'a str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(name), Some(kind), Some(connection)) if name == alias => {
                    Some((kind, connection))
                }
                _ => None,
            }
        })
}

/// Resolve `alias` from the alias file at `path`
///
/// # Errors
/// Returns an error if the file can not be read, the alias is missing, or its
/// entry does not describe a valid target.
pub fn resolve_alias(path: &Path, alias: &str) -> Result<Target> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read alias file: {}", path.display()))?;

    let (kind, connection) = lookup_alias(&contents, alias)
        .ok_or_else(|| eyre!("Alias '{alias}' not found in {}", path.display()))?;
    debug!(alias, kind, connection, "resolved alias");

    Target::from_kind(kind, connection)
        .wrap_err_with(|| format!("Invalid entry for alias '{alias}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("p/i/d" ; "shorthand")]
    #[test_case("projects/p/instances/i/databases/d" ; "resource name")]
    fn database_path_accepts(input: &str) {
        let path: DatabasePath = input.parse().unwrap();
        assert_eq!(path.short_name(), "p/i/d");
        assert_eq!(path.resource_name(), "projects/p/instances/i/databases/d");
    }

    #[test_case("" ; "empty")]
    #[test_case("p/i" ; "two parts")]
    #[test_case("p/i/d/x" ; "four parts")]
    #[test_case("a/p/b/i/c/d" ; "six parts without keywords")]
    #[test_case("p//d" ; "empty segment")]
    #[test_case("projects/p/instances/i/databases/" ; "empty database")]
    fn database_path_rejects(input: &str) {
        assert!(input.parse::<DatabasePath>().is_err(), "{input} should be rejected");
    }

    #[test]
    fn prompt_names() {
        let spanner = Target::from_kind("spanner", "projects/p/instances/i/databases/d").unwrap();
        assert_eq!(spanner.prompt_name(), "p/i/d");
        let bigquery = Target::from_kind("bigquery", "analytics").unwrap();
        assert_eq!(bigquery.prompt_name(), "analytics");
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = Target::from_kind("postgres", "x").unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }

    const ALIASES: &str = "\
# name  type      connection
prod    spanner   my-project/main/orders

  # indented comment
stats   bigquery  analytics
broken  spanner
prod    bigquery  shadowed
";

    #[test]
    fn lookup_skips_comments_and_blank_lines() {
        assert_eq!(lookup_alias(ALIASES, "prod"), Some(("spanner", "my-project/main/orders")));
        assert_eq!(lookup_alias(ALIASES, "stats"), Some(("bigquery", "analytics")));
        assert_eq!(lookup_alias(ALIASES, "broken"), None);
        assert_eq!(lookup_alias(ALIASES, "#"), None);
        assert_eq!(lookup_alias(ALIASES, "missing"), None);
    }

    #[test]
    fn resolve_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alias");
        fs::write(&path, ALIASES).unwrap();

        let target = resolve_alias(&path, "prod").unwrap();
        assert_eq!(target.prompt_name(), "my-project/main/orders");

        let err = resolve_alias(&path, "missing").unwrap_err();
        assert!(err.to_string().contains("'missing' not found"));
    }

    #[test]
    fn missing_alias_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = resolve_alias(&dir.path().join("alias"), "prod").unwrap_err();
        assert!(err.to_string().contains("Failed to read alias file"));
    }
}
