//! Database backend capability interface
//!
//! Every backend offers the same small set of operations. The output format is
//! passed into each call rather than read from global state.

use crate::output::{OutputFormat, writer_for};
use color_eyre::eyre::{Result, WrapErr, bail};
use std::io::Write;
use tracing::{debug, info};

/// Operations the REPL needs from a database
pub trait Backend {
    /// Short name shown in the prompt
    fn name(&self) -> &str;

    /// Run one statement and print its result set.
    ///
    /// # Errors
    /// Returns an error if the statement fails or the result can not be written.
    fn execute(&mut self, query: &str, format: OutputFormat, out: &mut dyn Write) -> Result<()>;

    /// Run all statements in a single transaction.
    ///
    /// # Errors
    /// Returns an error if any statement fails; no statement takes effect then.
    fn execute_in_tx(
        &mut self,
        queries: &[String],
        format: OutputFormat,
        out: &mut dyn Write,
    ) -> Result<()>;

    /// Print the tables visible to this connection.
    ///
    /// # Errors
    /// Returns an error if the catalog query fails.
    fn list_tables(&mut self, format: OutputFormat, out: &mut dyn Write) -> Result<()>;

    /// Release the connection. Further calls fail.
    ///
    /// # Errors
    /// Returns an error if the connection can not be shut down cleanly.
    fn close(&mut self) -> Result<()>;
}

/// Backend that executes nothing and reports each statement it receives
///
/// Useful for exercising the shell (history, formats, piped input) without
/// credentials for a real database.
#[derive(Debug)]
pub struct DryRunBackend {
    name: String,
    closed: bool,
    executed: usize,
}

impl DryRunBackend {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            closed: false,
            executed: 0,
        }
    }

    /// Number of statements accepted so far
    #[must_use]
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            bail!("Connection '{}' is closed", self.name);
        }
        Ok(())
    }
}

impl Backend for DryRunBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, query: &str, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
        self.ensure_open()?;
        debug!(query, "dry-run execute");
        let mut writer = writer_for(format);
        writer.set_header(vec!["statement".to_string()]);
        writer.append_row(vec![query.to_string()]);
        writer.render(out).wrap_err("Failed to write result")?;
        self.executed += 1;
        Ok(())
    }

    fn execute_in_tx(
        &mut self,
        queries: &[String],
        format: OutputFormat,
        out: &mut dyn Write,
    ) -> Result<()> {
        self.ensure_open()?;
        info!(statements = queries.len(), "dry-run transaction");
        let mut writer = writer_for(format);
        writer.set_header(vec!["#".to_string(), "statement".to_string()]);
        for (i, query) in queries.iter().enumerate() {
            writer.append_row(vec![(i + 1).to_string(), query.clone()]);
        }
        writer.render(out).wrap_err("Failed to write result")?;
        self.executed += queries.len();
        Ok(())
    }

    fn list_tables(&mut self, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
        self.ensure_open()?;
        let mut writer = writer_for(format);
        writer.set_header(vec!["table_name".to_string()]);
        writer.render(out).wrap_err("Failed to write result")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn execute_reports_statement() {
        let mut db = DryRunBackend::new("db");
        let mut out = Vec::new();
        db.execute("select 1", OutputFormat::Csv, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "statement\nselect 1\n");
        assert_eq!(db.executed(), 1);
    }

    #[test]
    fn transaction_numbers_statements() {
        let mut db = DryRunBackend::new("db");
        let mut out = Vec::new();
        let queries = vec!["insert a".to_string(), "insert b".to_string()];
        db.execute_in_tx(&queries, OutputFormat::Csv, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "#,statement\n1,insert a\n2,insert b\n");
        assert_eq!(db.executed(), 2);
    }

    #[test]
    fn closed_backend_rejects_calls() {
        let mut db = DryRunBackend::new("db");
        db.close().unwrap();
        let mut out = Vec::new();
        let err = db.execute("select 1", OutputFormat::Table, &mut out).unwrap_err();
        assert!(err.to_string().contains("closed"));
        assert!(db.list_tables(OutputFormat::Table, &mut out).is_err());
    }
}
