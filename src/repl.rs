//! Read/eval loop around the prompt
//!
//! Interactive mode reads one line per prompt session and hands it to the backend.
//! Piped mode reads all of stdin, splits it into statements, and runs them.

use crate::backend::Backend;
use crate::config::Config;
use crate::history::History;
use crate::output::OutputFormat;
use crate::prompt;
use crate::style::DbshStyle;
use color_eyre::eyre::{Result, WrapErr};
use std::io::{self, IsTerminal, Read, Write};
use tracing::{debug, error, info, warn};

/// What a committed line asks the shell to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    Exit,
    ListTables,
    /// Blank line
    Skip,
    Execute(String),
}

/// Interpret a committed line; side-channel commands are matched after trimming
#[must_use]
pub fn classify(line: &str) -> LineAction {
    match line.trim() {
        "" => LineAction::Skip,
        "exit" => LineAction::Exit,
        "\\dt" => LineAction::ListTables,
        _ => LineAction::Execute(line.to_string()),
    }
}

/// Split piped input on `;` into trimmed, non-empty statements
#[must_use]
pub fn split_statements(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Handle one committed line; returns `false` when the shell should stop.
///
/// Only executed statements are recorded in history. Backend failures are
/// reported on `out` and do not stop the loop.
///
/// # Errors
/// Returns an error only if writing to `out` fails.
pub fn handle_line(
    line: &str,
    history: &mut History,
    backend: &mut dyn Backend,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<bool> {
    match classify(line) {
        LineAction::Exit => return Ok(false),
        LineAction::Skip => {}
        LineAction::ListTables => {
            if let Err(e) = backend.list_tables(format, out) {
                warn!("list tables failed: {e:#}");
                writeln!(out, "{}", format!("Error listing tables: {e:#}").error())?;
            }
        }
        LineAction::Execute(query) => {
            history.push(&query);
            if let Err(e) = backend.execute(&query, format, out) {
                warn!("query failed: {e:#}");
                writeln!(out, "{}", format!("Failed to execute query: {e:#}").error())?;
            }
        }
    }
    Ok(true)
}

/// Run statements read from a pipe, echoing each one first.
///
/// # Errors
/// Returns the first backend failure; piped input stops at the first error.
pub fn run_piped(
    input: &str,
    backend: &mut dyn Backend,
    format: OutputFormat,
    transaction: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let statements = split_statements(input);
    info!(statements = statements.len(), transaction, "running piped input");

    for statement in &statements {
        writeln!(out, "{statement}")?;
        if !transaction {
            backend
                .execute(statement, format, out)
                .wrap_err_with(|| format!("Failed to execute: {statement}"))?;
        }
    }

    if transaction && !statements.is_empty() {
        backend
            .execute_in_tx(&statements, format, out)
            .wrap_err("Transaction failed")?;
    }
    Ok(())
}

/// Prompt until the user exits or cancels, then persist history.
///
/// # Errors
/// Returns an error if the terminal fails or writing output fails.
pub async fn run_interactive(
    config: &Config,
    history: &mut History,
    backend: &mut dyn Backend,
) -> Result<()> {
    let prompt = format!("{}> ", backend.name());
    let format = config.settings.format;
    let mut stdout = io::stdout();

    loop {
        let Some(line) = prompt::read_line(&prompt, history.entries()).await? else {
            debug!("input cancelled");
            break;
        };
        if !handle_line(&line, history, backend, format, &mut stdout)? {
            break;
        }
        stdout.flush()?;
    }

    if let Err(e) = history.save() {
        error!("failed to save history: {e:#}");
        eprintln!("{}", format!("Failed to save history: {e:#}").warning());
    }
    Ok(())
}

/// Entry point: piped when stdin is not a terminal, interactive otherwise.
///
/// # Errors
/// Returns an error if reading input, the terminal, or (piped) a statement fails.
pub async fn run(
    config: &Config,
    history: &mut History,
    backend: &mut dyn Backend,
    transaction: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let result = if stdin.is_terminal() {
        run_interactive(config, history, backend).await
    } else {
        let mut input = String::new();
        stdin
            .lock()
            .read_to_string(&mut input)
            .wrap_err("Failed to read from stdin")?;
        run_piped(
            &input,
            backend,
            config.settings.format,
            transaction,
            &mut io::stdout(),
        )
    };

    backend.close()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DryRunBackend;
    use color_eyre::eyre::bail;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("exit", LineAction::Exit ; "exit")]
    #[test_case("  exit  ", LineAction::Exit ; "exit padded")]
    #[test_case("\\dt", LineAction::ListTables ; "list tables")]
    #[test_case("", LineAction::Skip ; "empty")]
    #[test_case("   ", LineAction::Skip ; "blank")]
    #[test_case("select 1", LineAction::Execute("select 1".into()) ; "query")]
    #[test_case("exit now", LineAction::Execute("exit now".into()) ; "not a command")]
    fn classify_lines(line: &str, expected: LineAction) {
        assert_eq!(classify(line), expected);
    }

    #[test]
    fn split_statements_trims_and_drops_empty() {
        assert_eq!(
            split_statements(" select 1 ;\n\n;select 2;  "),
            vec!["select 1".to_string(), "select 2".to_string()]
        );
        assert!(split_statements(" ; ;\n").is_empty());
    }

    #[test]
    fn executed_lines_enter_history_commands_do_not() {
        let mut history = History::in_memory(10);
        let mut db = DryRunBackend::new("db");
        let mut out = Vec::new();

        assert!(handle_line("select 1", &mut history, &mut db, OutputFormat::Csv, &mut out).unwrap());
        assert!(handle_line("\\dt", &mut history, &mut db, OutputFormat::Csv, &mut out).unwrap());
        assert!(handle_line("", &mut history, &mut db, OutputFormat::Csv, &mut out).unwrap());
        assert!(!handle_line("exit", &mut history, &mut db, OutputFormat::Csv, &mut out).unwrap());

        assert_eq!(history.entries(), ["select 1"]);
        assert_eq!(db.executed(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "statement\nselect 1\ntable_name\n");
    }

    struct FailingBackend;

    impl Backend for FailingBackend {
        fn name(&self) -> &str {
            "broken"
        }
        fn execute(&mut self, _: &str, _: OutputFormat, _: &mut dyn Write) -> Result<()> {
            bail!("permission denied")
        }
        fn execute_in_tx(&mut self, _: &[String], _: OutputFormat, _: &mut dyn Write) -> Result<()> {
            bail!("aborted")
        }
        fn list_tables(&mut self, _: OutputFormat, _: &mut dyn Write) -> Result<()> {
            bail!("no catalog")
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn backend_errors_are_reported_and_loop_continues() {
        let mut history = History::in_memory(10);
        let mut out = Vec::new();
        let keep_going =
            handle_line("select 1", &mut history, &mut FailingBackend, OutputFormat::Table, &mut out)
                .unwrap();
        assert!(keep_going);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to execute query: permission denied"));
        // Still recorded so the user can recall and fix it
        assert_eq!(history.entries(), ["select 1"]);
    }

    #[test]
    fn piped_statements_run_one_by_one() {
        let mut db = DryRunBackend::new("db");
        let mut out = Vec::new();
        run_piped("select 1; select 2;", &mut db, OutputFormat::Csv, false, &mut out).unwrap();
        assert_eq!(db.executed(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "select 1\nstatement\nselect 1\nselect 2\nstatement\nselect 2\n"
        );
    }

    #[test]
    fn piped_transaction_runs_once() {
        let mut db = DryRunBackend::new("db");
        let mut out = Vec::new();
        run_piped("insert a; insert b", &mut db, OutputFormat::Csv, true, &mut out).unwrap();
        assert_eq!(db.executed(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "insert a\ninsert b\n#,statement\n1,insert a\n2,insert b\n"
        );
    }

    #[test]
    fn piped_failure_stops() {
        let mut out = Vec::new();
        let err = run_piped("select 1; select 2", &mut FailingBackend, OutputFormat::Csv, false, &mut out)
            .unwrap_err();
        assert!(format!("{err:#}").contains("permission denied"));
        assert_eq!(String::from_utf8(out).unwrap(), "select 1\n");
    }
}
