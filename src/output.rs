//! Result rendering: aligned tables or CSV
//!
//! The output format is a plain value handed to whoever renders results; nothing
//! here reads process-wide state.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// How query results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Sink for one result set
pub trait ResultWriter {
    fn set_header(&mut self, columns: Vec<String>);
    fn append_row(&mut self, row: Vec<String>);

    /// Write everything collected so far.
    ///
    /// # Errors
    /// Returns an error if writing to `out` fails.
    fn render(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Build the writer for `format`
#[must_use]
pub fn writer_for(format: OutputFormat) -> Box<dyn ResultWriter> {
    match format {
        OutputFormat::Table => Box::new(TableWriter::default()),
        OutputFormat::Csv => Box::new(CsvWriter::default()),
    }
}

/// Bordered table with columns aligned by display width
#[derive(Debug, Default)]
pub struct TableWriter {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableWriter {
    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in std::iter::once(&self.header).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }

    fn write_rule(out: &mut dyn Write, widths: &[usize]) -> io::Result<()> {
        let mut line = String::from("+");
        for w in widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        writeln!(out, "{line}")
    }

    fn write_row(out: &mut dyn Write, widths: &[usize], row: &[String]) -> io::Result<()> {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = row.get(i).map_or("", String::as_str);
            let pad = w.saturating_sub(cell.width());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        writeln!(out, "{line}")
    }
}

impl ResultWriter for TableWriter {
    fn set_header(&mut self, columns: Vec<String>) {
        self.header = columns;
    }

    fn append_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let widths = self.column_widths();
        if widths.is_empty() {
            return Ok(());
        }
        Self::write_rule(out, &widths)?;
        if !self.header.is_empty() {
            Self::write_row(out, &widths, &self.header)?;
            Self::write_rule(out, &widths)?;
        }
        for row in &self.rows {
            Self::write_row(out, &widths, row)?;
        }
        if !self.rows.is_empty() {
            Self::write_rule(out, &widths)?;
        }
        Ok(())
    }
}

/// Comma-separated output with RFC 4180 quoting
#[derive(Debug, Default)]
pub struct CsvWriter {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(out: &mut dyn Write, fields: &[String]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

impl ResultWriter for CsvWriter {
    fn set_header(&mut self, columns: Vec<String>) {
        self.header = columns;
    }

    fn append_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        if !self.header.is_empty() {
            csv_line(out, &self.header)?;
        }
        for row in &self.rows {
            csv_line(out, row)?;
        }
        Ok(())
    }
}
