//! Display composition for the edited line (prompt, cursor cell, soft wrap)

use super::editor::Split;
use crate::style::DbshStyle;
use unicode_width::UnicodeWidthChar;

/// One displayed character and whether the cursor sits on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) cursor: bool,
}

impl Cell {
    fn plain(ch: char) -> Self {
        Self { ch, cursor: false }
    }

    /// Terminal columns this cell occupies (control and combining chars take none)
    fn width(self) -> usize {
        self.ch.width().unwrap_or(0)
    }
}

/// Lay out prompt, head, cursor cell and tail as a flat run of cells.
///
/// An empty cursor character (end of line) becomes a blank placeholder cell.
pub(crate) fn line_cells(prompt: &str, split: &Split) -> Vec<Cell> {
    let mut cells: Vec<Cell> = prompt.chars().chain(split.head.chars()).map(Cell::plain).collect();
    let cursor_ch = split.cursor.chars().next().unwrap_or(' ');
    cells.push(Cell {
        ch: cursor_ch,
        cursor: true,
    });
    cells.extend(split.tail.chars().map(Cell::plain));
    cells
}

/// Break cells into rows of at most `width` columns; `width == 0` disables wrapping.
///
/// A cell wider than the room left starts a new row; zero-width cells always stay
/// on the row of the character they follow.
pub(crate) fn wrap_cells(cells: &[Cell], width: usize) -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new()];
    let mut used = 0;
    for &cell in cells {
        let w = cell.width();
        if width > 0 && w > 0 && used > 0 && used + w > width {
            rows.push(Vec::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(cell);
        }
        used += w;
    }
    rows
}

fn paint_row(row: &[Cell]) -> String {
    let mut out = String::new();
    for cell in row {
        if cell.cursor {
            out.push_str(&cell.ch.to_string().cursor_cell().to_string());
        } else {
            out.push(cell.ch);
        }
    }
    out
}

/// Render the full line, rows joined with `\n`
pub(crate) fn render_line(prompt: &str, split: &Split, width: usize) -> String {
    let cells = line_cells(prompt, split);
    wrap_cells(&cells, width)
        .iter()
        .map(|row| paint_row(row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display width of each row of the rendered line
pub(crate) fn row_widths(prompt: &str, split: &Split, width: usize) -> Vec<usize> {
    wrap_cells(&line_cells(prompt, split), width)
        .iter()
        .map(|row| row.iter().map(|c| c.width()).sum())
        .collect()
}

/// Terminal rows taken by rows of the given widths once reflowed to `cols` columns.
///
/// Each row ends in a hard line break, so it reflows on its own; `cols == 0`
/// means no wrapping.
pub(crate) fn rows_on_screen(widths: &[usize], cols: usize) -> usize {
    widths
        .iter()
        .map(|&w| if cols == 0 { 1 } else { w.div_ceil(cols).max(1) })
        .sum()
}

/// Strip styling: the characters each row shows, for layout checks
#[cfg(test)]
pub(crate) fn plain_rows(prompt: &str, split: &Split, width: usize) -> Vec<String> {
    wrap_cells(&line_cells(prompt, split), width)
        .iter()
        .map(|row| row.iter().map(|c| c.ch).collect())
        .collect()
}
