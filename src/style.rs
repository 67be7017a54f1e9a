//! Terminal styling utilities
//!
//! One small palette shared by the prompt and the REPL output:
//! - Reverse video for the cursor cell of the line editor
//! - Cyan bold for section titles
//! - Semantic red/yellow/green for errors, warnings and success

use crossterm::style::Stylize;

/// Extension trait for consistent dbsh styling
///
/// Use these methods instead of direct color calls so the prompt, summaries
/// and error lines keep the same visual language.
///
/// # Examples
///
/// ```
/// use dbsh::style::DbshStyle;
///
/// println!("{}", "Settings:".header());
/// println!("{}", "Failed to execute query".error());
/// ```
pub trait DbshStyle: Stylize {
    /// Style for the character under the editor cursor (reverse video)
    fn cursor_cell(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.reverse()
    }

    /// Style for section headers (cyan bold)
    fn header(self) -> <<Self as Stylize>::Styled as Stylize>::Styled
    where
        Self: Sized,
        <Self as Stylize>::Styled: Stylize,
    {
        self.cyan().bold()
    }

    /// Style for success messages (green)
    fn success(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.green()
    }

    /// Style for errors (red)
    fn error(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.red()
    }

    /// Style for warnings (yellow)
    fn warning(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.yellow()
    }

    /// Style for technical terms: paths, formats, counts
    fn technical(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.cyan()
    }
}

// Implement for all types that implement Stylize (String, &str, etc.)
impl<T: Stylize> DbshStyle for T {}
