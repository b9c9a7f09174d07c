//! Source text access by line and range.
//!
//! [`SourceText`] is a file split into lines once, so one file can serve
//! every reference that lands in it. Line endings are normalized: `\r\n`
//! becomes `\n` before splitting.
//!
//! Character offsets are treated as `char` indices and clamped to the line
//! length, so a stale or slightly-off range from the server never panics.

use camino::Utf8Path;
use lb_core::{Position, Range};

use crate::error::ScopeError;

/// A document split into lines.
///
/// # Examples
///
/// ```
/// use lb_core::{Position, Range};
/// use lb_scope::SourceText;
///
/// let source = SourceText::new("fn a() {\r\n    1\r\n}\r\n");
/// assert_eq!(source.line_count(), 4);
/// assert_eq!(source.line(1), Some("    1"));
///
/// let range = Range::new(Position::new(0, 3), Position::new(0, 4));
/// assert_eq!(source.text_for_range(range).unwrap(), "a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    /// Splits `content` into lines.
    ///
    /// A trailing newline yields a final empty line, matching how editors
    /// number the position after it.
    #[must_use]
    pub fn new(content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n");
        Self {
            lines: normalized.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Reads and splits the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Read`] if the file cannot be read as UTF-8.
    pub fn read(path: &Utf8Path) -> Result<Self, ScopeError> {
        std::fs::read_to_string(path)
            .map(|content| Self::new(&content))
            .map_err(|source| ScopeError::read(path, source))
    }

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at `idx` (0-indexed), without its terminator.
    #[must_use]
    pub fn line(&self, idx: u32) -> Option<&str> {
        self.lines.get(idx as usize).map(String::as_str)
    }

    fn checked_line(&self, idx: u32) -> Result<&str, ScopeError> {
        self.line(idx).ok_or(ScopeError::LineOutOfRange {
            line: idx,
            total: self.lines.len(),
        })
    }

    /// The exact text covered by `range`.
    ///
    /// Character offsets past the end of a line are clamped. On a single
    /// line an inverted character range yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::LineOutOfRange`] if either end line does not
    /// exist or the range ends before it starts.
    pub fn text_for_range(&self, range: Range) -> Result<String, ScopeError> {
        let first = self.checked_line(range.start.line)?;
        let last = self.checked_line(range.end.line)?;
        if range.start.line > range.end.line {
            return Err(ScopeError::LineOutOfRange {
                line: range.end.line,
                total: self.lines.len(),
            });
        }

        let start = byte_offset(first, range.start.character);
        if range.start.line == range.end.line {
            let end = byte_offset(first, range.end.character).max(start);
            return Ok(first[start..end].to_owned());
        }

        let mut text = String::from(&first[start..]);
        for line in &self.lines[range.start.line as usize + 1..range.end.line as usize] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&last[..byte_offset(last, range.end.character)]);
        Ok(text)
    }

    /// Whole lines `start..=end`, joined with `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::LineOutOfRange`] if `end` does not exist or
    /// precedes `start`.
    pub fn lines_between(&self, start: u32, end: u32) -> Result<String, ScopeError> {
        self.checked_line(end)?;
        if start > end {
            return Err(ScopeError::LineOutOfRange {
                line: start,
                total: self.lines.len(),
            });
        }
        Ok(self.lines[start as usize..=end as usize].join("\n"))
    }

    /// Lines within `radius` of `line`, clamped to the file.
    ///
    /// Returns the text and the range it covers: column 0 of the first line
    /// to the end of the last.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::LineOutOfRange`] if `line` does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_scope::SourceText;
    ///
    /// let source = SourceText::new("a\nb\nc\nd");
    /// let (text, range) = source.context_window(0, 1).unwrap();
    /// assert_eq!(text, "a\nb");
    /// assert_eq!((range.start.line, range.end.line, range.end.character), (0, 1, 1));
    /// ```
    pub fn context_window(&self, line: u32, radius: u32) -> Result<(String, Range), ScopeError> {
        self.checked_line(line)?;
        let last_line = u32::try_from(self.lines.len() - 1).unwrap_or(u32::MAX);
        let start = line.saturating_sub(radius);
        let end = line.saturating_add(radius).min(last_line);

        let text = self.lines_between(start, end)?;
        let end_char = self
            .line(end)
            .map_or(0, |l| u32::try_from(l.chars().count()).unwrap_or(u32::MAX));
        let range = Range::new(Position::new(start, 0), Position::new(end, end_char));
        Ok((text, range))
    }
}

/// Byte offset of the `character`-th char of `line`, clamped to its length.
fn byte_offset(line: &str, character: u32) -> usize {
    line.char_indices()
        .nth(character as usize)
        .map_or(line.len(), |(idx, _)| idx)
}
