//! Positions, ranges, and locations inside text documents.
//!
//! Lines and characters are 0-indexed, as on the wire. Reports convert to
//! 1-indexed numbers only when printing.

use serde::{Deserialize, Serialize};

use super::uri::DocumentUri;

/// A zero-based line/character position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,

    /// Character offset within the line (0-indexed).
    pub character: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open span between two positions.
///
/// # Examples
///
/// ```
/// use lb_core::{Position, Range};
///
/// let range = Range::new(Position::new(2, 0), Position::new(4, 1));
/// assert!(range.contains(Position::new(3, 40)));
/// assert!(!range.contains(Position::new(4, 2)));
/// assert_eq!(range.line_span(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start of the range.
    pub start: Position,

    /// End of the range.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `pos` lies within the range.
    ///
    /// On the start line the character must not precede the start character;
    /// on the end line it must not pass the end character. Both boundaries
    /// are inclusive.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        if pos.line < self.start.line || pos.line > self.end.line {
            return false;
        }
        if pos.line == self.start.line && pos.character < self.start.character {
            return false;
        }
        if pos.line == self.end.line && pos.character > self.end.character {
            return false;
        }
        true
    }

    /// Number of lines between start and end (0 for a single-line range).
    #[inline]
    #[must_use]
    pub const fn line_span(&self) -> i64 {
        self.end.line as i64 - self.start.line as i64
    }

    /// Character distance between start and end, ignoring lines.
    #[inline]
    #[must_use]
    pub const fn char_span(&self) -> i64 {
        self.end.character as i64 - self.start.character as i64
    }

    /// Returns `true` if every coordinate is zero.
    ///
    /// Some servers report such ranges for symbols they cannot place.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.start.line == 0
            && self.start.character == 0
            && self.end.line == 0
            && self.end.character == 0
    }
}

/// A range inside a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// The document.
    pub uri: DocumentUri,

    /// The range inside the document.
    pub range: Range,
}

impl Location {
    /// Creates a new location.
    #[inline]
    #[must_use]
    pub const fn new(uri: DocumentUri, range: Range) -> Self {
        Self { uri, range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_contains_boundaries() {
        let r = range(2, 4, 5, 1);
        assert!(r.contains(Position::new(2, 4)));
        assert!(!r.contains(Position::new(2, 3)));
        assert!(r.contains(Position::new(5, 1)));
        assert!(!r.contains(Position::new(5, 2)));
        assert!(r.contains(Position::new(3, 999)));
        assert!(!r.contains(Position::new(1, 10)));
        assert!(!r.contains(Position::new(6, 0)));
    }

    #[test]
    fn test_spans() {
        let r = range(3, 8, 3, 2);
        assert_eq!(r.line_span(), 0);
        assert_eq!(r.char_span(), -6);
    }

    #[test]
    fn test_is_zero() {
        assert!(Range::default().is_zero());
        assert!(!range(0, 0, 0, 1).is_zero());
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_location_deserialize() {
        let json = r#"{"uri":"file:///a.go","range":{"start":{"line":1,"character":2},"end":{"line":1,"character":5}}}"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.uri.as_str(), "file:///a.go");
        assert_eq!(loc.range, range(1, 2, 1, 5));
    }
}
