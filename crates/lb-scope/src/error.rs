//! Error types for the lb-scope crate.
//!
//! This module provides the [`ScopeError`] type for errors that can occur
//! while reading source text or resolving a scope.

use camino::{Utf8Path, Utf8PathBuf};
use lb_core::Position;

/// Errors that can occur during scope resolution.
///
/// # Error Recovery Strategy
///
/// Every variant is recoverable: callers drop the affected reference or
/// definition and keep processing the rest.
///
/// - **Read errors** ([`ScopeError::Read`]): the scope text is unavailable
/// - **Line out of range** ([`ScopeError::LineOutOfRange`]): the server's
///   range does not fit the file on disk (usually a stale buffer)
/// - **No enclosing symbol** ([`ScopeError::NoEnclosingSymbol`]): nothing
///   matched; reports turn this into a "not found" message
///
/// # Examples
///
/// ```
/// use lb_core::Position;
/// use lb_scope::ScopeError;
///
/// let err = ScopeError::NoEnclosingSymbol(Position::new(4, 2));
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "no symbol encloses L5:C3");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// Failed to read a source file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A range refers to a line the text does not have.
    #[error("line {} is out of range (text has {total} lines)", .line + 1)]
    LineOutOfRange {
        /// The offending line (0-indexed).
        line: u32,
        /// Number of lines in the text.
        total: usize,
    },

    /// No symbol in the tree contains the position.
    #[error("no symbol encloses L{}:C{}", .0.line + 1, .0.character + 1)]
    NoEnclosingSymbol(Position),
}

impl ScopeError {
    /// Creates a read error for `path`.
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error means "nothing matched" rather than a failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoEnclosingSymbol(_))
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Read { path, .. } => Some(path),
            Self::LineOutOfRange { .. } | Self::NoEnclosingSymbol(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_carries_path() {
        let err = ScopeError::read(
            "/ws/main.go",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.path(), Some(Utf8Path::new("/ws/main.go")));
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to read file /ws/main.go"));
    }

    #[test]
    fn test_line_out_of_range_is_one_based() {
        let err = ScopeError::LineOutOfRange { line: 9, total: 3 };
        assert_eq!(err.to_string(), "line 10 is out of range (text has 3 lines)");
        assert!(err.path().is_none());
    }
}
