//! Full-definition extraction.

use lb_core::{DocumentSymbol, Position, Range};

use crate::error::ScopeError;
use crate::extend::extend_to_closing_bracket;
use crate::search::find_enclosing;
use crate::text::SourceText;

/// A definition's text and the whole-line range it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Whole lines from the start of the symbol to its (extended) end.
    pub text: String,
    /// Range of the definition; the start character is always 0.
    pub range: Range,
}

/// Extracts the definition of the smallest symbol enclosing `position`.
///
/// The symbol's range is widened to the start of its first line, then
/// extended to the closing bracket if its last line ends with an opener.
/// The text covers whole lines.
///
/// # Errors
///
/// Returns [`ScopeError::NoEnclosingSymbol`] if no symbol contains
/// `position`, or [`ScopeError::LineOutOfRange`] if the symbol's range does
/// not fit `source`.
///
/// # Examples
///
/// ```
/// use lb_core::{DocumentSymbol, Position, Range, SymbolKind};
/// use lb_scope::{SourceText, full_definition};
///
/// let source = SourceText::new("var (\n\ta = 1\n\tb = 2\n)\n");
/// let block = DocumentSymbol::new(
///     "a",
///     SymbolKind::Variable,
///     Range::new(Position::new(0, 4), Position::new(0, 5)),
/// );
///
/// let def = full_definition(&source, &[block], Position::new(0, 4)).unwrap();
/// assert_eq!(def.text, "var (\n\ta = 1\n\tb = 2\n)");
/// assert_eq!((def.range.start.line, def.range.end.line), (0, 3));
/// ```
pub fn full_definition(
    source: &SourceText,
    symbols: &[DocumentSymbol],
    position: Position,
) -> Result<Definition, ScopeError> {
    let symbol =
        find_enclosing(symbols, position).ok_or(ScopeError::NoEnclosingSymbol(position))?;

    let mut range = symbol.range;
    range.start.character = 0;
    if source.line(range.end.line).is_none() {
        return Err(ScopeError::LineOutOfRange {
            line: range.end.line,
            total: source.line_count(),
        });
    }

    let range = extend_to_closing_bracket(source, range);
    let text = source.lines_between(range.start.line, range.end.line)?;
    Ok(Definition { text, range })
}
