//! Bracket-balance range extension.
//!
//! Some servers report a definition's range as ending on the line that
//! opens its body, e.g. a `const (` block or a struct literal. When the
//! nominal end line ends with an opening bracket, the range is extended to
//! the bracket that closes it.

use lb_core::{Position, Range};
use smallvec::SmallVec;

use crate::text::SourceText;

const fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        _ => None,
    }
}

const fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '>')
}

/// Extends `range` to the bracket closing the one that ends its last line.
///
/// Scanning starts on the line after `range.end.line` with the trailing
/// opener on the stack. Openers push, matching closers pop, and closers that
/// do not match the top of the stack are ignored. The new end is just past
/// the closer that empties the stack. If the last line does not end with an
/// opener, or the file ends first, `range` is returned unchanged.
///
/// # Examples
///
/// ```
/// use lb_core::{Position, Range};
/// use lb_scope::{SourceText, extend_to_closing_bracket};
///
/// let source = SourceText::new("const (\n    A = 1\n    B = 2\n)\nvar x");
/// let nominal = Range::new(Position::new(0, 0), Position::new(0, 7));
/// let extended = extend_to_closing_bracket(&source, nominal);
/// assert_eq!(extended.end, Position::new(3, 1));
/// ```
#[must_use]
pub fn extend_to_closing_bracket(source: &SourceText, range: Range) -> Range {
    let Some(opener) = source
        .line(range.end.line)
        .and_then(|line| line.trim_end().chars().last())
        .filter(|c| closer_for(*c).is_some())
    else {
        return range;
    };

    let mut stack: SmallVec<[char; 16]> = SmallVec::new();
    stack.push(opener);

    let mut line_no = range.end.line.saturating_add(1);
    while let Some(line) = source.line(line_no) {
        for (idx, c) in line.chars().enumerate() {
            if closer_for(c).is_some() {
                stack.push(c);
            } else if is_closer(c) && stack.last().and_then(|open| closer_for(*open)) == Some(c) {
                stack.pop();
                if stack.is_empty() {
                    let end_char = u32::try_from(idx + 1).unwrap_or(u32::MAX);
                    return Range::new(range.start, Position::new(line_no, end_char));
                }
            }
        }
        line_no += 1;
    }

    tracing::trace!(line = range.end.line + 1, "no closing bracket before end of file");
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal(line: u32) -> Range {
        Range::new(Position::new(line, 0), Position::new(line, 12))
    }

    #[test]
    fn test_extends_over_nested_blocks() {
        let source = SourceText::new(
            "func Foo() {\n\tif x {\n\t\ty()\n\t}\n\tfor {\n\t}\n}\nfunc Bar() {}",
        );
        let extended = extend_to_closing_bracket(&source, nominal(0));
        assert_eq!(extended.start, Position::new(0, 0));
        assert_eq!(extended.end, Position::new(6, 1));
    }

    #[test]
    fn test_no_trailing_opener_is_unchanged() {
        let source = SourceText::new("func Foo() { return }\nfunc Bar() {\n}");
        assert_eq!(extend_to_closing_bracket(&source, nominal(0)), nominal(0));
    }

    #[test]
    fn test_unclosed_is_unchanged() {
        let source = SourceText::new("var x = [\n  1,\n  2,\n");
        assert_eq!(extend_to_closing_bracket(&source, nominal(0)), nominal(0));
    }

    #[test]
    fn test_trailing_whitespace_is_ignored() {
        let source = SourceText::new("type T struct {   \n\tA int\n}");
        assert_eq!(extend_to_closing_bracket(&source, nominal(0)).end, Position::new(2, 1));
    }

    #[test]
    fn test_mismatched_closers_are_ignored() {
        let source = SourceText::new("call(\n  a] } )\n  b\n)");
        let extended = extend_to_closing_bracket(&source, nominal(0));
        assert_eq!(extended.end, Position::new(1, 8));

        let source = SourceText::new("x := map[string]int{\n\t\"a\": f(1)],\n}");
        let extended = extend_to_closing_bracket(&source, nominal(0));
        assert_eq!(extended.end, Position::new(2, 1));
    }

    #[test]
    fn test_angle_brackets() {
        let source = SourceText::new("let v: Vec<\n    u8,\n> = vec![];");
        assert_eq!(extend_to_closing_bracket(&source, nominal(0)).end, Position::new(2, 1));
    }

    #[test]
    fn test_line_past_end_is_unchanged() {
        let source = SourceText::new("a");
        assert_eq!(extend_to_closing_bracket(&source, nominal(9)), nominal(9));
    }
}
