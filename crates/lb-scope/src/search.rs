//! Symbol tree search.
//!
//! Finds the most specific symbol that contains a position. Children are
//! always preferred over their parent; between unrelated candidates the one
//! with the narrower range wins.

use lb_core::{DocumentSymbol, Position, Range};

/// Returns the smallest, deepest symbol in `symbols` that contains `position`.
///
/// A symbol contains a position when the position falls within its range,
/// boundaries included (see [`Range::contains`]). When several candidates
/// qualify, a smaller line span wins; on equal line spans, a smaller
/// character span wins; on a full tie the first one in document order is
/// kept.
///
/// # Examples
///
/// ```
/// use lb_core::{DocumentSymbol, Position, Range, SymbolKind};
/// use lb_scope::find_enclosing;
///
/// let span = |a, b| Range::new(Position::new(a, 0), Position::new(b, 0));
/// let tree = vec![
///     DocumentSymbol::new("Outer", SymbolKind::Class, span(0, 10))
///         .with_child(DocumentSymbol::new("Inner", SymbolKind::Method, span(2, 4))),
/// ];
///
/// assert_eq!(find_enclosing(&tree, Position::new(3, 0)).map(|s| s.name.as_str()), Some("Inner"));
/// assert_eq!(find_enclosing(&tree, Position::new(7, 0)).map(|s| s.name.as_str()), Some("Outer"));
/// assert!(find_enclosing(&tree, Position::new(20, 0)).is_none());
/// ```
#[must_use]
pub fn find_enclosing(symbols: &[DocumentSymbol], position: Position) -> Option<&DocumentSymbol> {
    let mut best: Option<&DocumentSymbol> = None;

    for symbol in symbols {
        if !symbol.range.contains(position) {
            continue;
        }
        let candidate = find_enclosing(&symbol.children, position).unwrap_or(symbol);
        if best.is_none_or(|current| is_narrower(&candidate.range, &current.range)) {
            best = Some(candidate);
        }
    }

    best
}

/// `true` if `a` is strictly narrower than `b`.
fn is_narrower(a: &Range, b: &Range) -> bool {
    match a.line_span().cmp(&b.line_span()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Equal => a.char_span() < b.char_span(),
        std::cmp::Ordering::Greater => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lb_core::SymbolKind;

    fn sym(name: &str, sl: u32, sc: u32, el: u32, ec: u32) -> DocumentSymbol {
        DocumentSymbol::new(
            name,
            SymbolKind::Function,
            Range::new(Position::new(sl, sc), Position::new(el, ec)),
        )
    }

    fn name_at(tree: &[DocumentSymbol], line: u32, character: u32) -> Option<&str> {
        find_enclosing(tree, Position::new(line, character)).map(|s| s.name.as_str())
    }

    #[test]
    fn test_child_beats_parent() {
        let tree = vec![sym("Outer", 0, 0, 10, 0).with_child(sym("Inner", 2, 0, 4, 0))];
        assert_eq!(name_at(&tree, 3, 0), Some("Inner"));
        assert_eq!(name_at(&tree, 7, 0), Some("Outer"));
        assert_eq!(name_at(&tree, 20, 0), None);
    }

    #[test]
    fn test_deep_nesting() {
        let tree = vec![
            sym("Class", 0, 0, 50, 1).with_child(
                sym("method", 5, 4, 20, 5).with_child(sym("closure", 10, 8, 12, 9)),
            ),
        ];
        assert_eq!(name_at(&tree, 11, 0), Some("closure"));
        assert_eq!(name_at(&tree, 15, 0), Some("method"));
        assert_eq!(name_at(&tree, 30, 0), Some("Class"));
    }

    #[test]
    fn test_boundary_characters() {
        let tree = vec![sym("f", 2, 4, 6, 1)];
        assert_eq!(name_at(&tree, 2, 3), None);
        assert_eq!(name_at(&tree, 2, 4), Some("f"));
        assert_eq!(name_at(&tree, 6, 1), Some("f"));
        assert_eq!(name_at(&tree, 6, 2), None);
    }

    #[test]
    fn test_overlapping_siblings_prefer_narrower() {
        let tree = vec![sym("wide", 0, 0, 20, 0), sym("narrow", 5, 0, 8, 0)];
        assert_eq!(name_at(&tree, 6, 0), Some("narrow"));

        let tree = vec![sym("long", 3, 0, 3, 40), sym("short", 3, 10, 3, 20)];
        assert_eq!(name_at(&tree, 3, 15), Some("short"));
    }

    #[test]
    fn test_tie_keeps_first() {
        let tree = vec![sym("first", 1, 0, 4, 0), sym("second", 1, 0, 4, 0)];
        assert_eq!(name_at(&tree, 2, 0), Some("first"));
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(name_at(&[], 0, 0), None);
    }
}
