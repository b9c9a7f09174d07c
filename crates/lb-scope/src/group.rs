//! Grouping of references by enclosing scope.
//!
//! Every reference in a file is attributed to the smallest symbol that
//! contains it. References outside every symbol (imports, package-level
//! statements, comments) get a context window centred on the reference
//! instead. Such windows are a heuristic: two nearby references can share
//! one window, and overlapping windows are not merged, so the result is not
//! guaranteed to partition the references.

use lb_core::{DocumentSymbol, Position, Range, RenderConfig, SymbolKind};
use rustc_hash::FxHashMap;

use crate::search::find_enclosing;
use crate::text::SourceText;

/// Text used when a symbol scope is found but the file could not be read.
pub const CONTENT_UNAVAILABLE: &str = "[File content unavailable]";

/// Identifies a scope within one file by its line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    /// First line (0-indexed).
    pub start_line: u32,
    /// Last line (0-indexed).
    pub end_line: u32,
}

impl ScopeId {
    fn of(range: Range) -> Self {
        Self {
            start_line: range.start.line,
            end_line: range.end.line,
        }
    }
}

/// What a scope is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// A symbol from the document symbol tree.
    Symbol {
        /// Symbol name.
        name: String,
        /// Symbol kind.
        kind: SymbolKind,
    },
    /// A context window around a reference outside every symbol.
    Context {
        /// 0-indexed line of the reference the window was built for.
        anchor_line: u32,
    },
}

/// A scope together with the references it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Line span of the scope.
    pub id: ScopeId,
    /// Symbol or context window.
    pub kind: ScopeKind,
    /// Scope text, starting at [`ScopeId::start_line`].
    pub text: String,
    /// Reference positions in input order.
    pub references: Vec<Position>,
}

impl Scope {
    /// Header line, e.g. `  [Function] main (lines 3-9, 2 references)`.
    #[must_use]
    pub fn header(&self) -> String {
        let lines = format!(
            "lines {}-{}, {} references",
            self.id.start_line + 1,
            self.id.end_line + 1,
            self.references.len()
        );
        match &self.kind {
            ScopeKind::Symbol { name, kind } => format!("  {} {name} ({lines})", kind.label()),
            ScopeKind::Context { anchor_line } => {
                format!("  Scope: Context near L{} ({lines})", anchor_line + 1)
            }
        }
    }

    /// Offsets of the referenced lines relative to the scope's first line.
    #[must_use]
    pub fn highlight_offsets(&self) -> Vec<usize> {
        self.references
            .iter()
            .filter_map(|pos| pos.line.checked_sub(self.id.start_line))
            .map(|offset| offset as usize)
            .collect()
    }
}

/// Groups `references` of one file into scopes, ordered by start line.
///
/// `source` is the file's text, or `None` if it could not be read. Without
/// text, symbol scopes carry [`CONTENT_UNAVAILABLE`] and references outside
/// every symbol are dropped, since no context window can be built.
///
/// # Examples
///
/// ```
/// use lb_core::{DocumentSymbol, Position, Range, RenderConfig, SymbolKind};
/// use lb_scope::{SourceText, group_references};
///
/// let source = SourceText::new("import \"x\"\n\nfunc main() {\n\tx.Run()\n\tx.Stop()\n}\n");
/// let main = DocumentSymbol::new(
///     "main",
///     SymbolKind::Function,
///     Range::new(Position::new(2, 0), Position::new(5, 1)),
/// );
/// let refs = [Position::new(3, 1), Position::new(4, 1)];
///
/// let scopes = group_references(&[main], Some(&source), &refs, &RenderConfig::default());
/// assert_eq!(scopes.len(), 1);
/// assert_eq!(scopes[0].header(), "  [Function] main (lines 3-6, 2 references)");
/// ```
#[must_use]
pub fn group_references(
    symbols: &[DocumentSymbol],
    source: Option<&SourceText>,
    references: &[Position],
    config: &RenderConfig,
) -> Vec<Scope> {
    let mut scopes: FxHashMap<ScopeId, Scope> = FxHashMap::default();

    for &reference in references {
        if let Some(symbol) = find_enclosing(symbols, reference) {
            let id = ScopeId::of(symbol.range);
            scopes
                .entry(id)
                .or_insert_with(|| Scope {
                    id,
                    kind: ScopeKind::Symbol {
                        name: symbol.name.clone(),
                        kind: symbol.kind,
                    },
                    text: symbol_text(source, symbol),
                    references: Vec::new(),
                })
                .references
                .push(reference);
            continue;
        }

        let Some(source) = source else {
            tracing::debug!(line = reference.line + 1, "no text for reference outside any symbol");
            continue;
        };
        match source.context_window(reference.line, config.fallback_context_lines) {
            Ok((text, window)) => {
                let id = ScopeId::of(window);
                scopes
                    .entry(id)
                    .or_insert_with(|| Scope {
                        id,
                        kind: ScopeKind::Context {
                            anchor_line: reference.line,
                        },
                        text,
                        references: Vec::new(),
                    })
                    .references
                    .push(reference);
            }
            Err(err) => {
                tracing::warn!(line = reference.line + 1, error = %err, "no context for reference");
            }
        }
    }

    let mut scopes: Vec<Scope> = scopes.into_values().collect();
    scopes.sort_by_key(|scope| scope.id);
    scopes
}

fn symbol_text(source: Option<&SourceText>, symbol: &DocumentSymbol) -> String {
    let Some(source) = source else {
        return CONTENT_UNAVAILABLE.to_owned();
    };
    source.text_for_range(symbol.range).unwrap_or_else(|err| {
        tracing::warn!(symbol = %symbol.name, error = %err, "failed to extract symbol text");
        format!("Error fetching text for symbol '{}'", symbol.name)
    })
}
