//! Scope resolution and rendering for lsp-bridge.
//!
//! This crate answers "which code construct does this position belong to,
//! and what should a reader see of it?" It works on data the language
//! server already produced (symbol trees, reference positions) plus the
//! file text on disk, and never talks to the server itself.
//!
//! # Overview
//!
//! - [`find_enclosing`]: smallest, deepest symbol containing a position
//! - [`extend_to_closing_bracket`]: repairs definitions whose reported range
//!   stops at an opening bracket
//! - [`full_definition`]: whole-line definition text for a position
//! - [`group_references`]: attributes references to scopes, falling back to
//!   a context window outside every symbol
//! - [`render_window`] / [`format_window`]: head, tail, and context
//!   rendering of long scopes with skip markers
//!
//! Everything here is synchronous and free of shared state, so it can be
//! called from any number of query tasks at once.
//!
//! # Example
//!
//! ```
//! use lb_core::{DocumentSymbol, Position, Range, RenderConfig, SymbolKind};
//! use lb_scope::{SourceText, format_window, group_references, render_window};
//!
//! let source = SourceText::new("func main() {\n\tgo serve()\n}\n");
//! let main = DocumentSymbol::new(
//!     "main",
//!     SymbolKind::Function,
//!     Range::new(Position::new(0, 0), Position::new(2, 1)),
//! );
//! let config = RenderConfig::default();
//!
//! let scopes = group_references(&[main], Some(&source), &[Position::new(1, 4)], &config);
//! let scope = &scopes[0];
//! let lines = render_window(&scope.text, scope.id.start_line + 1, &scope.highlight_offsets(), &config);
//! assert_eq!(format_window(&lines, true), "    1| func main() {\n    2> \tgo serve()\n    3| }\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod definition;
pub mod error;
pub mod extend;
pub mod group;
pub mod render;
pub mod search;
pub mod text;

pub use definition::{Definition, full_definition};
pub use error::ScopeError;
pub use extend::extend_to_closing_bracket;
pub use group::{CONTENT_UNAVAILABLE, Scope, ScopeId, ScopeKind, group_references};
pub use render::{RenderedLine, format_window, indent_block, number_lines, render_window};
pub use search::find_enclosing;
pub use text::SourceText;
