//! Protocol domain types.
//!
//! These mirror the shapes a language server exchanges over the wire, limited
//! to what the watcher and the report layer need.
//!
//! # Module Organization
//!
//! - [`position`] - Positions, ranges, and locations
//! - [`uri`] - Document URIs and path conversion
//! - [`symbol`] - Symbol kinds, symbol trees, and the [`Symbol`] trait
//! - [`diagnostic`] - Diagnostics and hover results
//! - [`watch`] - Watch registrations, masks, and change kinds
//!
//! All public types are re-exported at the crate root:
//!
//! ```
//! use lb_core::{DocumentSymbol, Position, Range, SymbolKind};
//! ```

pub mod diagnostic;
pub mod position;
pub mod symbol;
pub mod uri;
pub mod watch;

pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSeverity, Hover, MarkupContent};
pub use position::{Location, Position, Range};
pub use symbol::{DocumentSymbol, DocumentSymbolResponse, Symbol, SymbolInformation, SymbolKind};
pub use uri::{DocumentUri, strip_uri_scheme};
pub use watch::{FileChangeType, GlobSpec, WatchKind, WatchRegistration};
