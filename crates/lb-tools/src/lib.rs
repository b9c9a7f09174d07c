//! Text reports built from language server queries.
//!
//! Each report takes a [`LanguageClient`](lb_core::LanguageClient), issues
//! the requests it needs, resolves scopes through `lb-scope`, and returns
//! plain text meant for a human or an agent reading a terminal.
//!
//! | Report | Queries |
//! |--------|---------|
//! | [`find_references_report`] | workspace symbols, references, document symbols |
//! | [`read_definition_report`] | workspace symbols, document symbols |
//! | [`document_symbols_report`] | document symbols |
//! | [`diagnostics_report`] | diagnostics, optionally document symbols |
//! | [`hover_report`] | hover |
//!
//! "Nothing found" is a normal report, not an error. Reports fail only when
//! the request everything else depends on fails; secondary failures (one
//! file's symbols, one definition's references) are logged and skipped.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod definition;
pub mod diagnostics;
pub mod error;
pub mod hover;
pub mod references;
pub mod symbols;

#[cfg(test)]
mod testing;

pub use definition::read_definition_report;
pub use diagnostics::diagnostics_report;
pub use error::ToolError;
pub use hover::hover_report;
pub use references::find_references_report;
pub use symbols::{document_symbols_report, write_symbols};
