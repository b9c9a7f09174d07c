//! The language client seam.
//!
//! Everything in this workspace that talks to a language server does so
//! through [`LanguageClient`]. The process lifecycle, JSON-RPC framing, and
//! request bookkeeping live behind it; the watcher and the report layer
//! only see these calls.

use async_trait::async_trait;
use camino::Utf8Path;

use crate::error::ClientError;
use crate::types::{
    Diagnostic, DocumentSymbolResponse, DocumentUri, FileChangeType, Hover, Location, Position,
    SymbolInformation,
};

/// Operations consumed from a running language server connection.
///
/// Implementations must be cheap to share across tasks; the watcher holds
/// one behind an `Arc` and calls it from debounce timers and the bulk open
/// walk concurrently.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use camino::Utf8Path;
/// use lb_core::*;
///
/// struct Offline;
///
/// #[async_trait]
/// impl LanguageClient for Offline {
///     async fn open_file(&self, _: &Utf8Path) -> Result<(), ClientError> { Ok(()) }
///     async fn notify_change(&self, _: &Utf8Path) -> Result<(), ClientError> { Ok(()) }
///     async fn did_change_watched_files(&self, _: &DocumentUri, _: FileChangeType) -> Result<(), ClientError> { Ok(()) }
///     fn is_file_open(&self, _: &Utf8Path) -> bool { false }
///     async fn document_symbols(&self, _: &DocumentUri) -> Result<DocumentSymbolResponse, ClientError> { Ok(DocumentSymbolResponse::default()) }
///     async fn workspace_symbols(&self, _: &str) -> Result<Vec<SymbolInformation>, ClientError> { Ok(Vec::new()) }
///     async fn references(&self, _: &DocumentUri, _: Position, _: bool) -> Result<Vec<Location>, ClientError> { Ok(Vec::new()) }
///     async fn diagnostics(&self, _: &DocumentUri) -> Result<Vec<Diagnostic>, ClientError> { Ok(Vec::new()) }
///     async fn hover(&self, _: &DocumentUri, _: Position) -> Result<Option<Hover>, ClientError> { Ok(None) }
/// }
/// ```
#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Sends `textDocument/didOpen` for a file, reading its content from disk.
    ///
    /// Opening an already open file is a no-op.
    async fn open_file(&self, path: &Utf8Path) -> Result<(), ClientError>;

    /// Sends `textDocument/didChange` with the file's current content.
    async fn notify_change(&self, path: &Utf8Path) -> Result<(), ClientError>;

    /// Sends `workspace/didChangeWatchedFiles` for a single file.
    async fn did_change_watched_files(
        &self,
        uri: &DocumentUri,
        change: FileChangeType,
    ) -> Result<(), ClientError>;

    /// Returns `true` if the file has been opened and not closed since.
    fn is_file_open(&self, path: &Utf8Path) -> bool;

    /// Requests `textDocument/documentSymbol`.
    async fn document_symbols(
        &self,
        uri: &DocumentUri,
    ) -> Result<DocumentSymbolResponse, ClientError>;

    /// Requests `workspace/symbol` for a query string.
    async fn workspace_symbols(&self, query: &str) -> Result<Vec<SymbolInformation>, ClientError>;

    /// Requests `textDocument/references` at a position.
    async fn references(
        &self,
        uri: &DocumentUri,
        position: Position,
        include_declaration: bool,
    ) -> Result<Vec<Location>, ClientError>;

    /// Returns the diagnostics the server has published for a document.
    async fn diagnostics(&self, uri: &DocumentUri) -> Result<Vec<Diagnostic>, ClientError>;

    /// Requests `textDocument/hover` at a position.
    async fn hover(&self, uri: &DocumentUri, position: Position)
    -> Result<Option<Hover>, ClientError>;
}
