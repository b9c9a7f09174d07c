//! A language client that logs requests instead of sending them.
//!
//! The CLI has no language server behind it. This client records which
//! files are open, logs every notification the watcher would send, and
//! answers document-symbol requests from a JSON file loaded up front.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use lb_core::{
    ClientError, Diagnostic, DocumentSymbolResponse, DocumentUri, FileChangeType, Hover,
    LanguageClient, Location, Position, SymbolInformation,
};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::info;

/// Logs notifications and serves a fixed symbol response.
#[derive(Debug, Default)]
pub struct DryRunClient {
    open: Mutex<FxHashSet<Utf8PathBuf>>,
    symbols: DocumentSymbolResponse,
}

impl DryRunClient {
    /// Creates a client with no symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `symbols` for every document-symbol request.
    #[must_use]
    pub fn with_symbols(mut self, symbols: DocumentSymbolResponse) -> Self {
        self.symbols = symbols;
        self
    }

    /// Loads a document-symbol response from a JSON file.
    ///
    /// Accepts both the nested and the flat response shape.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read and
    /// [`ClientError::Request`] if it is not a symbol response.
    pub fn load_symbols(path: &Utf8Path) -> Result<DocumentSymbolResponse, ClientError> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|err| ClientError::request("textDocument/documentSymbol", err.to_string()))
    }

    /// Number of files opened so far.
    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }
}

#[async_trait]
impl LanguageClient for DryRunClient {
    async fn open_file(&self, path: &Utf8Path) -> Result<(), ClientError> {
        if self.open.lock().insert(path.to_owned()) {
            info!(path = %path, "didOpen");
        }
        Ok(())
    }

    async fn notify_change(&self, path: &Utf8Path) -> Result<(), ClientError> {
        info!(path = %path, "didChange");
        Ok(())
    }

    async fn did_change_watched_files(
        &self,
        uri: &DocumentUri,
        change: FileChangeType,
    ) -> Result<(), ClientError> {
        info!(uri = %uri, change = change.as_str(), "didChangeWatchedFiles");
        Ok(())
    }

    fn is_file_open(&self, path: &Utf8Path) -> bool {
        self.open.lock().contains(path)
    }

    async fn document_symbols(
        &self,
        _uri: &DocumentUri,
    ) -> Result<DocumentSymbolResponse, ClientError> {
        Ok(self.symbols.clone())
    }

    async fn workspace_symbols(&self, _query: &str) -> Result<Vec<SymbolInformation>, ClientError> {
        Ok(Vec::new())
    }

    async fn references(
        &self,
        _uri: &DocumentUri,
        _position: Position,
        _include_declaration: bool,
    ) -> Result<Vec<Location>, ClientError> {
        Ok(Vec::new())
    }

    async fn diagnostics(&self, _uri: &DocumentUri) -> Result<Vec<Diagnostic>, ClientError> {
        Ok(Vec::new())
    }

    async fn hover(
        &self,
        _uri: &DocumentUri,
        _position: Position,
    ) -> Result<Option<Hover>, ClientError> {
        Ok(None)
    }
}
