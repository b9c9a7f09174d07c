//! In-memory language client and workspace fixture for report tests.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use lb_core::{
    ClientError, Diagnostic, DocumentSymbol, DocumentSymbolResponse, DocumentUri, FileChangeType,
    Hover, LanguageClient, Location, Position, Range, SymbolInformation, SymbolKind,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tempfile::TempDir;

pub fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

pub fn sym(name: &str, kind: SymbolKind, r: Range) -> DocumentSymbol {
    DocumentSymbol::new(name, kind, r)
}

/// A temporary workspace with files written on creation.
pub struct Workspace {
    _dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for (rel, content) in files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
        }
        Self { _dir: dir, root }
    }

    pub fn path(&self, rel: &str) -> Utf8PathBuf {
        self.root.join(rel)
    }

    pub fn uri(&self, rel: &str) -> DocumentUri {
        DocumentUri::from_path(&self.path(rel))
    }
}

#[derive(Default)]
pub struct FakeClient {
    pub workspace_symbols: Vec<SymbolInformation>,
    pub document_symbols: FxHashMap<DocumentUri, DocumentSymbolResponse>,
    pub references: FxHashMap<(DocumentUri, Position), Vec<Location>>,
    pub diagnostics: FxHashMap<DocumentUri, Vec<Diagnostic>>,
    pub hover: Option<Hover>,
    pub unavailable: bool,
    pub failing_references: bool,
    pub opened: Mutex<Vec<Utf8PathBuf>>,
    pub reference_queries: Mutex<Vec<(DocumentUri, Position, bool)>>,
}

impl FakeClient {
    pub fn with_definition(mut self, name: &str, kind: SymbolKind, location: Location) -> Self {
        self.workspace_symbols.push(SymbolInformation {
            name: name.to_owned(),
            kind,
            location,
            container_name: None,
        });
        self
    }

    pub fn with_symbols(mut self, uri: DocumentUri, symbols: Vec<DocumentSymbol>) -> Self {
        self.document_symbols
            .insert(uri, DocumentSymbolResponse::Nested(symbols));
        self
    }

    pub fn with_references(mut self, at: &Location, refs: Vec<Location>) -> Self {
        self.references.insert((at.uri.clone(), at.range.start), refs);
        self
    }

    fn check(&self, method: &str) -> Result<(), ClientError> {
        if self.unavailable {
            return Err(ClientError::Unavailable(format!("{method}: not connected")));
        }
        Ok(())
    }
}

#[async_trait]
impl LanguageClient for FakeClient {
    async fn open_file(&self, path: &Utf8Path) -> Result<(), ClientError> {
        self.check("textDocument/didOpen")?;
        self.opened.lock().push(path.to_owned());
        Ok(())
    }

    async fn notify_change(&self, _path: &Utf8Path) -> Result<(), ClientError> {
        Ok(())
    }

    async fn did_change_watched_files(
        &self,
        _uri: &DocumentUri,
        _change: FileChangeType,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    fn is_file_open(&self, path: &Utf8Path) -> bool {
        self.opened.lock().iter().any(|p| p == path)
    }

    async fn document_symbols(
        &self,
        uri: &DocumentUri,
    ) -> Result<DocumentSymbolResponse, ClientError> {
        self.check("textDocument/documentSymbol")?;
        Ok(self.document_symbols.get(uri).cloned().unwrap_or_default())
    }

    async fn workspace_symbols(&self, _query: &str) -> Result<Vec<SymbolInformation>, ClientError> {
        self.check("workspace/symbol")?;
        Ok(self.workspace_symbols.clone())
    }

    async fn references(
        &self,
        uri: &DocumentUri,
        position: Position,
        include_declaration: bool,
    ) -> Result<Vec<Location>, ClientError> {
        self.check("textDocument/references")?;
        self.reference_queries
            .lock()
            .push((uri.clone(), position, include_declaration));
        if self.failing_references {
            return Err(ClientError::request("textDocument/references", "boom"));
        }
        Ok(self
            .references
            .get(&(uri.clone(), position))
            .cloned()
            .unwrap_or_default())
    }

    async fn diagnostics(&self, uri: &DocumentUri) -> Result<Vec<Diagnostic>, ClientError> {
        self.check("textDocument/diagnostic")?;
        Ok(self.diagnostics.get(uri).cloned().unwrap_or_default())
    }

    async fn hover(
        &self,
        _uri: &DocumentUri,
        _position: Position,
    ) -> Result<Option<Hover>, ClientError> {
        self.check("textDocument/hover")?;
        Ok(self.hover.clone())
    }
}
