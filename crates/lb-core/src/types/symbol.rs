//! Symbol kinds and the symbol result shapes returned by language servers.
//!
//! Servers answer symbol queries with one of two shapes: a nested
//! [`DocumentSymbol`] tree, or a flat list of [`SymbolInformation`] with
//! container names. Both implement [`Symbol`], so reports can treat them
//! uniformly without inspecting which shape they got.

use serde::{Deserialize, Serialize};

use super::position::{Location, Range};

/// The protocol's enumeration of symbol kinds (1 through 26).
///
/// Values outside that range are preserved as [`SymbolKind::Unknown`] rather
/// than rejected, since servers occasionally send extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[allow(missing_docs)]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
    /// A kind number this crate does not know.
    Unknown(u8),
}

impl SymbolKind {
    const NAMED: [Self; 26] = [
        Self::File,
        Self::Module,
        Self::Namespace,
        Self::Package,
        Self::Class,
        Self::Method,
        Self::Property,
        Self::Field,
        Self::Constructor,
        Self::Enum,
        Self::Interface,
        Self::Function,
        Self::Variable,
        Self::Constant,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Array,
        Self::Object,
        Self::Key,
        Self::Null,
        Self::EnumMember,
        Self::Struct,
        Self::Event,
        Self::Operator,
        Self::TypeParameter,
    ];

    /// Returns the bare display name, e.g. `Function`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Module => "Module",
            Self::Namespace => "Namespace",
            Self::Package => "Package",
            Self::Class => "Class",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Enum => "Enum",
            Self::Interface => "Interface",
            Self::Function => "Function",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Key => "Key",
            Self::Null => "Null",
            Self::EnumMember => "EnumMember",
            Self::Struct => "Struct",
            Self::Event => "Event",
            Self::Operator => "Operator",
            Self::TypeParameter => "TypeParameter",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Returns the bracketed label used in reports, e.g. `[Function]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_core::SymbolKind;
    ///
    /// assert_eq!(SymbolKind::Struct.label(), "[Struct]");
    /// assert_eq!(SymbolKind::from(99).label(), "[Unknown]");
    /// ```
    #[must_use]
    pub fn label(self) -> String {
        format!("[{}]", self.name())
    }
}

impl From<u8> for SymbolKind {
    fn from(value: u8) -> Self {
        match value {
            1..=26 => Self::NAMED[usize::from(value - 1)],
            other => Self::Unknown(other),
        }
    }
}

impl From<SymbolKind> for u8 {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Unknown(value) => value,
            named => SymbolKind::NAMED
                .iter()
                .position(|k| *k == named)
                .and_then(|idx| u8::try_from(idx + 1).ok())
                .unwrap_or(0),
        }
    }
}

/// Common view over the symbol result shapes.
pub trait Symbol {
    /// Symbol name as reported by the server.
    fn name(&self) -> &str;

    /// Symbol kind.
    fn kind(&self) -> SymbolKind;

    /// Full range of the symbol.
    fn range(&self) -> Range;

    /// Nested symbols, if the shape carries any.
    fn children(&self) -> &[DocumentSymbol] {
        &[]
    }

    /// Name of the enclosing symbol, if the shape carries one.
    fn container_name(&self) -> Option<&str> {
        None
    }
}

/// A node of a hierarchical symbol tree for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSymbol {
    /// Symbol name.
    pub name: String,

    /// Extra detail such as a signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Symbol kind.
    pub kind: SymbolKind,

    /// Range enclosing the whole construct.
    pub range: Range,

    /// Range of the identifier itself.
    #[serde(default)]
    pub selection_range: Range,

    /// Nested symbols, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    /// Creates a childless symbol whose selection range equals its range.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind, range: Range) -> Self {
        Self {
            name: name.into(),
            detail: None,
            kind,
            range,
            selection_range: range,
            children: Vec::new(),
        }
    }

    /// Builder-style helper that appends a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

impl Symbol for DocumentSymbol {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn range(&self) -> Range {
        self.range
    }

    fn children(&self) -> &[DocumentSymbol] {
        &self.children
    }
}

/// A flat symbol entry with its location and optional container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInformation {
    /// Symbol name.
    pub name: String,

    /// Symbol kind.
    pub kind: SymbolKind,

    /// Where the symbol is defined.
    pub location: Location,

    /// Name of the enclosing symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
}

impl Symbol for SymbolInformation {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn range(&self) -> Range {
        self.location.range
    }

    fn container_name(&self) -> Option<&str> {
        self.container_name.as_deref()
    }
}

/// Response to a document symbol request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSymbolResponse {
    /// Hierarchical symbols.
    Nested(Vec<DocumentSymbol>),
    /// Flat symbols.
    Flat(Vec<SymbolInformation>),
}

impl Default for DocumentSymbolResponse {
    fn default() -> Self {
        Self::Nested(Vec::new())
    }
}

impl DocumentSymbolResponse {
    /// Returns `true` if the response holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Nested(symbols) => symbols.is_empty(),
            Self::Flat(symbols) => symbols.is_empty(),
        }
    }

    /// Top-level symbols as trait objects, in response order.
    #[must_use]
    pub fn symbols(&self) -> Vec<&dyn Symbol> {
        match self {
            Self::Nested(symbols) => symbols.iter().map(|s| s as &dyn Symbol).collect(),
            Self::Flat(symbols) => symbols.iter().map(|s| s as &dyn Symbol).collect(),
        }
    }

    /// Converts the response into a tree; flat symbols become childless roots.
    #[must_use]
    pub fn into_tree(self) -> Vec<DocumentSymbol> {
        match self {
            Self::Nested(symbols) => symbols,
            Self::Flat(symbols) => symbols
                .into_iter()
                .map(|s| DocumentSymbol::new(s.name, s.kind, s.location.range))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::position::Position;

    #[test]
    fn test_symbol_kind_from_u8() {
        assert_eq!(SymbolKind::from(1), SymbolKind::File);
        assert_eq!(SymbolKind::from(12), SymbolKind::Function);
        assert_eq!(SymbolKind::from(26), SymbolKind::TypeParameter);
        assert_eq!(SymbolKind::from(0), SymbolKind::Unknown(0));
        assert_eq!(SymbolKind::from(27), SymbolKind::Unknown(27));
    }

    #[test]
    fn test_symbol_kind_to_u8() {
        assert_eq!(u8::from(SymbolKind::File), 1);
        assert_eq!(u8::from(SymbolKind::Struct), 23);
        assert_eq!(u8::from(SymbolKind::Unknown(40)), 40);
    }

    #[test]
    fn test_symbol_kind_labels() {
        assert_eq!(SymbolKind::Method.label(), "[Method]");
        assert_eq!(SymbolKind::EnumMember.label(), "[EnumMember]");
        assert_eq!(SymbolKind::Unknown(0).label(), "[Unknown]");
    }

    #[test]
    fn test_nested_response_deserialize() {
        let json = r#"[{
            "name": "Outer",
            "kind": 5,
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 10, "character": 1}},
            "selectionRange": {"start": {"line": 0, "character": 6}, "end": {"line": 0, "character": 11}},
            "children": [{
                "name": "inner",
                "kind": 6,
                "range": {"start": {"line": 2, "character": 4}, "end": {"line": 4, "character": 5}}
            }]
        }]"#;
        let response: DocumentSymbolResponse = serde_json::from_str(json).unwrap();
        let DocumentSymbolResponse::Nested(symbols) = response else {
            panic!("expected nested symbols");
        };
        assert_eq!(symbols[0].kind, SymbolKind::Class);
        assert_eq!(symbols[0].children[0].name, "inner");
        assert_eq!(symbols[0].children[0].selection_range, Range::default());
    }

    #[test]
    fn test_flat_response_deserialize() {
        let json = r#"[{
            "name": "main",
            "kind": 12,
            "containerName": "pkg",
            "location": {
                "uri": "file:///m.go",
                "range": {"start": {"line": 3, "character": 0}, "end": {"line": 5, "character": 1}}
            }
        }]"#;
        let response: DocumentSymbolResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(response, DocumentSymbolResponse::Flat(_)));
        let symbols = response.symbols();
        assert_eq!(symbols[0].name(), "main");
        assert_eq!(symbols[0].container_name(), Some("pkg"));
        assert!(symbols[0].children().is_empty());

        let tree = response.into_tree();
        assert_eq!(tree[0].range.start, Position::new(3, 0));
    }

    #[test]
    fn test_symbol_kind_serializes_as_number() {
        let json = serde_json::to_string(&SymbolKind::Function).unwrap();
        assert_eq!(json, "12");
    }
}
