//! The document-symbols report.

use std::fmt::Write as _;

use camino::Utf8Path;
use lb_core::{DocumentUri, LanguageClient, Symbol};

use crate::error::ToolError;

/// Lists the symbols of one file as an indented tree.
///
/// ```text
/// Symbols in /ws/server.go
///
/// [Struct] Server (Lines 3-5)
///   [Field] Addr (Line 4)
/// [Function] main (Lines 7-9)
/// ```
///
/// Locations are printed only when `show_line_numbers` is set. Flat symbol
/// responses print the same way, without nesting.
///
/// # Errors
///
/// Returns [`ToolError::Client`] if the file cannot be opened or the symbol
/// request fails.
pub async fn document_symbols_report(
    client: &dyn LanguageClient,
    path: &Utf8Path,
    show_line_numbers: bool,
) -> Result<String, ToolError> {
    client.open_file(path).await?;
    let response = client.document_symbols(&DocumentUri::from_path(path)).await?;

    if response.is_empty() {
        return Ok(format!("No symbols found in {path}"));
    }

    let mut out = format!("Symbols in {path}\n\n");
    write_symbols(&mut out, &response.symbols(), 0, show_line_numbers);
    Ok(out)
}

/// Appends one line per symbol, recursing into children.
pub fn write_symbols(out: &mut String, symbols: &[&dyn Symbol], level: usize, show_line_numbers: bool) {
    let indent = "  ".repeat(level);
    for symbol in symbols {
        let _ = write!(out, "{indent}{} {}", symbol.kind().label(), symbol.name());
        if show_line_numbers {
            let range = symbol.range();
            if range.start.line == range.end.line {
                let _ = write!(out, " (Line {})", range.start.line + 1);
            } else {
                let _ = write!(out, " (Lines {}-{})", range.start.line + 1, range.end.line + 1);
            }
        }
        out.push('\n');

        let children: Vec<&dyn Symbol> = symbol.children().iter().map(|c| c as &dyn Symbol).collect();
        write_symbols(out, &children, level + 1, show_line_numbers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClient, range, sym};
    use lb_core::{
        ClientError, DocumentSymbolResponse, Location, SymbolInformation, SymbolKind,
    };

    fn uri() -> DocumentUri {
        DocumentUri::from_path(Utf8Path::new("/ws/server.go"))
    }

    #[tokio::test]
    async fn test_nested_symbols() {
        let client = FakeClient::default().with_symbols(
            uri(),
            vec![
                sym("Server", SymbolKind::Struct, range(2, 0, 4, 1))
                    .with_child(sym("Addr", SymbolKind::Field, range(3, 1, 3, 12))),
                sym("main", SymbolKind::Function, range(6, 0, 8, 1)),
            ],
        );
        let path = Utf8Path::new("/ws/server.go");

        let report = document_symbols_report(&client, path, true).await.unwrap();
        assert_eq!(
            report,
            "Symbols in /ws/server.go\n\n\
             [Struct] Server (Lines 3-5)\n\
             \x20 [Field] Addr (Line 4)\n\
             [Function] main (Lines 7-9)\n"
        );
        assert_eq!(client.opened.lock().as_slice(), [path.to_owned()]);

        let plain = document_symbols_report(&client, path, false).await.unwrap();
        assert!(plain.ends_with("[Struct] Server\n  [Field] Addr\n[Function] main\n"));
    }

    #[tokio::test]
    async fn test_flat_symbols() {
        let mut client = FakeClient::default();
        client.document_symbols.insert(
            uri(),
            DocumentSymbolResponse::Flat(vec![SymbolInformation {
                name: "Handler".to_owned(),
                kind: SymbolKind::from(99),
                location: Location::new(uri(), range(0, 0, 0, 10)),
                container_name: None,
            }]),
        );
        let report = document_symbols_report(&client, Utf8Path::new("/ws/server.go"), true)
            .await
            .unwrap();
        assert!(report.ends_with("[Unknown] Handler (Line 1)\n"));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let client = FakeClient::default();
        let report = document_symbols_report(&client, Utf8Path::new("/ws/empty.go"), true)
            .await
            .unwrap();
        assert_eq!(report, "No symbols found in /ws/empty.go");
    }

    #[tokio::test]
    async fn test_open_failure_is_an_error() {
        let client = FakeClient {
            unavailable: true,
            ..FakeClient::default()
        };
        let err = document_symbols_report(&client, Utf8Path::new("/ws/a.go"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Client(ClientError::Unavailable(_))));
    }
}
