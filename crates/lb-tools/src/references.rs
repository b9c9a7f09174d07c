//! The find-references report.
//!
//! Output shape:
//!
//! ```text
//! Symbol: Serve (3 references in 2 files)
//! File: /ws/server.go (2 references)
//!   [Function] main (lines 10-24, 2 references)
//!     References: L12:C2, L20:C9
//!        10| func main() {
//!        ...
//! <blank line between files>
//! File: /ws/cmd/run.go (1 references)
//!   Scope: Context near L3 (lines 1-8, 1 references)
//!     References: L3:C5
//!     ...
//! ```

use std::collections::BTreeMap;

use futures_util::future::join_all;
use lb_core::{DocumentUri, LanguageClient, Location, Position, RenderConfig};
use lb_scope::{Scope, SourceText, format_window, group_references, indent_block, render_window};
use rustc_hash::FxHashSet;

use crate::error::ToolError;

/// Lists every reference to `symbol_name`, grouped by file and enclosing scope.
///
/// Definitions are looked up with a workspace symbol query; only exact name
/// matches with a usable location count. References are requested for each
/// definition without the declaration itself. A failed reference or symbol
/// request drops that contribution and the rest of the report is still
/// produced.
///
/// # Errors
///
/// Returns [`ToolError::Client`] only if the workspace symbol query fails.
pub async fn find_references_report(
    client: &dyn LanguageClient,
    symbol_name: &str,
    show_line_numbers: bool,
    config: &RenderConfig,
) -> Result<String, ToolError> {
    let definitions = definition_locations(client, symbol_name).await?;
    if definitions.is_empty() {
        return Ok(format!("Symbol definition not found for: {symbol_name}"));
    }

    let mut by_file: BTreeMap<DocumentUri, Vec<Position>> = BTreeMap::new();
    let mut total = 0usize;
    for definition in &definitions {
        match client
            .references(&definition.uri, definition.range.start, false)
            .await
        {
            Ok(refs) => {
                total += refs.len();
                for reference in refs {
                    by_file
                        .entry(reference.uri)
                        .or_default()
                        .push(reference.range.start);
                }
            }
            Err(err) => tracing::warn!(
                uri = %definition.uri,
                line = definition.range.start.line + 1,
                error = %err,
                "failed to get references"
            ),
        }
    }

    if total == 0 {
        return Ok(format!(
            "No references found for symbol: {symbol_name} (definition found at {} location(s))",
            definitions.len()
        ));
    }

    let sections = join_all(by_file.into_iter().map(|(uri, mut positions)| async move {
        positions.sort_unstable();
        let scopes = file_scopes(client, &uri, &positions, config).await;
        render_file(&uri, positions.len(), &scopes, show_line_numbers, config)
    }))
    .await;

    let mut out = vec![format!(
        "Symbol: {symbol_name} ({total} references in {} files)",
        sections.len()
    )];
    out.push(sections.join("\n\n"));
    Ok(out.join("\n"))
}

/// Unique locations of symbols named exactly `symbol_name`, in response order.
async fn definition_locations(
    client: &dyn LanguageClient,
    symbol_name: &str,
) -> Result<Vec<Location>, ToolError> {
    let symbols = client.workspace_symbols(symbol_name).await?;

    let mut seen = FxHashSet::default();
    let mut locations = Vec::new();
    for symbol in symbols {
        if symbol.name != symbol_name || symbol.location.range.is_zero() {
            continue;
        }
        if seen.insert(symbol.location.clone()) {
            locations.push(symbol.location);
        }
    }
    Ok(locations)
}

async fn file_scopes(
    client: &dyn LanguageClient,
    uri: &DocumentUri,
    positions: &[Position],
    config: &RenderConfig,
) -> Vec<Scope> {
    let symbols = match client.document_symbols(uri).await {
        Ok(response) => response.into_tree(),
        Err(err) => {
            tracing::warn!(uri = %uri, error = %err, "failed to get document symbols");
            Vec::new()
        }
    };
    let path = uri.to_path();
    let source = SourceText::read(&path)
        .map_err(|err| tracing::warn!(path = %path, error = %err, "scope text unavailable"))
        .ok();

    group_references(&symbols, source.as_ref(), positions, config)
}

fn render_file(
    uri: &DocumentUri,
    count: usize,
    scopes: &[Scope],
    show_line_numbers: bool,
    config: &RenderConfig,
) -> String {
    let mut lines = vec![format!("File: {} ({count} references)", uri.to_path())];

    for scope in scopes {
        lines.push(scope.header());

        let positions: Vec<String> = scope
            .references
            .iter()
            .map(|pos| format!("L{}:C{}", pos.line + 1, pos.character + 1))
            .collect();
        for chunk in positions.chunks(config.references_per_line.max(1)) {
            lines.push(format!("    References: {}", chunk.join(", ")));
        }

        let rendered = render_window(
            &scope.text,
            scope.id.start_line + 1,
            &scope.highlight_offsets(),
            config,
        );
        lines.push(indent_block(&format_window(&rendered, show_line_numbers)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClient, Workspace, range, sym};
    use lb_core::{ClientError, SymbolKind};

    const SERVER: &str = "package main\n\nimport \"fmt\"\n\nfunc Serve() {\n\tfmt.Println(\"up\")\n}\n\nfunc main() {\n\tServe()\n\tServe()\n}\n";
    const RUN: &str = "package cmd\n\nvar start = main.Serve\n";

    fn workspace() -> Workspace {
        Workspace::new(&[("server.go", SERVER), ("cmd/run.go", RUN)])
    }

    fn serve_def(ws: &Workspace) -> Location {
        Location::new(ws.uri("server.go"), range(4, 5, 4, 10))
    }

    fn client(ws: &Workspace) -> FakeClient {
        let def = serve_def(ws);
        FakeClient::default()
            .with_definition("Serve", SymbolKind::Function, def.clone())
            .with_definition("ServeHTTP", SymbolKind::Method, Location::new(ws.uri("server.go"), range(40, 0, 41, 0)))
            .with_definition("Serve", SymbolKind::Function, def.clone())
            .with_symbols(
                ws.uri("server.go"),
                vec![
                    sym("Serve", SymbolKind::Function, range(4, 0, 6, 1)),
                    sym("main", SymbolKind::Function, range(8, 0, 11, 1)),
                ],
            )
            .with_references(
                &def,
                vec![
                    Location::new(ws.uri("server.go"), range(10, 1, 10, 6)),
                    Location::new(ws.uri("cmd/run.go"), range(2, 17, 2, 22)),
                    Location::new(ws.uri("server.go"), range(9, 1, 9, 6)),
                ],
            )
    }

    #[tokio::test]
    async fn test_full_report() {
        let ws = workspace();
        let client = client(&ws);
        let report = find_references_report(&client, "Serve", true, &RenderConfig::default())
            .await
            .unwrap();

        let expected = format!(
            "Symbol: Serve (3 references in 2 files)\n\
             File: {run} (1 references)\n\
             \x20 Scope: Context near L3 (lines 1-4, 1 references)\n\
             \x20   References: L3:C18\n\
             \x20       1| package cmd\n\
             \x20       2| \n\
             \x20       3> var start = main.Serve\n\
             \x20       4|\n\
             \n\
             File: {server} (2 references)\n\
             \x20 [Function] main (lines 9-12, 2 references)\n\
             \x20   References: L10:C2, L11:C2\n\
             \x20       9| func main() {{\n\
             \x20      10> \tServe()\n\
             \x20      11> \tServe()\n\
             \x20      12| }}",
            run = ws.path("cmd/run.go"),
            server = ws.path("server.go"),
        );
        assert_eq!(report, expected);
    }

    #[tokio::test]
    async fn test_declaration_is_excluded_and_definitions_deduplicated() {
        let ws = workspace();
        let client = client(&ws);
        find_references_report(&client, "Serve", false, &RenderConfig::default())
            .await
            .unwrap();

        let queries = client.reference_queries.lock().clone();
        assert_eq!(queries, vec![(ws.uri("server.go"), Position::new(4, 5), false)]);
    }

    #[tokio::test]
    async fn test_without_line_numbers() {
        let ws = workspace();
        let client = client(&ws);
        let report = find_references_report(&client, "Serve", false, &RenderConfig::default())
            .await
            .unwrap();
        assert!(report.contains("\n      func main() {\n    > \tServe()\n"));
    }

    #[tokio::test]
    async fn test_definition_not_found() {
        let ws = workspace();
        let client = FakeClient::default()
            .with_definition("Other", SymbolKind::Function, serve_def(&ws))
            .with_definition("Serve", SymbolKind::Function, Location::new(ws.uri("server.go"), range(0, 0, 0, 0)));
        let report = find_references_report(&client, "Serve", true, &RenderConfig::default())
            .await
            .unwrap();
        assert_eq!(report, "Symbol definition not found for: Serve");
    }

    #[tokio::test]
    async fn test_no_references() {
        let ws = workspace();
        let client = FakeClient {
            failing_references: true,
            ..FakeClient::default()
        }
        .with_definition("Serve", SymbolKind::Function, serve_def(&ws));
        let report = find_references_report(&client, "Serve", true, &RenderConfig::default())
            .await
            .unwrap();
        assert_eq!(
            report,
            "No references found for symbol: Serve (definition found at 1 location(s))"
        );
    }

    #[tokio::test]
    async fn test_unreachable_client_is_an_error() {
        let client = FakeClient {
            unavailable: true,
            ..FakeClient::default()
        };
        let err = find_references_report(&client, "Serve", true, &RenderConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Client(ClientError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_references_chunked_four_per_line() {
        let ws = Workspace::new(&[("a.go", &"x\n".repeat(20))]);
        let def = Location::new(ws.uri("a.go"), range(0, 0, 0, 1));
        let refs = (1..=6)
            .map(|line| Location::new(ws.uri("a.go"), range(line, 0, line, 1)))
            .collect();
        let client = FakeClient::default()
            .with_definition("x", SymbolKind::Variable, def.clone())
            .with_symbols(ws.uri("a.go"), vec![sym("block", SymbolKind::Function, range(0, 0, 19, 1))])
            .with_references(&def, refs);

        let report = find_references_report(&client, "x", true, &RenderConfig::default())
            .await
            .unwrap();
        assert!(report.contains("    References: L2:C1, L3:C1, L4:C1, L5:C1\n    References: L6:C1, L7:C1\n"));
    }
}
