//! The read-definition report.

use futures_util::future::join_all;
use lb_core::{LanguageClient, SymbolInformation, SymbolKind};
use lb_scope::{Definition, SourceText, full_definition, number_lines};

use crate::error::ToolError;

/// Prints the full source of every definition of `symbol_name`.
///
/// Symbols come from a workspace symbol query. A symbol matches if its name
/// equals `symbol_name`; methods also match when their qualified name ends
/// in `.symbol_name` (`Server.Start` for `Start`). Each definition reads:
///
/// ```text
/// Symbol: Start
/// File: /ws/server.go
/// Kind: Method
/// Container Name: Server
/// Location: Lines 12-20
/// <definition text, numbered when requested>
/// ```
///
/// Definitions are separated by a blank line. Definitions whose file or
/// symbols cannot be loaded are logged and left out.
///
/// # Errors
///
/// Returns [`ToolError::Client`] only if the workspace symbol query fails.
pub async fn read_definition_report(
    client: &dyn LanguageClient,
    symbol_name: &str,
    show_line_numbers: bool,
) -> Result<String, ToolError> {
    let symbols = client.workspace_symbols(symbol_name).await?;
    let matching: Vec<&SymbolInformation> = symbols
        .iter()
        .filter(|symbol| matches_name(symbol, symbol_name))
        .collect();

    let definitions = join_all(matching.into_iter().map(|symbol| async move {
        let definition = load_definition(client, symbol).await?;
        Some(format_definition(symbol, &definition, show_line_numbers))
    }))
    .await;

    let definitions: Vec<String> = definitions.into_iter().flatten().collect();
    if definitions.is_empty() {
        return Ok(format!("{symbol_name} not found"));
    }
    Ok(definitions.join("\n\n"))
}

fn matches_name(symbol: &SymbolInformation, name: &str) -> bool {
    if symbol.name == name {
        return true;
    }
    symbol.kind == SymbolKind::Method
        && symbol
            .name
            .strip_suffix(name)
            .is_some_and(|qualifier| qualifier.ends_with('.'))
}

async fn load_definition(
    client: &dyn LanguageClient,
    symbol: &SymbolInformation,
) -> Option<Definition> {
    let uri = &symbol.location.uri;
    let tree = match client.document_symbols(uri).await {
        Ok(response) => response.into_tree(),
        Err(err) => {
            tracing::warn!(symbol = %symbol.name, uri = %uri, error = %err, "failed to get document symbols");
            return None;
        }
    };

    let path = uri.to_path();
    let source = SourceText::read(&path)
        .map_err(|err| tracing::warn!(path = %path, error = %err, "failed to read definition file"))
        .ok()?;

    full_definition(&source, &tree, symbol.location.range.start)
        .map_err(|err| tracing::debug!(symbol = %symbol.name, error = %err, "definition not resolved"))
        .ok()
}

fn format_definition(
    symbol: &SymbolInformation,
    definition: &Definition,
    show_line_numbers: bool,
) -> String {
    let mut out = format!(
        "Symbol: {}\nFile: {}\nKind: {}\n",
        symbol.name,
        symbol.location.uri.to_path(),
        symbol.kind.name()
    );
    if let Some(container) = symbol.container_name.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("Container Name: {container}\n"));
    }
    out.push_str(&format!(
        "Location: Lines {}-{}\n",
        definition.range.start.line + 1,
        definition.range.end.line + 1
    ));

    if show_line_numbers {
        out.push_str(&number_lines(&definition.text, definition.range.start.line + 1));
    } else {
        out.push_str(&definition.text);
    }
    out
}
