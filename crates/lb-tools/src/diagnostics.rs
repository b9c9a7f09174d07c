//! The diagnostics report.

use std::fmt::Write as _;

use camino::Utf8Path;
use lb_core::{Diagnostic, DocumentSymbol, DocumentUri, LanguageClient};
use lb_scope::{SourceText, full_definition, number_lines};

use crate::error::ToolError;

/// Longest code line shown under a diagnostic before it is clipped.
const MAX_CONTEXT_CHARS: usize = 80;

/// Lists the diagnostics the server reports for one file.
///
/// ```text
/// Diagnostics for /ws/main.go (2 issues)
/// 1. [ERROR] L4:C2 - undefined: foo
///    Source: compiler, Code: UndeclaredName
///    > foo()
/// 2. [WARNING] L9:C1 - unused variable
///    > x := 1
/// ```
///
/// Each entry shows the trimmed source line, clipped around the diagnostic
/// column when it is long. With `include_context` the whole enclosing
/// definition is shown instead (numbered when `show_line_numbers` is set),
/// falling back to the single line when no symbol encloses the diagnostic.
///
/// # Errors
///
/// Returns [`ToolError::Client`] if the file cannot be opened or the
/// diagnostics request fails.
pub async fn diagnostics_report(
    client: &dyn LanguageClient,
    path: &Utf8Path,
    include_context: bool,
    show_line_numbers: bool,
) -> Result<String, ToolError> {
    client.open_file(path).await?;
    let uri = DocumentUri::from_path(path);
    let diagnostics = client.diagnostics(&uri).await?;

    if diagnostics.is_empty() {
        return Ok(format!("No diagnostics found for {path}"));
    }

    let source = SourceText::read(path)
        .map_err(|err| tracing::warn!(path = %path, error = %err, "diagnostic context unavailable"))
        .ok();
    let tree = if include_context {
        match client.document_symbols(&uri).await {
            Ok(response) => response.into_tree(),
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "failed to get document symbols");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let mut out = format!("Diagnostics for {path} ({} issues)\n", diagnostics.len());
    for (idx, diagnostic) in diagnostics.iter().enumerate() {
        write_entry(&mut out, idx + 1, diagnostic);

        let context = source.as_ref().and_then(|source| {
            if include_context {
                if let Some(definition) = definition_context(source, &tree, diagnostic, show_line_numbers) {
                    return Some(definition);
                }
            }
            line_context(source, diagnostic)
        });
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "   > {}", context.trim_end());
        }
    }
    Ok(out)
}

fn write_entry(out: &mut String, number: usize, diagnostic: &Diagnostic) {
    let severity = diagnostic.severity.map_or("UNKNOWN", |s| s.label());
    let start = diagnostic.range.start;
    let _ = writeln!(
        out,
        "{number}. [{severity}] L{}:C{} - {}",
        start.line + 1,
        start.character + 1,
        diagnostic.message
    );

    let mut details = Vec::with_capacity(2);
    if let Some(source) = diagnostic.source.as_deref().filter(|s| !s.is_empty()) {
        details.push(format!("Source: {source}"));
    }
    if let Some(code) = &diagnostic.code {
        details.push(format!("Code: {code}"));
    }
    if !details.is_empty() {
        let _ = writeln!(out, "   {}", details.join(", "));
    }
}

fn definition_context(
    source: &SourceText,
    tree: &[DocumentSymbol],
    diagnostic: &Diagnostic,
    show_line_numbers: bool,
) -> Option<String> {
    let definition = full_definition(source, tree, diagnostic.range.start).ok()?;
    if show_line_numbers {
        Some(number_lines(&definition.text, definition.range.start.line + 1))
    } else {
        Some(definition.text)
    }
}

/// The trimmed diagnostic line, clipped to [`MAX_CONTEXT_CHARS`] around the column.
fn line_context(source: &SourceText, diagnostic: &Diagnostic) -> Option<String> {
    let line = source.line(diagnostic.range.start.line)?.trim();
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= MAX_CONTEXT_CHARS {
        return Some(line.to_owned());
    }

    let column = diagnostic.range.start.character as usize;
    let mut clipped = if column > MAX_CONTEXT_CHARS / 2 {
        let from = (column - MAX_CONTEXT_CHARS / 2).min(chars.len());
        let mut tail = String::from("...");
        tail.extend(&chars[from..]);
        tail
    } else {
        line.to_owned()
    };
    if clipped.chars().count() > MAX_CONTEXT_CHARS {
        clipped = clipped.chars().take(MAX_CONTEXT_CHARS).collect::<String>() + "...";
    }
    Some(clipped)
}
