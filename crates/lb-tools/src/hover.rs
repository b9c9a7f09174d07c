//! The hover report.

use camino::Utf8Path;
use lb_core::{DocumentUri, LanguageClient, Position};

use crate::error::ToolError;

/// Shows the server's hover text at a 1-based `line` and `column`.
///
/// Zero is treated as 1. The markup kind is printed before the content when
/// the server provides one.
///
/// # Errors
///
/// Returns [`ToolError::Client`] if the file cannot be opened or the hover
/// request fails.
pub async fn hover_report(
    client: &dyn LanguageClient,
    path: &Utf8Path,
    line: u32,
    column: u32,
) -> Result<String, ToolError> {
    client.open_file(path).await?;
    let position = Position::new(line.saturating_sub(1), column.saturating_sub(1));
    let hover = client.hover(&DocumentUri::from_path(path), position).await?;

    let mut out = String::from("Hover Information\n");
    match hover.filter(|h| !h.contents.value.is_empty()) {
        None => out.push_str("No hover information available for this position"),
        Some(hover) => {
            if !hover.contents.kind.is_empty() {
                out.push_str(&format!("Kind: {}\n\n", hover.contents.kind));
            }
            out.push_str(&hover.contents.value);
        }
    }
    Ok(out)
}
