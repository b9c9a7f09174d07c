//! Windowed rendering of scope text.
//!
//! Long scopes are cut down to the lines that matter: the head, the tail,
//! and a few lines around every highlighted line. Each contiguous run of
//! dropped lines becomes one skip marker that records how many lines it
//! stands for, so line numbers stay correct after it.
//!
//! Rendering is split in two steps. [`render_window`] decides what to keep
//! and produces [`RenderedLine`]s; [`format_window`] prints them. Highlights
//! are carried on the kept lines themselves, so a highlight that falls in a
//! dropped run simply disappears.

use std::fmt::Write as _;

use lb_core::RenderConfig;

/// One line of rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedLine<'a> {
    /// A source line that was kept.
    Code {
        /// The line text.
        text: &'a str,
        /// 1-based line number in the file.
        number: u32,
        /// Whether the line holds a reference.
        highlighted: bool,
    },
    /// A run of dropped lines.
    Skipped(usize),
}

impl RenderedLine<'_> {
    /// Number of source lines this entry stands for.
    #[must_use]
    pub const fn source_lines(&self) -> usize {
        match self {
            Self::Code { .. } => 1,
            Self::Skipped(count) => *count,
        }
    }
}

/// Splits `text` into kept lines and skip markers.
///
/// `first_line` is the 1-based file line number of the first line of
/// `text`; `highlights` are 0-based offsets into `text`. Text with at most
/// [`RenderConfig::max_lines`] lines is kept whole. Longer text keeps the
/// first [`head_lines`](RenderConfig::head_lines), the last
/// [`tail_lines`](RenderConfig::tail_lines), and
/// [`context_lines`](RenderConfig::context_lines) on either side of each
/// highlight.
///
/// # Examples
///
/// ```
/// use lb_core::RenderConfig;
/// use lb_scope::{RenderedLine, render_window};
///
/// let text: String = (1..=60).map(|n| format!("line {n}\n")).collect();
/// let lines = render_window(text.trim_end(), 1, &[30], &RenderConfig::default());
///
/// // head (5) + skip + 5 around the highlight + skip + tail (3)
/// assert_eq!(lines.len(), 15);
/// assert_eq!(lines[5], RenderedLine::Skipped(23));
/// let total: usize = lines.iter().map(RenderedLine::source_lines).sum();
/// assert_eq!(total, 60);
/// ```
#[must_use]
pub fn render_window<'a>(
    text: &'a str,
    first_line: u32,
    highlights: &[usize],
    config: &RenderConfig,
) -> Vec<RenderedLine<'a>> {
    let lines: Vec<&str> = text.split('\n').collect();
    let total = lines.len();

    let keep: Vec<bool> = if total <= config.max_lines {
        vec![true; total]
    } else {
        let mut keep = vec![false; total];
        keep[..config.head_lines.min(total)].fill(true);
        keep[total.saturating_sub(config.tail_lines)..].fill(true);
        for &hl in highlights.iter().filter(|&&hl| hl < total) {
            let from = hl.saturating_sub(config.context_lines);
            let to = (hl + config.context_lines).min(total - 1);
            keep[from..=to].fill(true);
        }
        keep
    };

    let mut rendered = Vec::with_capacity(total);
    let mut skipped = 0usize;
    let mut number = first_line;
    for (idx, line) in lines.iter().enumerate() {
        if !keep[idx] {
            skipped += 1;
            number = number.saturating_add(1);
            continue;
        }
        if skipped > 0 {
            rendered.push(RenderedLine::Skipped(skipped));
            skipped = 0;
        }
        rendered.push(RenderedLine::Code {
            text: line,
            number,
            highlighted: highlights.contains(&idx),
        });
        number = number.saturating_add(1);
    }
    if skipped > 0 {
        rendered.push(RenderedLine::Skipped(skipped));
    }
    rendered
}

/// Prints rendered lines, one per output line.
///
/// With line numbers each code line reads `{number:>5}| {text}`, with `>`
/// instead of `|` on highlighted lines. Without them, highlighted lines start
/// with `> ` and the rest with two spaces. Skip markers read
/// `    ... N lines skipped ...` either way.
#[must_use]
pub fn format_window(lines: &[RenderedLine<'_>], show_line_numbers: bool) -> String {
    let mut out = String::new();
    for line in lines {
        match *line {
            RenderedLine::Skipped(count) => {
                let _ = writeln!(out, "    ... {count} lines skipped ...");
            }
            RenderedLine::Code {
                text,
                number,
                highlighted,
            } => {
                if show_line_numbers {
                    let marker = if highlighted { '>' } else { '|' };
                    let _ = writeln!(out, "{number:>5}{marker} {text}");
                } else {
                    let marker = if highlighted { "> " } else { "  " };
                    let _ = writeln!(out, "{marker}{text}");
                }
            }
        }
    }
    out
}

/// Prefixes every line of `text` with its number, padded to the widest one.
///
/// Used for definitions, which are never truncated.
///
/// # Examples
///
/// ```
/// use lb_scope::number_lines;
///
/// let numbered = number_lines("a\nb\nc", 9);
/// assert_eq!(numbered, " 9| a\n10| b\n11| c\n");
/// ```
#[must_use]
pub fn number_lines(text: &str, first_line: u32) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    let last = first_line.saturating_add(count.saturating_sub(1));
    let width = last.to_string().len();

    let mut out = String::with_capacity(text.len() + lines.len() * (width + 2));
    for (number, line) in (first_line..).zip(&lines) {
        let _ = writeln!(out, "{number:>width$}| {line}");
    }
    out
}

/// Indents every line of `block` by four spaces after trimming trailing whitespace.
#[must_use]
pub fn indent_block(block: &str) -> String {
    let trimmed = block.trim_end();
    let mut out = String::with_capacity(trimmed.len() + 4);
    for (idx, line) in trimmed.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str("    ");
        out.push_str(line);
    }
    out
}
