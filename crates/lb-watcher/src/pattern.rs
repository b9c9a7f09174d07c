//! Glob matching for watch registrations.
//!
//! Language servers register patterns such as `**/*.go`, `*.{ts,tsx}`, or
//! `src/**/*.rs` relative to a base URI. [`matches`] evaluates such a
//! pattern against an absolute workspace path.
//!
//! # Matching Rules
//!
//! With a base path, the path is made relative to it first; paths outside
//! the base never match. Without one, the pattern is tried against both the
//! full path and the file name, so bare patterns like `*.go` match at any
//! depth.
//!
//! Patterns are then evaluated in this order:
//!
//! 1. Brace alternation `a{b,c}d` expands to one pattern per alternative.
//! 2. A leading `**/` matches the remainder against every trailing run of
//!    path components (`*.ext` remainders are a plain suffix test).
//! 3. Any other `**` splits the pattern into a head the path must start
//!    with and a tail matched against the trailing components after it.
//! 4. `*.ext` is a suffix test.
//! 5. Everything else is a single-level glob (`*`, `?`, `[...]`) where `*`
//!    does not cross `/`.
//!
//! Malformed patterns never match; they are logged, not reported as errors.

use glob::{MatchOptions, Pattern};
use lb_core::GlobSpec;
use lb_core::types::strip_uri_scheme;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Returns `true` if `path` matches the registration pattern.
///
/// # Examples
///
/// ```
/// use lb_core::GlobSpec;
/// use lb_watcher::pattern::matches;
///
/// assert!(matches("/ws/a/b/c.go", &GlobSpec::new("**/*.go")));
/// assert!(matches("/ws/go.sum", &GlobSpec::new("*.{go,mod,sum}")));
/// assert!(matches("/ws/src/lib.rs", &GlobSpec::relative("file:///ws", "src/*.rs")));
/// assert!(!matches("/other/src/lib.rs", &GlobSpec::relative("file:///ws", "src/*.rs")));
/// ```
#[must_use]
pub fn matches(path: &str, spec: &GlobSpec) -> bool {
    let path = to_slash(path);

    match spec.base_path.as_deref().filter(|base| !base.is_empty()) {
        Some(base) => {
            let base = to_slash(strip_uri_scheme(base));
            match relative_to(&path, &base) {
                Some(rel) => matches_glob(&spec.pattern, rel),
                None => {
                    tracing::trace!(path = %path, base = %base, "path outside pattern base");
                    false
                }
            }
        }
        None => matches_glob(&spec.pattern, &path) || matches_glob(&spec.pattern, file_name(&path)),
    }
}

/// Evaluates a glob pattern against an already relative (or bare) path.
///
/// # Examples
///
/// ```
/// use lb_watcher::pattern::matches_glob;
///
/// assert!(matches_glob("*.go", "main.go"));
/// assert!(!matches_glob("*.go", "main.goo"));
/// assert!(matches_glob("src/**/*.ts", "src/app/main.ts"));
/// assert!(!matches_glob("*.{go", "main.go"));
/// ```
#[must_use]
pub fn matches_glob(pattern: &str, path: &str) -> bool {
    match expand_braces(pattern) {
        Braces::Expanded(alternatives) => {
            return alternatives.iter().any(|alt| matches_glob(alt, path));
        }
        Braces::Malformed => {
            tracing::debug!(pattern, "unbalanced brace in glob pattern");
            return false;
        }
        Braces::None => {}
    }

    if let Some(rest) = pattern.strip_prefix("**/") {
        if let Some(suffix) = extension_suffix(rest) {
            return path.ends_with(suffix);
        }
        return trailing_paths(path).any(|sub| sub.ends_with(rest) || glob_match(rest, sub));
    }

    if let Some((head, tail)) = pattern.split_once("**") {
        let Some(after_head) = path.strip_prefix(head) else {
            return false;
        };
        if tail.is_empty() {
            return true;
        }
        let tail_glob = tail.strip_prefix('/').unwrap_or(tail);
        return path.ends_with(tail)
            || trailing_paths(after_head).any(|sub| glob_match(tail_glob, sub));
    }

    if let Some(suffix) = extension_suffix(pattern) {
        return path.ends_with(suffix);
    }

    glob_match(pattern, path)
}

enum Braces {
    None,
    Malformed,
    Expanded(Vec<String>),
}

/// Expands the first top-level `{...}` group of a pattern.
fn expand_braces(pattern: &str) -> Braces {
    let Some(open) = pattern.find('{') else {
        return Braces::None;
    };

    let mut depth = 0usize;
    let mut separators = vec![open];
    let mut close = None;
    for (offset, c) in pattern[open..].char_indices() {
        let idx = open + offset;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(idx);
                    break;
                }
            }
            ',' if depth == 1 => separators.push(idx),
            _ => {}
        }
    }

    let Some(close) = close else {
        return Braces::Malformed;
    };
    separators.push(close);

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    Braces::Expanded(
        separators
            .windows(2)
            .map(|bounds| format!("{prefix}{}{suffix}", &pattern[bounds[0] + 1..bounds[1]]))
            .collect(),
    )
}

/// For `*.ext` with no further wildcards returns `.ext`.
fn extension_suffix(pattern: &str) -> Option<&str> {
    let suffix = pattern.strip_prefix('*')?;
    (suffix.starts_with('.') && !suffix.contains(['*', '?', '[', ']', '{', '}', '/']))
        .then_some(suffix)
}

/// The path itself followed by every suffix that starts after a `/`.
fn trailing_paths(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once(path).chain(path.match_indices('/').map(move |(idx, _)| &path[idx + 1..]))
}

fn glob_match(pattern: &str, path: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(glob) => glob.matches_with(path, GLOB_OPTIONS),
        Err(err) => {
            tracing::debug!(pattern, error = %err, "invalid glob pattern");
            false
        }
    }
}

fn relative_to<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(path.trim_start_matches('/'));
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('/')
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_extension() {
        assert!(matches_glob("**/*.go", "a/b/c.go"));
        assert!(matches_glob("**/*.go", "c.go"));
        assert!(!matches_glob("**/*.go", "a/b/c.gox"));
    }

    #[test]
    fn test_brace_alternation() {
        assert!(matches_glob("*.{go,mod,sum}", "go.sum"));
        assert!(matches_glob("*.{go,mod,sum}", "go.mod"));
        assert!(!matches_glob("*.{go,mod,sum}", "go.work"));
        assert!(matches_glob("**/*.{ts,tsx}", "web/src/App.tsx"));
    }

    #[test]
    fn test_nested_braces() {
        assert!(matches_glob("*.{js,{ts,tsx}}", "index.tsx"));
        assert!(matches_glob("{src,lib}/*.{c,h}", "lib/util.h"));
        assert!(!matches_glob("{src,lib}/*.{c,h}", "bin/util.h"));
    }

    #[test]
    fn test_malformed_patterns_do_not_match() {
        assert!(!matches_glob("*.{go", "main.go"));
        assert!(!matches_glob("[", "["));
        assert!(!matches_glob("src/[a-", "src/a"));
    }

    #[test]
    fn test_extension_suffix() {
        assert!(matches_glob("*.go", "main.go"));
        assert!(!matches_glob("*.go", "main.goo"));
    }

    #[test]
    fn test_recursive_literal_remainder() {
        assert!(matches_glob("**/go.mod", "svc/api/go.mod"));
        assert!(matches_glob("**/go.mod", "go.mod"));
        assert!(!matches_glob("**/go.mod", "svc/go.sum"));
    }

    #[test]
    fn test_recursive_glob_remainder() {
        assert!(matches_glob("**/src/*.rs", "crates/core/src/lib.rs"));
        assert!(!matches_glob("**/src/*.rs", "crates/core/src/bin/main.rs"));
    }

    #[test]
    fn test_interior_double_star() {
        assert!(matches_glob("src/**/*.ts", "src/app/main.ts"));
        assert!(matches_glob("src/**/*.ts", "src/main.ts"));
        assert!(!matches_glob("src/**/*.ts", "test/app/main.ts"));
        assert!(matches_glob("docs/**", "docs/guide/intro.md"));
    }

    #[test]
    fn test_single_level_glob() {
        assert!(matches_glob("src/*.rs", "src/lib.rs"));
        assert!(!matches_glob("src/*.rs", "src/bin/main.rs"));
        assert!(matches_glob("file?.txt", "file1.txt"));
        assert!(matches_glob("[Mm]akefile", "Makefile"));
    }

    #[test]
    fn test_matches_without_base_uses_file_name() {
        let spec = GlobSpec::new("go.mod");
        assert!(matches("/ws/svc/go.mod", &spec));
        assert!(!matches("/ws/svc/go.sum", &spec));
    }

    #[test]
    fn test_matches_relative_to_base_uri() {
        let spec = GlobSpec::relative("file:///ws/app/", "src/**/*.ts");
        assert!(matches("/ws/app/src/a/b.ts", &spec));
        assert!(!matches("/ws/other/src/a/b.ts", &spec));
        assert!(!matches("/ws/application/src/a/b.ts", &spec));
    }

    #[test]
    fn test_matches_normalizes_backslashes() {
        let spec = GlobSpec::relative("C:\\ws", "*.cs");
        assert!(matches("C:\\ws\\Program.cs", &spec));
    }
}
