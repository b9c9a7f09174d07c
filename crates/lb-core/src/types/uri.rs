//! Document URIs.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

const FILE_SCHEME: &str = "file://";

/// A document identifier as used on the wire, normally a `file://` URI.
///
/// # Examples
///
/// ```
/// use lb_core::DocumentUri;
/// use camino::Utf8Path;
///
/// let uri = DocumentUri::from_path(Utf8Path::new("/src/main.go"));
/// assert_eq!(uri.as_str(), "file:///src/main.go");
/// assert_eq!(uri.to_path(), Utf8Path::new("/src/main.go"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUri(String);

impl DocumentUri {
    /// Wraps a raw URI string.
    #[inline]
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Builds a `file://` URI for a filesystem path.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        Self(format!("{FILE_SCHEME}{path}"))
    }

    /// Returns the URI as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the URI back to a filesystem path.
    ///
    /// The `file://` scheme is stripped if present and `%XX` escapes are
    /// decoded. Strings without a scheme are treated as plain paths.
    #[must_use]
    pub fn to_path(&self) -> Utf8PathBuf {
        let raw = self.0.strip_prefix(FILE_SCHEME).unwrap_or(&self.0);
        Utf8PathBuf::from(percent_decode(raw))
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for DocumentUri {
    fn from(path: &Utf8Path) -> Self {
        Self::from_path(path)
    }
}

/// Strips any `scheme://` prefix from a string that may be a URI or a path.
#[must_use]
pub fn strip_uri_scheme(value: &str) -> &str {
    match value.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && scheme.chars().all(is_scheme_char) => rest,
        _ => value,
    }
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_owned();
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_round_trip() {
        let uri = DocumentUri::from_path(Utf8Path::new("/work/pkg/lib.rs"));
        assert_eq!(uri.to_string(), "file:///work/pkg/lib.rs");
        assert_eq!(uri.to_path(), Utf8PathBuf::from("/work/pkg/lib.rs"));
    }

    #[test]
    fn test_to_path_decodes_escapes() {
        let uri = DocumentUri::new("file:///my%20project/a%2Bb.go");
        assert_eq!(uri.to_path(), Utf8PathBuf::from("/my project/a+b.go"));
    }

    #[test]
    fn test_to_path_keeps_malformed_escapes() {
        let uri = DocumentUri::new("file:///100%/x%zz");
        assert_eq!(uri.to_path(), Utf8PathBuf::from("/100%/x%zz"));
    }

    #[test]
    fn test_to_path_without_scheme() {
        let uri = DocumentUri::new("/plain/path.go");
        assert_eq!(uri.to_path(), Utf8PathBuf::from("/plain/path.go"));
    }

    #[test]
    fn test_strip_uri_scheme() {
        assert_eq!(strip_uri_scheme("file:///root/ws"), "/root/ws");
        assert_eq!(strip_uri_scheme("/root/ws"), "/root/ws");
        assert_eq!(strip_uri_scheme("a b://x"), "a b://x");
    }
}
