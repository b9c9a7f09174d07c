//! File watch registrations and change kinds.
//!
//! A language server announces which files it wants to hear about by
//! registering glob patterns, each with an optional mask of event kinds.
//! The watcher answers with [`FileChangeType`] notifications.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Mask of file events a registration is interested in.
    ///
    /// The bit values match the protocol's `WatchKind`. Unknown bits are
    /// dropped when deserializing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WatchKind: u8 {
        /// File creation.
        const CREATE = 1;
        /// File content change.
        const CHANGE = 2;
        /// File deletion.
        const DELETE = 4;
    }
}

impl Default for WatchKind {
    fn default() -> Self {
        Self::all()
    }
}

impl Serialize for WatchKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for WatchKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

/// Kind of change reported to the language server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileChangeType {
    /// The file was created.
    Created = 1,
    /// The file content changed.
    Changed = 2,
    /// The file was deleted.
    Deleted = 3,
}

impl FileChangeType {
    /// The mask bit a registration needs for this change to be reported.
    #[must_use]
    pub const fn watch_kind(self) -> WatchKind {
        match self {
            Self::Created => WatchKind::CREATE,
            Self::Changed => WatchKind::CHANGE,
            Self::Deleted => WatchKind::DELETE,
        }
    }

    /// Short lowercase name, for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Changed => "changed",
            Self::Deleted => "deleted",
        }
    }
}

impl TryFrom<u8> for FileChangeType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(Self::Created),
            2 => Ok(Self::Changed),
            3 => Ok(Self::Deleted),
            other => Err(format!("invalid file change type {other}")),
        }
    }
}

impl From<FileChangeType> for u8 {
    fn from(change: FileChangeType) -> Self {
        change as Self
    }
}

/// A glob pattern, optionally relative to a base directory.
///
/// # Examples
///
/// ```
/// use lb_core::GlobSpec;
///
/// let bare = GlobSpec::new("**/*.go");
/// assert!(bare.base_path.is_none());
///
/// let relative = GlobSpec::relative("file:///work/app", "src/**/*.ts");
/// assert_eq!(relative.base_path.as_deref(), Some("file:///work/app"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobSpec {
    /// Directory (path or `file://` URI) the pattern is relative to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// The glob itself.
    pub pattern: String,
}

impl GlobSpec {
    /// Creates a pattern with no base path.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            base_path: None,
            pattern: pattern.into(),
        }
    }

    /// Creates a pattern relative to `base_path`.
    #[must_use]
    pub fn relative(base_path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            pattern: pattern.into(),
        }
    }
}

/// One watcher registered by the language server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRegistration {
    /// Which paths to watch.
    pub glob_pattern: GlobSpec,

    /// Which events to report; `None` means all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WatchKind>,
}

impl WatchRegistration {
    /// Creates a registration reporting every event kind.
    #[must_use]
    pub const fn new(glob_pattern: GlobSpec) -> Self {
        Self {
            glob_pattern,
            kind: None,
        }
    }

    /// Restricts the registration to the given event kinds.
    #[must_use]
    pub fn with_kind(mut self, kind: WatchKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The effective mask, defaulting to every kind.
    #[must_use]
    pub fn mask(&self) -> WatchKind {
        self.kind.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_kind_default_is_full_mask() {
        let kind = WatchKind::default();
        assert!(kind.contains(WatchKind::CREATE | WatchKind::CHANGE | WatchKind::DELETE));
        assert_eq!(kind.bits(), 7);
    }

    #[test]
    fn test_change_type_mask_bits() {
        assert_eq!(FileChangeType::Created.watch_kind(), WatchKind::CREATE);
        assert_eq!(FileChangeType::Changed.watch_kind(), WatchKind::CHANGE);
        assert_eq!(FileChangeType::Deleted.watch_kind(), WatchKind::DELETE);
    }

    #[test]
    fn test_registration_mask_defaults() {
        let reg = WatchRegistration::new(GlobSpec::new("*.go"));
        assert_eq!(reg.mask(), WatchKind::all());

        let reg = reg.with_kind(WatchKind::DELETE);
        assert_eq!(reg.mask(), WatchKind::DELETE);
    }

    #[test]
    fn test_registration_deserialize() {
        let json = r#"{"globPattern": {"pattern": "**/*.rs"}, "kind": 3}"#;
        let reg: WatchRegistration = serde_json::from_str(json).unwrap();
        assert_eq!(reg.glob_pattern.pattern, "**/*.rs");
        assert_eq!(reg.mask(), WatchKind::CREATE | WatchKind::CHANGE);
    }

    #[test]
    fn test_change_type_serializes_as_number() {
        assert_eq!(serde_json::to_string(&FileChangeType::Deleted).unwrap(), "3");
        let parsed: FileChangeType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, FileChangeType::Created);
    }
}
