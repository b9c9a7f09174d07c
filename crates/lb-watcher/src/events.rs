//! Classification of raw `notify` events.
//!
//! `notify` reports platform-flavoured event kinds; the watch loop only
//! cares about four operations. [`classify`] maps one raw event to the
//! operations it implies, one per affected path.

use camino::Utf8PathBuf;
use notify::event::{EventKind, ModifyKind, RenameMode};
use smallvec::SmallVec;

use crate::error::WatchError;

/// A filesystem operation the watch loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FsChange {
    /// A file or directory appeared at this path.
    Created(Utf8PathBuf),
    /// File content was written.
    Written(Utf8PathBuf),
    /// The path was deleted.
    Removed(Utf8PathBuf),
    /// The path was renamed away; it may or may not exist again afterwards.
    Renamed(Utf8PathBuf),
}

impl FsChange {
    /// The path the operation applies to.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Created(path) | Self::Written(path) | Self::Removed(path) | Self::Renamed(path) => {
                path
            }
        }
    }
}

/// Maps a raw event to zero or more operations.
///
/// Metadata-only and access events are dropped. Backends that pair rename
/// halves (inotify, Windows) send the `From` and `To` events before the
/// combined `Both` event; the halves become a rename of the old path and a
/// creation of the new one, and the combined event is dropped so each rename
/// is reported once. Non-UTF-8 paths are logged and skipped.
///
/// # Examples
///
/// ```
/// use notify::event::{CreateKind, Event, EventKind};
/// use lb_watcher::events::{classify, FsChange};
///
/// let event = Event::new(EventKind::Create(CreateKind::File)).add_path("/ws/a.go".into());
/// assert_eq!(classify(&event).as_slice(), [FsChange::Created("/ws/a.go".into())]);
/// ```
#[must_use]
pub fn classify(event: &notify::Event) -> SmallVec<[FsChange; 2]> {
    let paths = event.paths.iter().filter_map(|path| {
        Utf8PathBuf::from_path_buf(path.clone())
            .map_err(|raw| tracing::debug!(error = %WatchError::non_utf8_path(raw), "skipping event"))
            .ok()
    });

    let mut changes = SmallVec::new();
    match event.kind {
        EventKind::Create(_) => changes.extend(paths.map(FsChange::Created)),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            changes.extend(paths.map(FsChange::Created));
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            tracing::trace!(paths = ?event.paths, "rename already reported by its halves");
        }
        EventKind::Modify(ModifyKind::Name(_)) => changes.extend(paths.map(FsChange::Renamed)),
        EventKind::Modify(ModifyKind::Metadata(_)) | EventKind::Access(_) => {}
        EventKind::Modify(_) => changes.extend(paths.map(FsChange::Written)),
        EventKind::Remove(_) => changes.extend(paths.map(FsChange::Removed)),
        EventKind::Any | EventKind::Other => {
            tracing::trace!(kind = ?event.kind, "ignoring unclassified event");
        }
    }
    changes
}
