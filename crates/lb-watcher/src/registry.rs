//! Active watch registrations.
//!
//! The language server can register and unregister file watchers at any
//! time while the watch loop reads the store for every event, so entries
//! live behind a reader-writer lock. Order matters: the first matching
//! registration decides the event mask.

use lb_core::{WatchKind, WatchRegistration};
use parking_lot::RwLock;

use crate::pattern;

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    registration: WatchRegistration,
}

/// Ordered, concurrency-safe collection of watch registrations.
///
/// # Examples
///
/// ```
/// use lb_core::{GlobSpec, WatchKind, WatchRegistration};
/// use lb_watcher::RegistrationStore;
///
/// let store = RegistrationStore::default();
/// // Nothing registered: everything is watched.
/// assert_eq!(store.is_watched("/ws/notes.txt"), Some(WatchKind::all()));
///
/// store.add("go", [WatchRegistration::new(GlobSpec::new("**/*.go"))]);
/// assert!(store.is_watched("/ws/main.go").is_some());
/// assert!(store.is_watched("/ws/notes.txt").is_none());
/// ```
#[derive(Debug, Default)]
pub struct RegistrationStore {
    entries: RwLock<Vec<Entry>>,
}

impl RegistrationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends registrations under `id`, returning how many were added.
    pub fn add(
        &self,
        id: &str,
        registrations: impl IntoIterator<Item = WatchRegistration>,
    ) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.extend(registrations.into_iter().map(|registration| Entry {
            id: id.to_owned(),
            registration,
        }));
        entries.len() - before
    }

    /// Removes every registration added under `id`, returning how many were removed.
    pub fn remove(&self, id: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        before - entries.len()
    }

    /// Returns the event mask for `path`, or `None` if it is not watched.
    ///
    /// With no registrations every path is watched with the full mask.
    /// Otherwise the first registration whose pattern matches decides.
    #[must_use]
    pub fn is_watched(&self, path: &str) -> Option<WatchKind> {
        let entries = self.entries.read();
        if entries.is_empty() {
            return Some(WatchKind::all());
        }
        entries
            .iter()
            .find(|entry| pattern::matches(path, &entry.registration.glob_pattern))
            .map(|entry| entry.registration.mask())
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
