//! Error types for the lb-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while setting up or running the workspace watcher.

use camino::Utf8PathBuf;
use lb_core::ClientError;

/// Errors that can occur during workspace watching.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): Fatal - the event source is gone
/// - **Path not found** ([`WatchError::PathNotFound`]): Fatal - the root must exist
/// - **Walk errors** ([`WatchError::Walk`]): Fatal - the initial directory walk failed
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): Recoverable - skip and continue
/// - **Client errors** ([`WatchError::Client`]): Recoverable - one notification is lost
/// - **I/O errors** ([`WatchError::Io`]): Fatal - propagate immediately
///
/// # Examples
///
/// ```
/// use lb_watcher::WatchError;
///
/// fn handle_error(err: &WatchError) {
///     if err.is_fatal() {
///         eprintln!("watcher stopped: {err}");
///     } else {
///         eprintln!("skipping: {err}");
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to create or operate the OS event subscription.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The workspace root does not exist.
    #[error("path does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// Walking the workspace failed.
    #[error("workspace walk failed: {0}")]
    Walk(#[from] ignore::Error),

    /// A path is not valid UTF-8.
    ///
    /// Events for such paths are logged and skipped.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The language client rejected a notification.
    #[error("language client error: {0}")]
    Client(#[from] ClientError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a new [`WatchError::NonUtf8Path`] error.
    #[inline]
    pub fn non_utf8_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::NonUtf8Path(path.into())
    }

    /// Returns `true` if this error is recoverable (watching can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_) | Self::Client(_))
    }

    /// Returns `true` if this error is fatal (watching should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) => Some(path),
            Self::Notify(_) | Self::Walk(_) | Self::NonUtf8Path(_) | Self::Client(_) | Self::Io(_) => {
                None
            }
        }
    }
}
