//! Error types for the lb-tools crate.

use lb_core::ClientError;
use lb_scope::ScopeError;

/// Errors returned by the report functions.
///
/// Reports answer "nothing matched" with a descriptive message, not an
/// error. An error means the language client itself could not answer the
/// request the report depends on.
///
/// # Examples
///
/// ```
/// use lb_core::ClientError;
/// use lb_tools::ToolError;
///
/// let err = ToolError::from(ClientError::Unavailable("server exited".into()));
/// assert!(err.is_fatal());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A language client request failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Source text could not be resolved.
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl ToolError {
    /// Returns `true` if retrying the request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Client(err) => err.is_recoverable(),
            Self::Scope(_) => true,
        }
    }

    /// Returns `true` if the language client is gone.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
