//! Error types for the lb-core crate.
//!
//! - [`ConfigError`] for configuration loading and validation
//! - [`ClientError`] for failures reported by a [`LanguageClient`](crate::LanguageClient)

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use lb_core::ConfigError;
///
/// let error = ConfigError::invalid_option("watch.debounce_ms", "must be positive");
/// assert!(error.to_string().contains("watch.debounce_ms"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ConfigError::InvalidPath`] error.
    #[inline]
    pub fn invalid_path(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a language client.
///
/// # Error Recovery Strategy
///
/// - **Request errors** ([`ClientError::Request`]): Recoverable - the request's
///   contribution is dropped and the caller carries on with partial results
/// - **Unavailable** ([`ClientError::Unavailable`]): Fatal - the client cannot
///   be reached at all
/// - **I/O errors** ([`ClientError::Io`]): Recoverable - usually a single file
///   could not be read before being sent
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A protocol request returned an error.
    #[error("{method} request failed: {message}")]
    Request {
        /// Protocol method name, e.g. `textDocument/references`.
        method: String,
        /// Error message returned by the server.
        message: String,
    },

    /// The language client is not running or the connection is gone.
    #[error("language client unavailable: {0}")]
    Unavailable(String),

    /// An I/O error occurred while preparing a request.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Creates a new [`ClientError::Request`] error.
    #[inline]
    pub fn request(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the caller can continue with other requests.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }

    /// Returns `true` if the client itself could not be reached.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::invalid_path("/invalid/path", "not a directory");
        let msg = error.to_string();
        assert!(msg.contains("/invalid/path"));
        assert!(msg.contains("not a directory"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("render.max_lines", "must be positive");
        let msg = error.to_string();
        assert!(msg.contains("render.max_lines"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_client_error_request() {
        let err = ClientError::request("textDocument/hover", "timeout");
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "textDocument/hover request failed: timeout");
    }

    #[test]
    fn test_client_error_unavailable() {
        let err = ClientError::Unavailable("server exited".to_owned());
        assert!(!err.is_recoverable());
        assert!(err.is_fatal());
        assert!(err.to_string().contains("server exited"));
    }
}
