//! Configuration structures for lsp-bridge.
//!
//! - [`WatchConfig`] - Workspace watcher settings (debouncing, bulk open throttle)
//! - [`ExclusionConfig`] - Which directories and files the watcher ignores
//! - [`RenderConfig`] - Windowing limits for rendered code scopes
//! - [`Config`] - Root configuration combining all settings
//!
//! Every section implements [`Default`] and is `#[serde(default)]`, so a
//! configuration file only needs to name the values it overrides.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the workspace watcher.
///
/// # Examples
///
/// ```
/// use lb_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 300);
/// assert_eq!(config.open_batch_size, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period in milliseconds before a create/change notification fires.
    ///
    /// Repeated events for the same file and kind inside this window collapse
    /// into a single notification.
    pub debounce_ms: u64,

    /// Number of files processed by the bulk open walk between pauses.
    pub open_batch_size: usize,

    /// Pause in milliseconds after each batch of the bulk open walk.
    pub open_batch_pause_ms: u64,

    /// Whether registering watchers triggers the bulk open walk.
    ///
    /// Some language servers index the workspace themselves and do not need
    /// every file opened up front.
    pub open_on_register: bool,

    /// Log every raw event and registration decision at debug level.
    pub verbose: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            open_batch_size: 100,
            open_batch_pause_ms: 10,
            open_on_register: true,
            verbose: false,
        }
    }
}

/// Exclusion rules applied to every path the watcher sees.
///
/// Extensions are stored lowercase with their leading dot (`.log`).
///
/// # Examples
///
/// ```
/// use lb_core::ExclusionConfig;
///
/// let config = ExclusionConfig::default();
/// assert!(config.dirs.iter().any(|d| d == "node_modules"));
/// assert_eq!(config.max_file_size, 5 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Directory names that are never descended into.
    pub dirs: Vec<String>,

    /// File extensions that are never opened (editor swap files, objects, locks).
    pub extensions: Vec<String>,

    /// Extensions of large binary formats.
    pub binary_extensions: Vec<String>,

    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,

    /// Name of the ignore file read from the workspace root.
    pub ignore_file: String,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            dirs: to_owned_all(&[
                ".git",
                "node_modules",
                "dist",
                "build",
                "out",
                "bin",
                ".idea",
                ".vscode",
                ".cache",
                "coverage",
                "target",
                "vendor",
            ]),
            extensions: to_owned_all(&[
                ".swp", ".swo", ".tmp", ".temp", ".bak", ".log", ".o", ".so", ".dylib", ".dll",
                ".a", ".exe", ".lock",
            ]),
            binary_extensions: to_owned_all(&[
                ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".zip", ".tar", ".gz", ".rar",
                ".7z", ".pdf", ".mp3", ".mp4", ".mov", ".wav", ".wasm",
            ]),
            max_file_size: 5 * 1024 * 1024,
            ignore_file: ".gitignore".to_owned(),
        }
    }
}

fn to_owned_all(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Limits used when rendering code scopes for reference reports.
///
/// # Examples
///
/// ```
/// use lb_core::RenderConfig;
///
/// let config = RenderConfig::default();
/// assert_eq!(config.max_lines, 50);
/// assert_eq!(config.context_lines, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scopes with at most this many lines are rendered whole.
    pub max_lines: usize,

    /// Lines always kept from the top of a truncated scope.
    pub head_lines: usize,

    /// Lines always kept from the bottom of a truncated scope.
    pub tail_lines: usize,

    /// Lines kept on each side of a highlighted line.
    pub context_lines: usize,

    /// Half-height of the context window used when no symbol encloses a reference.
    pub fallback_context_lines: u32,

    /// Reference positions printed per `References:` line.
    pub references_per_line: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_lines: 50,
            head_lines: 5,
            tail_lines: 3,
            context_lines: 2,
            fallback_context_lines: 5,
            references_per_line: 4,
        }
    }
}

/// Root configuration for lsp-bridge.
///
/// # Examples
///
/// ```
/// use lb_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"watch": {"debounce_ms": 50}}"#).unwrap();
/// assert_eq!(config.watch.debounce_ms, 50);
/// assert_eq!(config.render.max_lines, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace watcher configuration.
    pub watch: WatchConfig,

    /// Exclusion rules.
    pub exclude: ExclusionConfig,

    /// Scope rendering configuration.
    pub render: RenderConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON for this structure.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the watcher or renderer misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.open_batch_size == 0 {
            return Err(ConfigError::invalid_option(
                "watch.open_batch_size",
                "must be at least 1",
            ));
        }
        if self.render.references_per_line == 0 {
            return Err(ConfigError::invalid_option(
                "render.references_per_line",
                "must be at least 1",
            ));
        }
        if self.render.head_lines + self.render.tail_lines > self.render.max_lines {
            return Err(ConfigError::invalid_option(
                "render.max_lines",
                "must be at least head_lines + tail_lines",
            ));
        }
        Ok(())
    }
}
