//! Core types, errors, and configuration for lsp-bridge.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Config`] and its sections ([`WatchConfig`], [`ExclusionConfig`],
//!   [`RenderConfig`])
//! - Error types ([`ConfigError`], [`ClientError`])
//! - Protocol domain types: positions, ranges, symbols, diagnostics, watch
//!   registrations
//! - The [`LanguageClient`] trait, the seam between this workspace and the
//!   process that actually speaks the language server protocol
//!
//! # Crate Dependencies
//!
//! ```text
//! lb-cli ──► lb-tools ──► lb-scope ──► lb-core
//!        └─► lb-watcher ─────────────►
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::LanguageClient;
pub use config::{Config, ExclusionConfig, RenderConfig, WatchConfig};
pub use error::{ClientError, ConfigError};
pub use types::{
    Diagnostic, DiagnosticCode, DiagnosticSeverity, DocumentSymbol, DocumentSymbolResponse,
    DocumentUri, FileChangeType, GlobSpec, Hover, Location, MarkupContent, Position, Range,
    Symbol, SymbolInformation, SymbolKind, WatchKind, WatchRegistration,
};
