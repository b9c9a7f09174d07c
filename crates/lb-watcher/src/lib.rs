//! Workspace watcher that keeps a language server in sync with the disk.
//!
//! This crate watches a workspace root and turns filesystem activity into
//! language server notifications through the [`lb_core::LanguageClient`]
//! trait.
//!
//! # Overview
//!
//! The lb-watcher crate is designed to:
//!
//! - Watch every non-excluded directory individually, picking up new
//!   directories as they appear
//! - Skip dependency, build, and VCS trees, hidden entries, binaries, and
//!   oversized files ([`ExclusionPolicy`])
//! - Honour the glob registrations the server asks for ([`RegistrationStore`])
//! - Collapse editor save bursts into one notification per file and change
//!   kind ([`Debouncer`], 300ms by default)
//! - Open every matching file once when registrations arrive, throttled in
//!   batches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    notify thread                                │
//! │  ┌───────────────────┐  send   ┌──────────────────────────────┐ │
//! │  │ RecommendedWatcher│ ──────► │ mpsc::UnboundedSender        │ │
//! │  └───────────────────┘         └──────────────┬───────────────┘ │
//! └───────────────────────────────────────────────│─────────────────┘
//!                                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐  ┌─────────────────┐  ┌───────────────┐   │
//! │  │ classify (events)│─►│ WorkspaceWatcher│─►│ Debouncer     │   │
//! │  └──────────────────┘  └────────┬────────┘  └──────┬────────┘   │
//! │                                 ▼                  ▼            │
//! │                        ┌──────────────────────────────────┐     │
//! │                        │ LanguageClient                   │     │
//! │                        └──────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use camino::Utf8Path;
//! use lb_core::{Config, GlobSpec, LanguageClient, WatchRegistration};
//! use lb_watcher::WorkspaceWatcher;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run(client: Arc<dyn LanguageClient>) -> Result<(), lb_watcher::WatchError> {
//! let watcher = WorkspaceWatcher::new(client, Utf8Path::new("/path/to/project"), &Config::default())?;
//! watcher.add_registrations("go", vec![WatchRegistration::new(GlobSpec::new("**/*.go"))]);
//!
//! let cancel = CancellationToken::new();
//! let loop_cancel = cancel.clone();
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     loop_cancel.cancel();
//! });
//! watcher.watch(cancel).await
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod debounce;
pub mod error;
pub mod events;
pub mod exclusion;
pub mod pattern;
pub mod registry;
pub mod watcher;

pub use debounce::Debouncer;
pub use error::WatchError;
pub use events::FsChange;
pub use exclusion::ExclusionPolicy;
pub use registry::RegistrationStore;
pub use watcher::{OpenStats, WorkspaceWatcher};
