//! The workspace watch loop.
//!
//! [`WorkspaceWatcher`] ties the pieces of this crate together:
//!
//! ```text
//! ┌──────────────────────┐  notify callback   ┌──────────────────────────┐
//! │ RecommendedWatcher   │ ─────────────────► │ mpsc::UnboundedReceiver  │
//! │ (one watch per dir)  │                    └────────────┬─────────────┘
//! └──────────▲───────────┘                                 │ classify
//!            │ new directories                             ▼
//!            │                    ┌─────────────────────────────────────────┐
//!            └─────────────────── │ watch loop (select! with cancellation)  │
//!                                 │  ExclusionPolicy → RegistrationStore    │
//!                                 └───────┬─────────────────────┬───────────┘
//!                              immediate  │                     │ debounced
//!                      (open, delete)     ▼                     ▼
//!                                 ┌──────────────────────────────────────────┐
//!                                 │ LanguageClient                           │
//!                                 └──────────────────────────────────────────┘
//! ```
//!
//! Registrations arrive from the language server at any time through
//! [`WorkspaceWatcher::add_registrations`], which also starts the bulk open
//! walk on a separate task so the loop is never blocked by it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use lb_core::{
    Config, DocumentUri, FileChangeType, LanguageClient, WatchConfig, WatchRegistration,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::debounce::Debouncer;
use crate::error::WatchError;
use crate::events::{FsChange, classify};
use crate::exclusion::ExclusionPolicy;
use crate::registry::RegistrationStore;

/// Key of a debounced notification: one pending timer per file and change kind.
type DebounceKey = (Utf8PathBuf, FileChangeType);

/// Outcome of one bulk open walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenStats {
    /// Non-excluded files the walk visited.
    pub scanned: usize,
    /// Files that passed exclusion and registration checks.
    pub matched: usize,
    /// Files actually opened (already open files are skipped).
    pub opened: usize,
    /// Files whose open request failed.
    pub failed: usize,
}

/// Watches one workspace root and keeps a language client informed.
///
/// Shared as `Arc<WorkspaceWatcher>`: the watch loop, the bulk open walk,
/// and debounce timers all hold a reference.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use camino::Utf8Path;
/// use lb_core::{Config, GlobSpec, LanguageClient, WatchRegistration};
/// use lb_watcher::WorkspaceWatcher;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(client: Arc<dyn LanguageClient>) -> Result<(), lb_watcher::WatchError> {
/// let watcher = WorkspaceWatcher::new(client, Utf8Path::new("./"), &Config::default())?;
/// watcher.add_registrations("1", vec![WatchRegistration::new(GlobSpec::new("**/*.go"))]);
///
/// let cancel = CancellationToken::new();
/// Arc::clone(&watcher).watch(cancel.clone()).await?;
/// # Ok(())
/// # }
/// ```
pub struct WorkspaceWatcher {
    client: Arc<dyn LanguageClient>,
    root: Utf8PathBuf,
    policy: ExclusionPolicy,
    registrations: RegistrationStore,
    debouncer: Debouncer<DebounceKey>,
    config: WatchConfig,
}

impl std::fmt::Debug for WorkspaceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceWatcher")
            .field("root", &self.root)
            .field("registrations", &self.registrations.len())
            .field("pending", &self.debouncer.pending())
            .finish_non_exhaustive()
    }
}

impl WorkspaceWatcher {
    /// Creates a watcher for `root`.
    ///
    /// The root is canonicalized and its ignore file loaded. Nothing is
    /// watched until [`watch`](Self::watch) runs.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if `root` does not exist.
    pub fn new(
        client: Arc<dyn LanguageClient>,
        root: &Utf8Path,
        config: &Config,
    ) -> Result<Arc<Self>, WatchError> {
        if !root.exists() {
            return Err(WatchError::path_not_found(root));
        }
        let root = root.canonicalize_utf8()?;
        let policy = ExclusionPolicy::new(&root, &config.exclude);

        Ok(Arc::new(Self {
            client,
            root,
            policy,
            registrations: RegistrationStore::new(),
            debouncer: Debouncer::new(),
            config: config.watch,
        }))
    }

    /// The canonical workspace root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The exclusion rules in force.
    #[must_use]
    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// The active registrations.
    #[must_use]
    pub fn registrations(&self) -> &RegistrationStore {
        &self.registrations
    }

    /// Records registrations from the language server.
    ///
    /// Unless disabled in [`WatchConfig::open_on_register`], this spawns the
    /// bulk open walk and returns its handle; the caller may drop it.
    pub fn add_registrations(
        self: &Arc<Self>,
        id: &str,
        registrations: Vec<WatchRegistration>,
    ) -> Option<JoinHandle<Result<OpenStats, WatchError>>> {
        if self.config.verbose {
            for registration in &registrations {
                tracing::debug!(
                    id,
                    pattern = %registration.glob_pattern.pattern,
                    base = ?registration.glob_pattern.base_path,
                    mask = registration.mask().bits(),
                    "watch registration"
                );
            }
        }
        let added = self.registrations.add(id, registrations);
        tracing::info!(id, added, total = self.registrations.len(), "added file watch registrations");

        if !self.config.open_on_register {
            return None;
        }
        let watcher = Arc::clone(self);
        Some(tokio::spawn(async move { watcher.open_matching_files().await }))
    }

    /// Drops registrations added under `id`.
    pub fn remove_registrations(&self, id: &str) -> usize {
        let removed = self.registrations.remove(id);
        tracing::info!(id, removed, "removed file watch registrations");
        removed
    }

    /// Opens every non-excluded, watched file in the workspace.
    ///
    /// The directory walk runs on the blocking pool. Every non-excluded file
    /// counts toward a batch of [`WatchConfig::open_batch_size`], whether or
    /// not a registration matches it, and the walk pauses after each batch
    /// so the server's ingestion is not flooded.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Walk`] only if the walk task itself fails;
    /// unreadable entries and failed opens are logged and skipped.
    pub async fn open_matching_files(self: Arc<Self>) -> Result<OpenStats, WatchError> {
        let started = Instant::now();
        let walker = Arc::clone(&self);
        let candidates = tokio::task::spawn_blocking(move || walker.collect_candidate_files())
            .await
            .map_err(|err| WatchError::Io(std::io::Error::other(err)))?;

        let mut stats = OpenStats {
            scanned: candidates.len(),
            ..OpenStats::default()
        };
        let pause = Duration::from_millis(self.config.open_batch_pause_ms);
        let batch = self.config.open_batch_size.max(1);

        for (idx, path) in candidates.iter().enumerate() {
            if self.registrations.is_watched(path.as_str()).is_some() {
                stats.matched += 1;
                if !self.client.is_file_open(path) {
                    match self.client.open_file(path).await {
                        Ok(()) => stats.opened += 1,
                        Err(err) => {
                            stats.failed += 1;
                            tracing::warn!(path = %path, error = %err, "failed to open file");
                        }
                    }
                }
            }
            if (idx + 1) % batch == 0 {
                tokio::time::sleep(pause).await;
            }
        }

        tracing::info!(
            scanned = stats.scanned,
            matched = stats.matched,
            opened = stats.opened,
            failed = stats.failed,
            elapsed_ms = started.elapsed().as_millis(),
            "workspace open walk complete"
        );
        Ok(stats)
    }

    /// Every file below the root that survives the exclusion rules.
    fn collect_candidate_files(&self) -> Vec<Utf8PathBuf> {
        let mut files = Vec::new();
        for entry in self.walker().build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable workspace entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                continue;
            };
            if !self.policy.should_exclude_file(&path) {
                files.push(path);
            }
        }
        files
    }

    /// Directories to watch: the root and every non-excluded directory below it.
    fn collect_directories(&self) -> Result<Vec<Utf8PathBuf>, WatchError> {
        let mut dirs = Vec::new();
        for entry in self.walker().build() {
            let entry = entry?;
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let path = Utf8PathBuf::from_path_buf(entry.into_path())
                    .map_err(WatchError::non_utf8_path)?;
                dirs.push(path);
            }
        }
        Ok(dirs)
    }

    fn walker(&self) -> WalkBuilder {
        let policy = self.policy.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }
                Utf8Path::from_path(entry.path())
                    .is_some_and(|path| !policy.should_exclude_dir(path))
            });
        builder
    }

    /// Runs the watch loop until `cancel` fires or the event source fails.
    ///
    /// Every non-excluded directory is watched individually, so excluded
    /// trees such as `node_modules` never consume OS watch handles.
    /// Directories created later are added as they appear.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Notify`] if the OS subscription cannot be
    /// created or reports an error, and [`WatchError::Walk`] if the initial
    /// directory walk fails. Both stop the loop.
    pub async fn watch(self: Arc<Self>, cancel: CancellationToken) -> Result<(), WatchError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            // Receiver gone means the loop has exited.
            let _ = tx.send(res);
        })?;

        let walker = Arc::clone(&self);
        let dirs = tokio::task::spawn_blocking(move || walker.collect_directories())
            .await
            .map_err(|err| WatchError::Io(std::io::Error::other(err)))??;
        for dir in &dirs {
            watcher.watch(dir.as_std_path(), RecursiveMode::NonRecursive)?;
        }
        tracing::info!(root = %self.root, directories = dirs.len(), "workspace watcher started");

        let result = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(root = %self.root, "workspace watcher stopping");
                    break Ok(());
                }
                received = rx.recv() => match received {
                    Some(Ok(event)) => self.handle_event(&mut watcher, &event).await,
                    Some(Err(err)) => {
                        tracing::error!(error = %err, "file watcher error");
                        break Err(WatchError::Notify(err));
                    }
                    None => break Ok(()),
                },
            }
        };

        self.debouncer.cancel_all();
        result
    }

    async fn handle_event(self: &Arc<Self>, watcher: &mut RecommendedWatcher, event: &notify::Event) {
        if self.config.verbose {
            for path in &event.paths {
                let mask = path
                    .to_str()
                    .and_then(|p| self.registrations.is_watched(p))
                    .map(|mask| mask.bits());
                tracing::debug!(path = %path.display(), kind = ?event.kind, watched = ?mask, "file event");
            }
        }

        for change in classify(event) {
            match change {
                FsChange::Created(path) => self.on_created(watcher, path).await,
                FsChange::Written(path) => self.on_written(path),
                FsChange::Removed(path) => self.on_removed(&path).await,
                FsChange::Renamed(path) => self.on_renamed(watcher, path).await,
            }
        }
    }

    /// A rename half names a path that either left or joined the tree. The
    /// old name is always reported deleted; if a file now exists under the
    /// name, it is handled as a fresh creation.
    async fn on_renamed(self: &Arc<Self>, watcher: &mut RecommendedWatcher, path: Utf8PathBuf) {
        self.on_removed(&path).await;
        if path.is_file() {
            self.on_created(watcher, path).await;
        }
    }

    async fn on_created(self: &Arc<Self>, watcher: &mut RecommendedWatcher, path: Utf8PathBuf) {
        let Ok(meta) = path.metadata() else {
            tracing::trace!(path = %path, "created path vanished");
            return;
        };

        if meta.is_dir() {
            if self.policy.should_exclude_dir(&path) {
                tracing::trace!(path = %path, "ignoring excluded directory");
            } else if let Err(err) = watcher.watch(path.as_std_path(), RecursiveMode::NonRecursive) {
                tracing::warn!(path = %path, error = %err, "failed to watch new directory");
            } else {
                tracing::debug!(path = %path, "watching new directory");
            }
            return;
        }

        if self.policy.should_exclude_file(&path) {
            return;
        }
        let Some(mask) = self.registrations.is_watched(path.as_str()) else {
            return;
        };

        if let Err(err) = self.client.open_file(&path).await {
            tracing::warn!(path = %path, error = %err, "failed to open new file");
        }
        if mask.contains(FileChangeType::Created.watch_kind()) {
            self.schedule(path, FileChangeType::Created);
        }
    }

    fn on_written(self: &Arc<Self>, path: Utf8PathBuf) {
        let Some(mask) = self.registrations.is_watched(path.as_str()) else {
            return;
        };
        if mask.contains(FileChangeType::Changed.watch_kind())
            && !self.policy.should_exclude_file(&path)
        {
            self.schedule(path, FileChangeType::Changed);
        }
    }

    async fn on_removed(&self, path: &Utf8Path) {
        let Some(mask) = self.registrations.is_watched(path.as_str()) else {
            return;
        };
        // The file is gone, so only the path-based rules can apply.
        if !mask.contains(FileChangeType::Deleted.watch_kind())
            || self.policy.should_exclude_path(path)
        {
            return;
        }
        // Drop a pending write so it cannot land after the delete.
        let key = (path.to_owned(), FileChangeType::Changed);
        if self.debouncer.cancel(&key) {
            tracing::trace!(path = %path, "dropped pending change for deleted file");
        }
        self.dispatch(path, FileChangeType::Deleted).await;
    }

    fn schedule(self: &Arc<Self>, path: Utf8PathBuf, change: FileChangeType) {
        let watcher = Arc::clone(self);
        let delay = Duration::from_millis(self.config.debounce_ms);
        let timer_path = path.clone();
        self.debouncer.schedule((path, change), delay, async move {
            watcher.dispatch(&timer_path, change).await;
        });
    }

    /// Sends one notification for `path`.
    ///
    /// Content changes to files the client has open go out as in-place
    /// change notifications; everything else as a watched-files change.
    async fn dispatch(&self, path: &Utf8Path, change: FileChangeType) {
        let result = if change == FileChangeType::Changed && self.client.is_file_open(path) {
            self.client.notify_change(path).await
        } else {
            let uri = DocumentUri::from_path(path);
            self.client.did_change_watched_files(&uri, change).await
        };

        match result {
            Ok(()) => tracing::debug!(path = %path, change = change.as_str(), "notified language server"),
            Err(err) => tracing::warn!(
                path = %path,
                change = change.as_str(),
                error = %err,
                "failed to notify language server"
            ),
        }
    }
}
