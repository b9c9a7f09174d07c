//! Exclusion policy for workspace paths.
//!
//! Decides which directories are never watched or walked and which files are
//! never opened or reported. Rules come from [`ExclusionConfig`] plus the
//! workspace's ignore file, which is loaded once when the policy is built.
//!
//! Two file checks are provided. [`ExclusionPolicy::should_exclude_path`]
//! only looks at the path itself and works for files that no longer exist.
//! [`ExclusionPolicy::should_exclude_file`] adds the size ceiling, which
//! needs the file's metadata; a file that cannot be stat'ed is excluded.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use lb_core::ExclusionConfig;
use rustc_hash::FxHashSet;

/// Immutable exclusion rules for one workspace root.
///
/// Cheap to clone; the rule tables are shared.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use lb_core::ExclusionConfig;
/// use lb_watcher::ExclusionPolicy;
///
/// let policy = ExclusionPolicy::new(Utf8Path::new("/ws"), &ExclusionConfig::default());
/// assert!(policy.should_exclude_dir(Utf8Path::new("/ws/node_modules")));
/// assert!(policy.should_exclude_path(Utf8Path::new("/ws/.env")));
/// assert!(!policy.should_exclude_path(Utf8Path::new("/ws/src/main.go")));
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    root: Utf8PathBuf,
    rules: Arc<Rules>,
}

#[derive(Debug)]
struct Rules {
    dirs: FxHashSet<String>,
    extensions: FxHashSet<String>,
    max_file_size: u64,
    ignore: Option<Gitignore>,
}

impl ExclusionPolicy {
    /// Builds the policy for `root`, loading `root/<ignore_file>` if present.
    ///
    /// A missing ignore file means no ignore rules. An unreadable or invalid
    /// one is logged and likewise ignored.
    #[must_use]
    pub fn new(root: &Utf8Path, config: &ExclusionConfig) -> Self {
        let extensions = config
            .extensions
            .iter()
            .chain(&config.binary_extensions)
            .map(|ext| normalize_extension(ext))
            .collect();

        Self {
            root: root.to_owned(),
            rules: Arc::new(Rules {
                dirs: config.dirs.iter().cloned().collect(),
                extensions,
                max_file_size: config.max_file_size,
                ignore: load_ignore_file(root, &config.ignore_file),
            }),
        }
    }

    /// The workspace root the policy was built for.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns `true` if the ignore file was found and parsed.
    #[must_use]
    pub fn has_ignore_rules(&self) -> bool {
        self.rules.ignore.is_some()
    }

    /// Returns `true` if the directory must not be watched or walked.
    ///
    /// The workspace root itself is never excluded.
    #[must_use]
    pub fn should_exclude_dir(&self, path: &Utf8Path) -> bool {
        if path == self.root {
            return false;
        }
        if self.is_ignored(path, true) {
            return true;
        }
        match path.file_name() {
            Some(name) => is_hidden(name) || self.rules.dirs.contains(name),
            None => false,
        }
    }

    /// Returns `true` if the path names a file that must never be opened or
    /// reported, judged from the path alone.
    ///
    /// A file is excluded when the ignore file matches it, its name starts
    /// with `.` or ends with `~`, its extension is blacklisted, or it sits
    /// below an excluded or hidden directory of the workspace.
    #[must_use]
    pub fn should_exclude_path(&self, path: &Utf8Path) -> bool {
        if self.is_ignored(path, false) {
            return true;
        }

        let Some(name) = path.file_name() else {
            return true;
        };
        if is_hidden(name) || name.ends_with('~') {
            return true;
        }
        if path
            .extension()
            .is_some_and(|ext| self.rules.extensions.contains(&ext.to_ascii_lowercase()))
        {
            return true;
        }

        self.has_excluded_ancestor(path)
    }

    /// Full file check: [`should_exclude_path`](Self::should_exclude_path)
    /// plus the size ceiling.
    ///
    /// Files whose metadata cannot be read are excluded.
    #[must_use]
    pub fn should_exclude_file(&self, path: &Utf8Path) -> bool {
        if self.should_exclude_path(path) {
            return true;
        }
        match path.metadata() {
            Ok(meta) if meta.len() > self.rules.max_file_size => {
                tracing::debug!(path = %path, size = meta.len(), "skipping large file");
                true
            }
            Ok(_) => false,
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "cannot stat file, excluding");
                true
            }
        }
    }

    fn is_ignored(&self, path: &Utf8Path, is_dir: bool) -> bool {
        let Some(ignore) = &self.rules.ignore else {
            return false;
        };
        match path.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_str().is_empty() => ignore
                .matched_path_or_any_parents(rel.as_std_path(), is_dir)
                .is_ignore(),
            _ => false,
        }
    }

    fn has_excluded_ancestor(&self, path: &Utf8Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return false;
        };
        let Some(parent) = rel.parent() else {
            return false;
        };
        parent
            .components()
            .map(|c| c.as_str())
            .any(|name| is_hidden(name) || self.rules.dirs.contains(name))
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

fn load_ignore_file(root: &Utf8Path, file_name: &str) -> Option<Gitignore> {
    if file_name.is_empty() {
        return None;
    }
    let path = root.join(file_name);
    if !path.is_file() {
        tracing::debug!(path = %path, "no ignore file");
        return None;
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(&path) {
        tracing::warn!(path = %path, error = %err, "failed to read ignore file");
        return None;
    }
    match builder.build() {
        Ok(ignore) => {
            tracing::debug!(path = %path, rules = ignore.num_ignores(), "loaded ignore file");
            Some(ignore)
        }
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "failed to compile ignore file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    fn touch(root: &Utf8Path, rel: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_excluded_directory_names() {
        let policy = ExclusionPolicy::new(Utf8Path::new("/ws"), &ExclusionConfig::default());
        assert!(policy.should_exclude_dir(Utf8Path::new("/ws/node_modules")));
        assert!(policy.should_exclude_dir(Utf8Path::new("/ws/pkg/target")));
        assert!(policy.should_exclude_dir(Utf8Path::new("/ws/.hidden")));
        assert!(!policy.should_exclude_dir(Utf8Path::new("/ws/src")));
        assert!(!policy.should_exclude_dir(Utf8Path::new("/ws")));
    }

    #[test]
    fn test_file_inside_node_modules_is_excluded() {
        let (_dir, root) = workspace();
        let policy = ExclusionPolicy::new(&root, &ExclusionConfig::default());
        let path = touch(&root, "node_modules/pkg/index.ts", b"export {}");
        assert!(policy.should_exclude_file(&path));
        assert!(policy.should_exclude_path(&path));
    }

    #[test]
    fn test_dotfile_is_excluded() {
        let (_dir, root) = workspace();
        let policy = ExclusionPolicy::new(&root, &ExclusionConfig::default());
        let path = touch(&root, ".env", b"SECRET=1");
        assert!(policy.should_exclude_file(&path));
    }

    #[test]
    fn test_extension_rules_are_case_insensitive() {
        let policy = ExclusionPolicy::new(Utf8Path::new("/ws"), &ExclusionConfig::default());
        assert!(policy.should_exclude_path(Utf8Path::new("/ws/logo.PNG")));
        assert!(policy.should_exclude_path(Utf8Path::new("/ws/Cargo.lock")));
        assert!(policy.should_exclude_path(Utf8Path::new("/ws/main.go~")));
        assert!(!policy.should_exclude_path(Utf8Path::new("/ws/main.go")));
    }

    #[test]
    fn test_oversize_file_is_excluded() {
        let (_dir, root) = workspace();
        let config = ExclusionConfig {
            max_file_size: 16,
            ..ExclusionConfig::default()
        };
        let policy = ExclusionPolicy::new(&root, &config);
        let small = touch(&root, "small.go", b"package a");
        let large = touch(&root, "large.go", &[b'x'; 64]);
        assert!(!policy.should_exclude_file(&small));
        assert!(policy.should_exclude_file(&large));
    }

    #[test]
    fn test_missing_file_is_excluded_but_path_rules_pass() {
        let (_dir, root) = workspace();
        let policy = ExclusionPolicy::new(&root, &ExclusionConfig::default());
        let gone = root.join("deleted.go");
        assert!(policy.should_exclude_file(&gone));
        assert!(!policy.should_exclude_path(&gone));
    }

    #[test]
    fn test_ignore_file_rules() {
        let (_dir, root) = workspace();
        touch(&root, ".gitignore", b"generated/\n*.pb.go\n");
        let policy = ExclusionPolicy::new(&root, &ExclusionConfig::default());
        assert!(policy.has_ignore_rules());

        let generated = touch(&root, "generated/api.go", b"package generated");
        let proto = touch(&root, "api/service.pb.go", b"package api");
        let source = touch(&root, "api/service.go", b"package api");

        assert!(policy.should_exclude_dir(&root.join("generated")));
        assert!(policy.should_exclude_file(&generated));
        assert!(policy.should_exclude_file(&proto));
        assert!(!policy.should_exclude_file(&source));
    }

    #[test]
    fn test_missing_ignore_file_means_no_rules() {
        let (_dir, root) = workspace();
        let policy = ExclusionPolicy::new(&root, &ExclusionConfig::default());
        assert!(!policy.has_ignore_rules());
    }

    #[test]
    fn test_hidden_workspace_root_is_not_excluded() {
        let policy = ExclusionPolicy::new(Utf8Path::new("/tmp/.tmpAbc"), &ExclusionConfig::default());
        assert!(!policy.should_exclude_dir(Utf8Path::new("/tmp/.tmpAbc")));
        assert!(!policy.should_exclude_path(Utf8Path::new("/tmp/.tmpAbc/src/lib.rs")));
    }
}
