//! Directory tree indexing: spoken keys to canonical relative paths

use crate::config::Config;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// File name suffixes treated as junk during a scan.
const SKIP_SUFFIXES: &[&str] = &[".log", ".tmp", ".temp", ".cache"];

/// Insertion-ordered mapping from spoken key to canonical relative path.
///
/// A point-in-time snapshot of one scan. Keys keep their stored casing;
/// lookups are case-insensitive. Insertion order is load-bearing: humanized
/// duplicates are dropped (first writer wins) and the substring fallback in
/// [`crate::rewrite::resolve_spoken`] returns the first entry found.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    entries: Vec<(String, String)>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an entry. An existing key keeps its insertion
    /// position but takes the new path (later files shadow earlier ones of
    /// the same name).
    pub(crate) fn insert(&mut self, key: String, path: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = path;
        } else {
            self.entries.push((key, path));
        }
    }

    /// Insert only when the key is free. First writer wins: humanized
    /// variants never displace an existing entry, exact or humanized.
    pub(crate) fn insert_if_absent(&mut self, key: String, path: String) -> bool {
        if self.entries.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.entries.push((key, path));
        true
    }

    /// Case-insensitive exact lookup, in insertion order.
    pub fn get(&self, spoken_key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == spoken_key.to_lowercase())
            .map(|(_, p)| p.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct file extensions present among the stored keys (the substring
    /// after the last `.`), sorted for deterministic iteration.
    pub fn extensions(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter_map(|(k, _)| k.rsplit_once('.').map(|(_, ext)| ext))
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_string())
            .collect()
    }
}

/// Serializable status payload for host diagnostics.
#[derive(Debug, Serialize)]
pub struct TreeReport {
    pub monitored_root: String,
    pub keys_tracked: usize,
    pub folders: BTreeMap<String, Vec<String>>,
    pub ignored_dirs: Vec<String>,
}

/// Owning engine instance: monitored root, ignore set, and the current index.
///
/// All state is explicit fields so independent engines can coexist (one per
/// test, one per monitored project). The index is rebuilt from scratch on
/// every rescan; callers embedding this in a concurrent host must either
/// serialize `set_root`/`rescan` against readers or replace whole instances
/// atomically.
pub struct TreeIndex {
    root: PathBuf,
    ignored_dirs: BTreeSet<String>,
    index: FileIndex,
}

impl TreeIndex {
    /// Create an engine for `root` with the default ignore set and scan it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, &Config::default())
    }

    /// Create an engine with the ignore set from `config` and scan `root`.
    pub fn with_config(root: impl Into<PathBuf>, config: &Config) -> Self {
        let mut tree = Self {
            root: root.into(),
            ignored_dirs: config.scan.ignored_dirs.iter().cloned().collect(),
            index: FileIndex::new(),
        };
        tree.rescan();
        tree
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current index snapshot.
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Replace the monitored root and rebuild the index for the new tree.
    pub fn set_root(&mut self, new_root: impl Into<PathBuf>) {
        self.root = new_root.into();
        self.rescan();
    }

    /// Walk the monitored root and rebuild the index from scratch.
    ///
    /// A nonexistent root leaves an empty index: "no known files" is a valid
    /// state for a caller whose project path is not yet created.
    pub fn rescan(&mut self) {
        let mut index = FileIndex::new();

        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "scan root is not a directory, index left empty");
            self.index = index;
            return;
        }

        let ignored = self.ignored_dirs.clone();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !prune_dir(entry, &ignored));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!(error = %err, "unreadable entry skipped");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if is_junk_file(name) {
                debug!(file = name, "junk file skipped");
                continue;
            }
            let Some(relative) = relative_slash_path(entry.path(), &self.root) else {
                continue;
            };

            index.insert(name.to_string(), relative.clone());
            if let Some(spoken) = humanize(name) {
                index.insert_if_absent(spoken, relative);
            }
        }

        info!(
            root = %self.root.display(),
            keys = index.len(),
            "scan complete"
        );
        self.index = index;
    }

    /// Group index entries by the directory portion of their canonical path.
    /// The root directory groups under the empty string. Diagnostics only.
    pub fn summary(&self) -> BTreeMap<String, Vec<String>> {
        let mut folders: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, path) in self.index.iter() {
            let dir = match path.rsplit_once('/') {
                Some((dir, _)) => dir.to_string(),
                None => String::new(),
            };
            folders.entry(dir).or_default().push(key.to_string());
        }
        folders
    }

    /// One serializable bundle of everything a host diagnostics surface needs.
    pub fn report(&self) -> TreeReport {
        TreeReport {
            monitored_root: self.root.display().to_string(),
            keys_tracked: self.index.len(),
            folders: self.summary(),
            ignored_dirs: self.ignored_dirs(),
        }
    }

    /// The ignore set as a sorted list, for read-only introspection.
    pub fn ignored_dirs(&self) -> Vec<String> {
        self.ignored_dirs.iter().cloned().collect()
    }

    /// Add a directory name to the ignore set. Applies to subsequent scans.
    pub fn add_ignored_dir(&mut self, name: impl Into<String>) {
        self.ignored_dirs.insert(name.into());
    }

    /// Remove a directory name from the ignore set. Applies to subsequent scans.
    pub fn remove_ignored_dir(&mut self, name: &str) {
        self.ignored_dirs.remove(name);
    }
}

/// Prune ignored directories before descending so their subtrees are never
/// visited. The root itself (depth 0) is always kept, even when its own name
/// is in the ignore set.
fn prune_dir(entry: &DirEntry, ignored: &BTreeSet<String>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| ignored.contains(name))
}

/// Hidden files and scratch artifacts never enter the index.
fn is_junk_file(name: &str) -> bool {
    name.starts_with('.') || SKIP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Path relative to `root` with separators normalized to `/`.
fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect();
    Some(parts?.join("/"))
}

/// Spoken variant of a filename: underscores read aloud become spaces.
///
/// Returns None when the variant adds nothing: unchanged names, names
/// reserved by a leading double underscore (`__init__.py` and friends), and
/// variants that are blank after trimming.
fn humanize(name: &str) -> Option<String> {
    if name.starts_with("__") {
        return None;
    }
    let spoken = name.replace('_', " ");
    if spoken == name || spoken.trim().is_empty() {
        return None;
    }
    Some(spoken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"x").unwrap();
    }

    #[test]
    fn humanized_variant_indexed_beside_exact_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_bar.py");

        let tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().get("foo_bar.py"), Some("foo_bar.py"));
        assert_eq!(tree.index().get("foo bar.py"), Some("foo_bar.py"));
    }

    #[test]
    fn dunder_files_get_no_humanized_key() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "__init__.py");

        let tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().get("__init__.py"), Some("__init__.py"));
        assert_eq!(tree.index().get("  init  .py"), None);
        assert_eq!(tree.index().len(), 1);
    }

    #[test]
    fn nested_paths_use_forward_slashes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/deep/module.rs");

        let tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().get("module.rs"), Some("src/deep/module.rs"));
    }

    #[test]
    fn ignored_directories_are_never_descended() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "node_modules/lodash/index.js");
        touch(dir.path(), "src/app.js");

        let tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().get("index.js"), None);
        assert_eq!(tree.index().get("app.js"), Some("src/app.js"));
    }

    #[test]
    fn ignore_set_edits_apply_on_next_rescan() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "vendor/lib.rs");

        let mut tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().get("lib.rs"), None);

        tree.remove_ignored_dir("vendor");
        tree.rescan();
        assert_eq!(tree.index().get("lib.rs"), Some("vendor/lib.rs"));

        tree.add_ignored_dir("vendor");
        tree.rescan();
        assert_eq!(tree.index().get("lib.rs"), None);
    }

    #[test]
    fn hidden_and_scratch_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".secret");
        touch(dir.path(), "debug.log");
        touch(dir.path(), "state.tmp");
        touch(dir.path(), "app.py");

        let tree = TreeIndex::new(dir.path());
        assert_eq!(tree.index().len(), 1);
        assert_eq!(tree.index().get("app.py"), Some("app.py"));
    }

    #[test]
    fn nonexistent_root_yields_empty_index_and_summary() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("not-created-yet");

        let tree = TreeIndex::new(&missing);
        assert!(tree.index().is_empty());
        assert!(tree.summary().is_empty());
    }

    #[test]
    fn set_root_discards_previous_index() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(a.path(), "alpha.py");
        touch(b.path(), "beta.py");

        let mut tree = TreeIndex::new(a.path());
        assert!(tree.index().get("alpha.py").is_some());

        tree.set_root(b.path());
        assert_eq!(tree.index().get("alpha.py"), None);
        assert_eq!(tree.index().get("beta.py"), Some("beta.py"));
    }

    #[test]
    fn duplicate_exact_names_shadow_earlier_paths() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/util.py");
        touch(dir.path(), "b/util.py");

        let tree = TreeIndex::new(dir.path());
        // Traversal is sorted by file name, so b/ is scanned after a/ and
        // its path takes over the exact-name key.
        assert_eq!(tree.index().get("util.py"), Some("b/util.py"));
    }

    #[test]
    fn humanized_collision_first_writer_wins() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/my_file.py");
        touch(dir.path(), "b/my_file.py");

        let tree = TreeIndex::new(dir.path());
        // The exact key follows the last writer; the humanized key stays
        // with the first writer and is never displaced.
        assert_eq!(tree.index().get("my_file.py"), Some("b/my_file.py"));
        assert_eq!(tree.index().get("my file.py"), Some("a/my_file.py"));
    }

    #[test]
    fn summary_groups_by_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.md");
        touch(dir.path(), "src/one.rs");
        touch(dir.path(), "src/two.rs");

        let tree = TreeIndex::new(dir.path());
        let summary = tree.summary();
        assert_eq!(summary[""], vec!["top.md".to_string()]);
        assert_eq!(summary["src"], vec!["one.rs".to_string(), "two.rs".to_string()]);
    }

    #[test]
    fn report_bundles_root_counts_and_ignores() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main_loop.py");

        let tree = TreeIndex::new(dir.path());
        let report = tree.report();
        assert_eq!(report.keys_tracked, 2); // exact + humanized
        assert!(report.ignored_dirs.iter().any(|d| d == "node_modules"));
        assert!(report.folders.contains_key(""));
    }

    #[test]
    fn extensions_collects_distinct_suffixes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app.py");
        touch(dir.path(), "util.py");
        touch(dir.path(), "index.html");
        touch(dir.path(), "Makefile");

        let tree = TreeIndex::new(dir.path());
        let exts: Vec<String> = tree.index().extensions().into_iter().collect();
        assert_eq!(exts, vec!["html".to_string(), "py".to_string()]);
    }

    #[test]
    fn ignored_root_itself_is_still_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("artifact.py"), b"x").unwrap();

        let tree = TreeIndex::new(&root);
        assert_eq!(tree.index().get("artifact.py"), Some("artifact.py"));
    }
}
