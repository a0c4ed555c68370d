//! The repository façade: every user-facing operation on the index.
//!
//! Each operation is one load, an in-memory mutation or query, and at most
//! one save. Nothing is persisted half-way.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, Options};
use crate::error::{Result, TagitError};
use crate::model::{Document, Entry};
use crate::store::{create_store, resolve_store_root, FsStore, Store};
use crate::tags;
use crate::{CONFIG_FILE, TAGIT_DIR};

/// What `update` changed.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub added: usize,
    pub pruned: usize,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub files: usize,
    pub tags: usize,
    pub untagged: usize,
}

#[derive(Debug)]
pub struct Repository<S: Store = FsStore> {
    root: PathBuf,
    work_dir: PathBuf,
    store: S,
    config: Config,
}

impl Repository<FsStore> {
    /// Initializes `dir` itself; no upward search.
    ///
    /// Returns `false` when `dir` is already initialized.
    pub fn init(dir: &Path) -> Result<bool> {
        match create_store(dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "initialized");
                Ok(true)
            }
            Err(TagitError::AlreadyInitialized(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Opens the repository enclosing `options.directory`.
    pub fn open(options: &Options) -> Result<Self> {
        let root = resolve_store_root(&options.directory)?;
        let config = match &options.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&root.join(TAGIT_DIR).join(CONFIG_FILE))?,
        };
        let work_dir = fs::canonicalize(&options.directory)?;
        let store = FsStore::new(&root);
        Ok(Self {
            root,
            work_dir,
            store,
            config,
        })
    }
}

impl<S: Store> Repository<S> {
    /// Builds a repository over an arbitrary store. Relative paths given to
    /// the operations are resolved against `work_dir`.
    pub fn with_store(
        root: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        store: S,
        config: Config,
    ) -> Self {
        let root = root.into();
        let work_dir = work_dir.into();
        Self {
            root: fs::canonicalize(&root).unwrap_or(root),
            work_dir: fs::canonicalize(&work_dir).unwrap_or(work_dir),
            store,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers every file under the root that is not yet indexed.
    ///
    /// Paths whose root-relative form starts with `.` are skipped. Existing
    /// entries keep their tags and timestamps, and entries for vanished
    /// files stay put.
    pub fn update(&self) -> Result<UpdateReport> {
        self.scan(false)
    }

    /// [`Repository::update`], additionally dropping entries whose file is gone.
    pub fn update_and_prune(&self) -> Result<UpdateReport> {
        self.scan(true)
    }

    fn scan(&self, prune: bool) -> Result<UpdateReport> {
        let found = self.walk()?;
        let mut doc = self.store.load()?;
        let mut report = UpdateReport::default();

        for name in found {
            if !doc.files.contains_key(&name) {
                debug!(file = %name, "indexing");
                doc.files.insert(name.clone(), Entry::new(name));
                report.added += 1;
            }
        }

        if prune {
            let before = doc.files.len();
            doc.files
                .retain(|name, _| fs::symlink_metadata(self.root.join(name)).is_ok());
            report.pruned = before - doc.files.len();
        }

        self.store.save(&mut doc)?;
        info!(added = report.added, pruned = report.pruned, "update finished");
        Ok(report)
    }

    fn walk(&self) -> Result<Vec<String>> {
        let exclude = self.config.exclude_set()?;
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_links)
            .into_iter()
            // Anything below a top-level dot entry has a relative path starting with '.'
            .filter_entry(|e| e.depth() != 1 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!("skipping {}: {}", path, err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let name = to_key(rel);
            if !is_indexable(&name) || exclude.is_match(&name) {
                continue;
            }
            found.push(name);
        }

        debug!(files = found.len(), "walk finished");
        Ok(found)
    }

    /// Adds tags derived from each entry's filename. Returns how many entries changed.
    pub fn autotag(&self) -> Result<usize> {
        let mut doc = self.store.load()?;
        let mut changed = 0;

        for entry in doc.files.values_mut() {
            let filename = Path::new(&entry.name)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            let derived = tags::extract_from_name_with(&filename, self.config.min_tag_length);
            let merged = tags::merge(&entry.tags, &derived);
            if merged != entry.tags {
                entry.tags = merged;
                changed += 1;
            }
        }

        self.store.save(&mut doc)?;
        info!(changed, "autotag finished");
        Ok(changed)
    }

    /// Merges `new_tags` into the entry for `path`, creating it if needed.
    ///
    /// The file must exist. Note that `added` is reset to now on every call,
    /// including re-tagging an entry that already exists.
    pub fn tag<T: AsRef<str>>(&self, path: &Path, new_tags: &[T]) -> Result<()> {
        let abs = self.absolute(path);
        if let Err(err) = fs::metadata(&abs) {
            return match err.kind() {
                io::ErrorKind::NotFound => Err(TagitError::FileNotFound(path.to_path_buf())),
                _ => Err(err.into()),
            };
        }

        let key = self.key_for(path)?;
        let mut doc = self.store.load()?;
        let entry = doc.entry_mut(&key);
        entry.tags = tags::merge(&entry.tags, new_tags);
        entry.added = Utc::now();
        debug!(file = %key, tags = ?entry.tags, "tagged");

        self.store.save(&mut doc)
    }

    /// Removes `old_tags` from the entry for `path`. Returns whether anything was removed.
    pub fn untag<T: AsRef<str>>(&self, path: &Path, old_tags: &[T]) -> Result<bool> {
        let mut doc = self.store.load()?;
        let Some(key) = self.indexed_key(path)? else {
            return Ok(false);
        };

        let removed = match doc.files.get_mut(&key) {
            Some(entry) => {
                let before = entry.tags.len();
                for tag in old_tags {
                    entry.tags.remove(&tags::normalize(tag.as_ref()));
                }
                entry.tags.len() != before
            }
            None => false,
        };

        if removed {
            self.store.save(&mut doc)?;
        }
        Ok(removed)
    }

    /// Drops the entry for `path`. Returns whether there was one.
    pub fn remove(&self, path: &Path) -> Result<bool> {
        let mut doc = self.store.load()?;
        let Some(key) = self.indexed_key(path)? else {
            return Ok(false);
        };
        let removed = doc.files.remove(&key).is_some();
        if removed {
            self.store.save(&mut doc)?;
        }
        Ok(removed)
    }

    /// Tags of `path`; empty if it is not indexed.
    pub fn tags(&self, path: &Path) -> Result<BTreeSet<String>> {
        let doc = self.store.load()?;
        let Some(key) = self.indexed_key(path)? else {
            return Ok(BTreeSet::new());
        };
        Ok(doc.files.get(&key).map(|e| e.tags.clone()).unwrap_or_default())
    }

    /// Every tag in use, sorted.
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let doc = self.store.load()?;
        Ok(vocabulary(&doc).into_iter().collect())
    }

    /// Entries carrying all of `query`, ordered by name. An empty query returns every entry.
    pub fn tagged<T: AsRef<str>>(&self, query: &[T]) -> Result<Vec<Entry>> {
        let doc = self.store.load()?;
        Ok(doc
            .files
            .into_values()
            .filter(|e| tags::matches_all(&e.tags, query))
            .collect())
    }

    /// A uniformly chosen entry among [`Repository::tagged`], if any.
    pub fn random<T: AsRef<str>>(&self, query: &[T]) -> Result<Option<Entry>> {
        let matching = self.tagged(query)?;
        Ok(matching.choose(&mut rand::thread_rng()).cloned())
    }

    pub fn stats(&self) -> Result<Stats> {
        let doc = self.store.load()?;
        Ok(Stats {
            files: doc.files.len(),
            tags: vocabulary(&doc).len(),
            untagged: doc.files.values().filter(|e| e.tags.is_empty()).count(),
        })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }

    /// Root-relative, `/`-separated key for a user-supplied path.
    ///
    /// Resolution is lexical, so a symlink is keyed by its own name and the
    /// file does not have to exist.
    fn key_for(&self, path: &Path) -> Result<String> {
        let abs = normalize_lexically(&self.absolute(path));
        if let Some(key) = self.relative_key(&abs) {
            return Ok(key);
        }

        // The directory part may be spelled through a symlink (`/tmp` vs `/private/tmp`)
        let respelled = match (abs.parent(), abs.file_name()) {
            (Some(dir), Some(name)) => fs::canonicalize(dir).ok().map(|dir| dir.join(name)),
            _ => None,
        };
        respelled
            .and_then(|abs| self.relative_key(&abs))
            .ok_or_else(|| TagitError::OutsideRoot(path.to_path_buf()))
    }

    fn relative_key(&self, abs: &Path) -> Option<String> {
        match abs.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_os_str().is_empty() => Some(to_key(rel)),
            _ => None,
        }
    }

    /// Like [`Repository::key_for`], but a path outside the root is simply not indexed.
    fn indexed_key(&self, path: &Path) -> Result<Option<String>> {
        match self.key_for(path) {
            Ok(key) => Ok(Some(key)),
            Err(TagitError::OutsideRoot(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn vocabulary(doc: &Document) -> BTreeSet<String> {
    doc.files.values().flat_map(|e| e.tags.iter().cloned()).collect()
}

/// Only the relative path itself is checked, so `sub/.hidden` is still indexed.
fn is_indexable(name: &str) -> bool {
    !name.starts_with('.')
}

fn to_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    fn repo_with_files(files: &[&str]) -> (TempDir, Repository<MemoryStore>) {
        let tmp = TempDir::new().unwrap();
        for file in files {
            let path = tmp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "content").unwrap();
        }
        let repo = Repository::with_store(
            tmp.path(),
            tmp.path(),
            MemoryStore::initialized(),
            Config::default(),
        );
        (tmp, repo)
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tag_merges_as_a_set() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        repo.tag(Path::new("a.txt"), &["a", "A", "a"]).unwrap();
        repo.tag(Path::new("a.txt"), &["b"]).unwrap();

        assert_eq!(repo.tags(Path::new("a.txt")).unwrap(), set(&["a", "b"]));
    }

    #[test]
    fn test_tag_missing_file_does_not_touch_store() {
        let (_tmp, repo) = repo_with_files(&[]);
        let err = repo.tag(Path::new("missing.txt"), &["z"]).unwrap_err();

        assert!(matches!(err, TagitError::FileNotFound(_)));
        assert_eq!(repo.store().saves(), 0);
        assert_eq!(repo.store().raw().unwrap(), r#"{"files":{}}"#);
    }

    #[test]
    fn test_tag_resets_added() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        let first = repo.tagged(&["x"]).unwrap()[0].added;

        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.tag(Path::new("a.txt"), &["y"]).unwrap();
        let second = repo.tagged(&["x"]).unwrap()[0].added;

        assert!(second > first);
    }

    #[test]
    fn test_tagged_intersection() {
        let (_tmp, repo) = repo_with_files(&["a.txt", "b.txt"]);
        repo.update().unwrap();
        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        repo.tag(Path::new("b.txt"), &["x", "y"]).unwrap();

        assert_eq!(names(&repo.tagged(&["x"]).unwrap()), vec!["a.txt", "b.txt"]);
        assert_eq!(names(&repo.tagged(&["x", "y"]).unwrap()), vec!["b.txt"]);
        assert_eq!(names(&repo.tagged(&["Y"]).unwrap()), vec!["b.txt"]);
        assert!(repo.tagged(&["nonexistent"]).unwrap().is_empty());
    }

    #[test]
    fn test_tagged_empty_query() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        assert!(repo.tagged::<&str>(&[]).unwrap().is_empty());

        repo.update().unwrap();
        assert_eq!(names(&repo.tagged::<&str>(&[]).unwrap()), vec!["a.txt"]);
    }

    #[test]
    fn test_untag_restores_previous_tags() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        repo.tag(Path::new("a.txt"), &["keep"]).unwrap();
        let before = repo.tags(Path::new("a.txt")).unwrap();

        repo.tag(Path::new("a.txt"), &["x", "y"]).unwrap();
        assert!(repo.untag(Path::new("a.txt"), &["X", "y"]).unwrap());
        assert_eq!(repo.tags(Path::new("a.txt")).unwrap(), before);
    }

    #[test]
    fn test_untag_and_remove_are_noops_when_absent() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        assert!(!repo.untag(Path::new("a.txt"), &["x"]).unwrap());
        assert!(!repo.remove(Path::new("a.txt")).unwrap());
        assert!(!repo.untag(Path::new("gone.txt"), &["x"]).unwrap());
        assert_eq!(repo.store().saves(), 0);

        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        assert!(!repo.untag(Path::new("a.txt"), &["other"]).unwrap());
        assert_eq!(repo.store().saves(), 1);
    }

    #[test]
    fn test_remove_entry() {
        let (_tmp, repo) = repo_with_files(&["a.txt", "b.txt"]);
        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        repo.tag(Path::new("b.txt"), &["x"]).unwrap();

        assert!(repo.remove(Path::new("a.txt")).unwrap());
        assert_eq!(names(&repo.tagged(&["x"]).unwrap()), vec!["b.txt"]);
        assert!(repo.tags(Path::new("a.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_all_tags_sorted_and_deduped() {
        let (_tmp, repo) = repo_with_files(&["a.txt", "b.txt"]);
        assert!(repo.all_tags().unwrap().is_empty());

        repo.tag(Path::new("a.txt"), &["zeta", "alpha"]).unwrap();
        repo.tag(Path::new("b.txt"), &["Alpha", "mid"]).unwrap();
        assert_eq!(repo.all_tags().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_update_skips_top_level_dot_paths_only() {
        let (_tmp, repo) = repo_with_files(&[
            "a.txt",
            ".hidden",
            ".git/config",
            "sub/b.txt",
            "sub/.secret",
        ]);
        let report = repo.update().unwrap();

        let indexed = repo.tagged::<&str>(&[]).unwrap();
        assert_eq!(names(&indexed), vec!["a.txt", "sub/.secret", "sub/b.txt"]);
        assert_eq!(report, UpdateReport { added: 3, pruned: 0 });
    }

    #[test]
    fn test_update_keeps_existing_entries() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        let before = repo.tagged(&["x"]).unwrap();

        let report = repo.update().unwrap();
        assert_eq!(report.added, 0);
        assert_eq!(repo.tagged(&["x"]).unwrap(), before);
    }

    #[test]
    fn test_update_never_prunes_by_default() {
        let (tmp, repo) = repo_with_files(&["a.txt", "b.txt"]);
        repo.update().unwrap();
        fs::remove_file(tmp.path().join("a.txt")).unwrap();

        repo.update().unwrap();
        assert_eq!(repo.tagged::<&str>(&[]).unwrap().len(), 2);

        let report = repo.update_and_prune().unwrap();
        assert_eq!(report, UpdateReport { added: 0, pruned: 1 });
        assert_eq!(names(&repo.tagged::<&str>(&[]).unwrap()), vec!["b.txt"]);
    }

    #[test]
    fn test_update_honours_exclude() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("keep.txt"), "").unwrap();
        fs::write(tmp.path().join("skip.tmp"), "").unwrap();
        let config = Config {
            exclude: vec!["*.tmp".to_string()],
            ..Default::default()
        };
        let repo = Repository::with_store(
            tmp.path(),
            tmp.path(),
            MemoryStore::initialized(),
            config,
        );

        repo.update().unwrap();
        assert_eq!(names(&repo.tagged::<&str>(&[]).unwrap()), vec!["keep.txt"]);
    }

    #[test]
    fn test_autotag_uses_bare_filename() {
        let (_tmp, repo) = repo_with_files(&["docs/unique_file.txt", "test_file_1.txt"]);
        repo.update().unwrap();
        repo.tag(Path::new("test_file_1.txt"), &["Manual"]).unwrap();

        assert_eq!(repo.autotag().unwrap(), 2);
        assert_eq!(
            repo.tags(Path::new("docs/unique_file.txt")).unwrap(),
            set(&["unique", "file", "txt"])
        );
        assert_eq!(
            repo.tags(Path::new("test_file_1.txt")).unwrap(),
            set(&["manual", "test", "file", "txt"])
        );

        // Second run derives nothing new
        assert_eq!(repo.autotag().unwrap(), 0);
    }

    #[test]
    fn test_random_picks_from_matches() {
        let (_tmp, repo) = repo_with_files(&["a.txt", "b.txt", "c.txt"]);
        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        repo.tag(Path::new("b.txt"), &["x"]).unwrap();
        repo.tag(Path::new("c.txt"), &["y"]).unwrap();

        for _ in 0..20 {
            let picked = repo.random(&["x"]).unwrap().unwrap();
            assert!(picked.name == "a.txt" || picked.name == "b.txt");
        }
        assert!(repo.random(&["nope"]).unwrap().is_none());
    }

    #[test]
    fn test_paths_resolve_against_work_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/a.txt"), "").unwrap();
        let repo = Repository::with_store(
            tmp.path(),
            tmp.path().join("sub"),
            MemoryStore::initialized(),
            Config::default(),
        );

        repo.tag(Path::new("a.txt"), &["x"]).unwrap();
        assert_eq!(names(&repo.tagged(&["x"]).unwrap()), vec!["sub/a.txt"]);
        assert_eq!(repo.tags(Path::new("../sub/a.txt")).unwrap(), set(&["x"]));
    }

    #[test]
    fn test_paths_outside_root_rejected() {
        let (tmp, repo) = repo_with_files(&[]);
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("o.txt"), "").unwrap();

        let err = repo.tag(&outside.path().join("o.txt"), &["x"]).unwrap_err();
        assert!(matches!(err, TagitError::OutsideRoot(_)));
        assert!(matches!(repo.tag(tmp.path(), &["x"]).unwrap_err(), TagitError::OutsideRoot(_)));
    }

    #[test]
    fn test_lookups_outside_root_are_noops() {
        let (tmp, repo) = repo_with_files(&[]);
        let outside = TempDir::new().unwrap();
        let elsewhere = outside.path().join("o.txt");

        assert!(!repo.remove(tmp.path()).unwrap());
        assert!(!repo.remove(&elsewhere).unwrap());
        assert!(!repo.untag(&elsewhere, &["x"]).unwrap());
        assert!(repo.tags(&elsewhere).unwrap().is_empty());
        assert_eq!(repo.store().saves(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_keyed_by_its_own_path() {
        use std::os::unix::fs::symlink;

        let (tmp, repo) = repo_with_files(&["real.txt"]);
        symlink(tmp.path().join("real.txt"), tmp.path().join("alias.txt")).unwrap();

        repo.tag(Path::new("alias.txt"), &["x"]).unwrap();
        assert_eq!(names(&repo.tagged(&["x"]).unwrap()), vec!["alias.txt"]);
        assert!(repo.tags(Path::new("real.txt")).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_outside_file_can_be_tagged() {
        use std::os::unix::fs::symlink;

        let (tmp, repo) = repo_with_files(&[]);
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("target.txt"), "").unwrap();
        symlink(outside.path().join("target.txt"), tmp.path().join("link.txt")).unwrap();

        repo.tag(Path::new("link.txt"), &["x"]).unwrap();
        assert_eq!(names(&repo.tagged(&["x"]).unwrap()), vec!["link.txt"]);
    }

    #[test]
    fn test_empty_tags_are_never_stored() {
        let (_tmp, repo) = repo_with_files(&["a.txt"]);
        repo.tag(Path::new("a.txt"), &["", "ok"]).unwrap();
        assert_eq!(repo.tags(Path::new("a.txt")).unwrap(), set(&["ok"]));
    }

    #[test]
    fn test_autotag_with_zero_min_length_adds_no_empty_tag() {
        let (_tmp, repo) = repo_with_files(&["_a_.txt"]);
        let repo = Repository::with_store(
            repo.root().to_path_buf(),
            repo.root().to_path_buf(),
            MemoryStore::initialized(),
            Config {
                min_tag_length: 0,
                ..Default::default()
            },
        );
        repo.update().unwrap();
        repo.autotag().unwrap();

        assert_eq!(repo.all_tags().unwrap(), vec!["a", "txt"]);
    }

    #[test]
    fn test_operations_without_store_fail() {
        let tmp = TempDir::new().unwrap();
        let repo = Repository::with_store(
            tmp.path(),
            tmp.path(),
            MemoryStore::default(),
            Config::default(),
        );
        assert!(matches!(repo.all_tags().unwrap_err(), TagitError::NoRepository(_)));
        assert!(matches!(repo.tagged::<&str>(&[]).unwrap_err(), TagitError::NoRepository(_)));
    }

    #[test]
    fn test_stats() {
        let (_tmp, repo) = repo_with_files(&["a.txt", "b.txt", "c.txt"]);
        repo.update().unwrap();
        repo.tag(Path::new("a.txt"), &["x", "y"]).unwrap();
        repo.tag(Path::new("b.txt"), &["y"]).unwrap();

        assert_eq!(repo.stats().unwrap(), Stats { files: 3, tags: 2, untagged: 1 });
    }

    #[test]
    fn test_to_key_and_indexable() {
        assert_eq!(to_key(Path::new("a/b/c.txt")), "a/b/c.txt");
        assert!(is_indexable("sub/.hidden"));
        assert!(!is_indexable(".tagit/data.json"));
        assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
