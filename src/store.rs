//! Locating, loading and persisting the index document.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, TagitError};
use crate::model::Document;
use crate::{TAGIT_DIR, TAGIT_FILE};

/// Load/save pair the repository goes through for every operation.
///
/// Each operation does one full load and at most one full save; there is
/// no incremental persistence.
pub trait Store {
    fn load(&self) -> Result<Document>;

    /// Overwrites the stored document and bumps `doc.revision`.
    ///
    /// Fails with [`TagitError::Conflict`] when the stored revision no longer
    /// matches the one `doc` was loaded with.
    fn save(&self, doc: &mut Document) -> Result<()>;
}

/// Walks from `start` up to the filesystem root and returns the closest
/// directory containing the marker directory.
pub fn resolve_store_root(start: &Path) -> Result<PathBuf> {
    let start = fs::canonicalize(start).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => TagitError::NoRepository(start.to_path_buf()),
        _ => TagitError::Io(err),
    })?;

    // ancestors() yields `start` itself first and stops after the filesystem root
    for dir in start.ancestors() {
        if dir.join(TAGIT_DIR).is_dir() {
            debug!(root = %dir.display(), "found store root");
            return Ok(dir.to_path_buf());
        }
    }
    Err(TagitError::NoRepository(start))
}

/// Creates the marker directory under `root` and writes an empty document.
pub fn create_store(root: &Path) -> Result<()> {
    fs::create_dir_all(root)?;
    let marker = root.join(TAGIT_DIR);
    match fs::create_dir(&marker) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(TagitError::AlreadyInitialized(root.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    }

    let json = serde_json::to_string(&Document::default()).map_err(io::Error::from)?;
    populate_marker(&marker, |path| fs::write(path, json))?;
    debug!(root = %root.display(), "created store");
    Ok(())
}

/// Writes the document into a freshly created marker directory, removing the
/// directory again if that fails so a later `init` can retry.
fn populate_marker<F>(marker: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if let Err(err) = write(&marker.join(TAGIT_FILE)) {
        if let Err(cleanup) = fs::remove_dir_all(marker) {
            warn!(marker = %marker.display(), "could not remove marker directory: {}", cleanup);
        }
        return Err(err.into());
    }
    Ok(())
}

/// The on-disk store at `<root>/.tagit/data.json`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(TAGIT_DIR)
    }

    pub fn document_path(&self) -> PathBuf {
        self.marker_dir().join(TAGIT_FILE)
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.document_path()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn stored_revision(&self) -> Result<u64> {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default)]
            revision: u64,
        }

        let Some(content) = self.read()? else {
            return Ok(0);
        };
        let probe: Probe = serde_json::from_str(&content).map_err(|source| {
            TagitError::CorruptStore {
                path: self.document_path(),
                source,
            }
        })?;
        Ok(probe.revision)
    }
}

impl Store for FsStore {
    fn load(&self) -> Result<Document> {
        let path = self.document_path();
        let content = self
            .read()?
            .ok_or_else(|| TagitError::NoRepository(self.root.clone()))?;
        let doc: Document = serde_json::from_str(&content)
            .map_err(|source| TagitError::CorruptStore { path, source })?;
        debug!(files = doc.files.len(), revision = doc.revision, "loaded store");
        Ok(doc)
    }

    fn save(&self, doc: &mut Document) -> Result<()> {
        let found = self.stored_revision()?;
        if found != doc.revision {
            return Err(TagitError::Conflict {
                expected: doc.revision,
                found,
            });
        }

        doc.revision += 1;
        let json = match serde_json::to_string(doc) {
            Ok(json) => json,
            Err(err) => {
                doc.revision -= 1;
                return Err(io::Error::from(err).into());
            }
        };

        // Write next to the target so the rename never crosses filesystems.
        let written = NamedTempFile::new_in(self.marker_dir()).and_then(|mut tmp| {
            tmp.write_all(json.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(self.document_path()).map_err(|err| err.error)?;
            Ok(())
        });
        if let Err(err) = written {
            doc.revision -= 1;
            return Err(err.into());
        }

        debug!(files = doc.files.len(), revision = doc.revision, "saved store");
        Ok(())
    }
}

/// In-memory store for exercising repository logic without a filesystem.
///
/// Documents are kept as JSON text so every load/save goes through serde.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    /// A store that behaves like a freshly initialized one.
    pub fn initialized() -> Self {
        Self {
            content: RefCell::new(Some(r#"{"files":{}}"#.to_string())),
            saves: Cell::new(0),
        }
    }

    /// Overwrites the stored document without counting a save, as another
    /// process would.
    pub fn replace(&self, doc: &Document) -> Result<()> {
        let json = serde_json::to_string(doc).map_err(io::Error::from)?;
        *self.content.borrow_mut() = Some(json);
        Ok(())
    }

    pub fn raw(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Document> {
        let content = self.content.borrow();
        let content = content
            .as_deref()
            .ok_or_else(|| TagitError::NoRepository(PathBuf::from("<memory>")))?;
        serde_json::from_str(content).map_err(|source| TagitError::CorruptStore {
            path: PathBuf::from("<memory>"),
            source,
        })
    }

    fn save(&self, doc: &mut Document) -> Result<()> {
        let found = match self.content.borrow().as_deref() {
            Some(content) => serde_json::from_str::<Document>(content)
                .map(|stored| stored.revision)
                .map_err(|source| TagitError::CorruptStore {
                    path: PathBuf::from("<memory>"),
                    source,
                })?,
            None => 0,
        };
        if found != doc.revision {
            return Err(TagitError::Conflict {
                expected: doc.revision,
                found,
            });
        }

        doc.revision += 1;
        let json = serde_json::to_string(doc).map_err(io::Error::from)?;
        *self.content.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
