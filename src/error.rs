use std::path::PathBuf;

use thiserror::Error;

/// Everything the index engine can fail with.
#[derive(Debug, Error)]
pub enum TagitError {
    /// `init` was pointed at a directory that already carries a marker directory.
    #[error("{} is already initialized", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The file handed to `tag` does not exist.
    #[error("can't tag inexistent file {}", .0.display())]
    FileNotFound(PathBuf),

    /// No marker directory between the working directory and the filesystem root.
    #[error("no tagit repository found from {} upwards, run 'tagit init' first", .0.display())]
    NoRepository(PathBuf),

    /// The document exists but is not valid JSON of the expected shape.
    #[error("corrupt store {}: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Someone else saved the document between our load and our save.
    #[error("store was modified concurrently (loaded revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    /// A path that resolves outside the store root can never be an index key.
    #[error("{} is outside the repository", .0.display())]
    OutsideRoot(PathBuf),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagitError {
    /// Process exit code the CLI should use for this error.
    ///
    /// Domain failures exit with 1; the I/O and config codes come from sysexits.h.
    pub fn exit_code(&self) -> i32 {
        match self {
            TagitError::Io(_) | TagitError::Walk(_) => 74, // EX_IOERR
            TagitError::Config { .. } | TagitError::InvalidPattern(_) => 78, // EX_CONFIG
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TagitError>;
