//! tagit - tag files in a directory tree and query them by tag.
//!
//! The index lives in a single JSON document at `<root>/.tagit/data.json`.
//! Commands run from anywhere below the root find it by searching upwards.
//!
//! ```no_run
//! use std::path::Path;
//! use tagit::{Options, Repository};
//!
//! Repository::init(Path::new("photos"))?;
//! let repo = Repository::open(&Options::new("photos"))?;
//! repo.update()?;
//! repo.tag(Path::new("rome_2019.jpg"), &["holiday"])?;
//! for entry in repo.tagged(&["holiday"])? {
//!     println!("{}", entry.name);
//! }
//! # Ok::<(), tagit::TagitError>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;
pub mod tags;

pub use config::{Config, Options};
pub use error::{Result, TagitError};
pub use model::{Document, Entry};
pub use repository::{Repository, Stats, UpdateReport};
pub use store::{FsStore, MemoryStore, Store};

/// Marker directory identifying a store root.
pub const TAGIT_DIR: &str = ".tagit";
/// Index document inside [`TAGIT_DIR`].
pub const TAGIT_FILE: &str = "data.json";
/// Optional per-repository settings inside [`TAGIT_DIR`].
pub const CONFIG_FILE: &str = "config.toml";
