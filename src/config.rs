use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::{Result, TagitError};
use crate::tags::DEFAULT_MIN_TAG_LENGTH;

/// Per-repository settings, read from `.tagit/config.toml`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Shortest filename token `autotag` turns into a tag.
    pub min_tag_length: usize,
    /// Glob patterns, matched against root-relative paths, that `update` skips.
    pub exclude: Vec<String>,
    /// Follow symlinks while scanning.
    pub follow_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_tag_length: DEFAULT_MIN_TAG_LENGTH,
            exclude: Vec::new(),
            follow_links: false,
        }
    }
}

impl Config {
    /// Reads a config file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(|source| TagitError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        // A zero length would let empty tokens through as tags
        config.min_tag_length = config.min_tag_length.max(1);
        Ok(config)
    }

    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }
}

/// How the CLI (or any other caller) wants a repository opened.
#[derive(Debug, Clone)]
pub struct Options {
    /// Where the command was invoked; the store root is searched from here upwards.
    pub directory: PathBuf,
    /// Explicit config file. Defaults to `<root>/.tagit/config.toml` when unset.
    pub config: Option<PathBuf>,
}

impl Options {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.min_tag_length, 3);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, TagitError::Io(_)));
    }

    #[test]
    fn test_parse_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "exclude = [\"*.tmp\", \"build/**\"]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.exclude.len(), 2);
        assert_eq!(config.min_tag_length, 3);
        assert!(!config.follow_links);

        let set = config.exclude_set().unwrap();
        assert!(set.is_match("notes.tmp"));
        assert!(set.is_match("build/out/a.txt"));
        assert!(!set.is_match("notes.txt"));
    }

    #[test]
    fn test_zero_min_tag_length_clamped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "min_tag_length = 0\n").unwrap();

        assert_eq!(Config::load(&path).unwrap().min_tag_length, 1);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "min_tag_lenght = 4\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, TagitError::Config { .. }));
    }

    #[test]
    fn test_bad_pattern() {
        let config = Config {
            exclude: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.exclude_set().unwrap_err(),
            TagitError::InvalidPattern(_)
        ));
    }
}
