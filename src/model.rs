use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One tracked file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the store root, `/`-separated.
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(deserialize_with = "deserialize_added")]
    pub added: DateTime<Utc>,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
            added: Utc::now(),
        }
    }
}

/// The whole index as persisted in `.tagit/data.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    #[serde(default)]
    pub files: BTreeMap<String, Entry>,
    /// Bumped on every save; absent (zero) in freshly created stores.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub revision: u64,
}

impl Document {
    /// Returns the entry for `name`, inserting an empty one first if needed.
    pub fn entry_mut(&mut self, name: &str) -> &mut Entry {
        self.files
            .entry(name.to_string())
            .or_insert_with(|| Entry::new(name))
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

// Older stores wrote `added` as epoch milliseconds rather than ISO-8601.
fn deserialize_added<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Added {
        Millis(i64),
        Iso(DateTime<Utc>),
    }

    match Added::deserialize(deserializer)? {
        Added::Iso(at) => Ok(at),
        Added::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
    }
}
