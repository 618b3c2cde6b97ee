//! Per-user document storage.
//!
//! Everything the tracker persists is a JSON object addressed by a slash
//! separated path such as `userPrayers/{uid}/dailyPrayers/{date}`. The rest of
//! the crate only talks to the [`DocumentStore`] trait.

#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use sqlite::SqliteStore;

pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOptions {
    /// Merge top-level fields into the existing document instead of replacing it.
    pub merge: bool,
}

impl SetOptions {
    pub fn overwrite() -> Self {
        Self { merge: false }
    }

    pub fn merge() -> Self {
        Self { merge: true }
    }
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(String);

impl DocPath {
    pub fn new(segments: &[&str]) -> Self {
        DocPath(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn daily_prayers(uid: &str, date: &str) -> Self {
        Self::new(&["userPrayers", uid, "dailyPrayers", date])
    }

    pub fn completed_qaza(uid: &str, date: &str) -> Self {
        Self::new(&["userQaza", uid, "completedQaza", date])
    }

    pub fn daily_growth(uid: &str, date: &str) -> Self {
        Self::new(&["userGrowth", uid, "dailyGrowth", date])
    }

    pub fn preferences(uid: &str) -> Self {
        Self::new(&["userPreferences", uid])
    }

    pub fn tasks(uid: &str) -> Self {
        Self::new(&["userTasks", uid])
    }

    pub fn contacts(uid: &str) -> Self {
        Self::new(&["userContacts", uid])
    }

    pub fn settings(uid: &str) -> Self {
        Self::new(&["userSettings", uid])
    }

    pub fn prayers_root(uid: &str) -> Self {
        Self::new(&["userPrayers", uid])
    }

    pub fn growth_root(uid: &str) -> Self {
        Self::new(&["userGrowth", uid])
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait DocumentStore {
    fn get(&self, path: &DocPath) -> StoreResult<Option<Document>>;

    fn set(&self, path: &DocPath, doc: Document, opts: SetOptions) -> StoreResult<()>;

    /// Timestamp assigned by the store at write time.
    fn server_timestamp(&self) -> Value {
        Value::String(chrono::Utc::now().to_rfc3339())
    }
}

/// Shallow merge: top-level fields of `incoming` replace those of `base`.
pub fn merge_into(base: &mut Document, incoming: Document) {
    for (k, v) in incoming {
        base.insert(k, v);
    }
}

/// Reads `field` of `doc` as `T`. Missing or malformed fields yield `None`.
pub fn field<T: DeserializeOwned>(doc: &Document, field: &str) -> Option<T> {
    let value = doc.get(field)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring malformed field '{}': {}", field, e);
            None
        }
    }
}
