//! Durable key-value storage for session credentials and UI preferences.
//!
//! Writes are expressed as batches of [`StoreOp`] and every backend applies a batch
//! atomically: a reader sees either the state before the batch or the state after it.

use std::collections::BTreeMap;

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys shared with the browser console so both read the same layout.
pub mod keys {
    pub const USER: &str = "user";
    pub const USER_ID: &str = "app_user_id";
    pub const ACCESS_TOKEN: &str = "app_access_token";
    pub const REFRESH_TOKEN: &str = "app_refresh_token";
    pub const USER_NAME: &str = "app_user_name";
    pub const USER_LOCATION: &str = "app_user_location";
    pub const LOCALE: &str = "i18nextLng";
    pub const FONT_SIZE: &str = "app_font_size";
    pub const THEME: &str = "app-theme";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to replace storage file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A single mutation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Set(String, String),
    Clear,
}

impl StoreOp {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        StoreOp::Set(key.to_string(), value.into())
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Reads several keys as one consistent snapshot.
    fn get_many(&self, keys: &[&str]) -> Vec<Option<String>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Applies every op in order, all or nothing.
    fn apply(&self, ops: &[StoreOp]) -> Result<(), StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[StoreOp::set(key, value)])
    }
}

pub(crate) fn apply_ops(entries: &mut BTreeMap<String, String>, ops: &[StoreOp]) {
    for op in ops {
        match op {
            StoreOp::Set(key, value) => {
                entries.insert(key.clone(), value.clone());
            }
            StoreOp::Clear => entries.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops_apply_in_order() {
        let mut entries = BTreeMap::new();
        apply_ops(
            &mut entries,
            &[
                StoreOp::set("a", "1"),
                StoreOp::set("b", "2"),
                StoreOp::Clear,
                StoreOp::set("c", "3"),
            ],
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_later_set_overwrites_earlier() {
        let mut entries = BTreeMap::new();
        apply_ops(
            &mut entries,
            &[StoreOp::set("k", "old"), StoreOp::set("k", "new")],
        );
        assert_eq!(entries.get("k").map(String::as_str), Some("new"));
    }
}
