use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{apply_ops, KeyValueStore, StorageError, StoreOp};

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a complete map: batches are applied to a copy first.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn get_many(&self, keys: &[&str]) -> Vec<Option<String>> {
        let entries = self.lock();
        keys.iter().map(|k| entries.get(*k).cloned()).collect()
    }

    fn apply(&self, ops: &[StoreOp]) -> Result<(), StorageError> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        apply_ops(&mut next, ops);
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("app_font_size", "large").unwrap();
        assert_eq!(store.get("app_font_size").as_deref(), Some("large"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_get_many_preserves_key_order() {
        let store = MemoryStore::new();
        store
            .apply(&[StoreOp::set("a", "1"), StoreOp::set("b", "2")])
            .unwrap();
        assert_eq!(
            store.get_many(&["b", "x", "a"]),
            vec![Some("2".to_string()), None, Some("1".to_string())]
        );
    }

    #[test]
    fn test_clear_batch_empties_store() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.apply(&[StoreOp::Clear]).unwrap();
        assert_eq!(store.len(), 0);
    }
}
