use dashmap::DashMap;

use super::{KeyValueStore, StoreError};

/// In-process store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_scan() {
        let store = MemoryStore::new();
        store.set("a::2", "x").unwrap();
        store.set("a::1", "y").unwrap();
        store.set("b::1", "z").unwrap();

        assert_eq!(store.keys_with_prefix("a::").unwrap(), vec!["a::1", "a::2"]);
        store.remove("a::1").unwrap();
        store.remove("a::1").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b::1").unwrap().as_deref(), Some("z"));
    }
}
