use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::KeyValueStore;
use crate::domain::models::StorageKey;

#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        return Ok(self
            .values
            .get(&key.to_string())
            .map(|val| return val.to_string()));
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        return Ok(());
    }
}
