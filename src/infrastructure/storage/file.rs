#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::fs;
use std::path;

use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::KeyValueStore;
use crate::domain::models::StorageKey;

/// Key/value pairs kept in memory and written through to a single JSON object
/// on disk on every change.
pub struct FileStore {
    path: path::PathBuf,
    cache: DashMap<String, String>,
}

fn read_values(path: &path::Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let payload = fs::read_to_string(path)?;
    let values: BTreeMap<String, String> = serde_json::from_str(&payload)?;
    return Ok(values);
}

impl FileStore {
    pub fn new(path: path::PathBuf) -> FileStore {
        let cache = DashMap::new();
        match read_values(&path) {
            Ok(values) => {
                for (key, val) in values {
                    cache.insert(key, val);
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, path = ?path, "Storage file is unreadable, starting empty");
            }
        }

        return FileStore { path, cache };
    }

    fn persist(&self) -> Result<()> {
        let snapshot = self
            .cache
            .iter()
            .map(|entry| return (entry.key().to_string(), entry.value().to_string()))
            .collect::<BTreeMap<String, String>>();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)?;
        return Ok(());
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        return Ok(self
            .cache
            .get(&key.to_string())
            .map(|val| return val.to_string()));
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.cache.insert(key.to_string(), value.to_string());
        return self.persist();
    }
}
