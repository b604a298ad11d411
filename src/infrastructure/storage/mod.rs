pub mod file;
pub mod memory;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreBox;

pub struct StorageManager {}

impl StorageManager {
    /// File backed storage at the configured path. An empty `storage-file`
    /// keeps everything in memory for the life of the process.
    pub fn get() -> StoreBox {
        let storage_file = Config::get(ConfigKey::StorageFile);
        if storage_file.is_empty() {
            return Box::<memory::MemoryStore>::default();
        }

        return Box::new(file::FileStore::new(storage_file.into()));
    }
}
