use anyhow::Result;

/// Keys used in the key/value store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum StorageKey {
    Theme,
    PinnedMessages,
}

/// Flat string key/value storage. Values are opaque to the store.
pub trait KeyValueStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    fn set(&self, key: StorageKey, value: &str) -> Result<()>;
}

pub type StoreBox = Box<dyn KeyValueStore + Send + Sync>;
