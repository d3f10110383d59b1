use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::keys::StorageKey;
use crate::traits::Storage;

/// Volatile store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<StorageKey, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.values.remove(&key);
        Ok(())
    }

    fn set_many(&mut self, entries: &[(StorageKey, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.values.insert(*key, value.clone());
        }
        Ok(())
    }

    fn remove_many(&mut self, keys: &[StorageKey]) -> Result<(), StorageError> {
        for key in keys {
            self.values.remove(key);
        }
        Ok(())
    }
}
