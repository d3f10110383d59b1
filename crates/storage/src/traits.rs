use crate::error::StorageError;
use crate::keys::StorageKey;

/// A local key/value store holding one serialized value per key.
pub trait Storage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError>;

    /// Writes every entry or none of them.
    fn set_many(&mut self, entries: &[(StorageKey, String)]) -> Result<(), StorageError>;

    /// Removes every listed key or none of them.
    fn remove_many(&mut self, keys: &[StorageKey]) -> Result<(), StorageError>;

    /// Keys currently holding a value.
    fn present_keys(&self) -> Result<Vec<StorageKey>, StorageError> {
        let mut present = Vec::new();
        for key in StorageKey::ALL {
            if self.get(key)?.is_some() {
                present.push(key);
            }
        }
        Ok(present)
    }
}
