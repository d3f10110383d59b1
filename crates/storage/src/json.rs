//! Typed load/save over a [`Storage`].
//!
//! Loading never fails: a missing, unreadable, or corrupt value yields the
//! caller's fallback. Saving reports I/O errors to the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::keys::StorageKey;
use crate::traits::Storage;

pub fn load_json<S, T>(store: &S, key: StorageKey, fallback: T) -> T
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(e) => {
            warn!(%key, error = %e, "storage read failed, using default");
            return fallback;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(%key, error = %e, "stored value is corrupt, using default");
            fallback
        }
    }
}

/// Loads a stored JSON array, keeping each element that decodes as `T`.
/// One bad entry does not cost the others; a missing or non-array value
/// loads as an empty list.
pub fn load_json_items<S, T>(store: &S, key: StorageKey) -> Vec<T>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let items: Vec<Value> = load_json(store, key, Vec::new());
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!(%key, dropped = total - kept.len(), "skipping corrupt entries");
    }
    kept
}

pub fn save_json<S, T>(store: &mut S, key: StorageKey, value: &T) -> Result<(), StorageError>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    debug!(%key, bytes = raw.len(), "persisting");
    store.set(key, &raw)
}
