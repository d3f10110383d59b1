//! Export, import, and typed snapshots of the persisted records.
//!
//! An import is validated as a whole before anything is written, and then
//! written in one storage transaction: a bad file leaves every key untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use hangartrack_storage::{Storage, StorageError, StorageKey};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::boards::BoardRecord;
use crate::error::EngineError;
use crate::ships::ShipRecord;

pub const EXPORT_VERSION: u32 = 1;

/// One persisted record, decoded into its expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistedValue {
    HangarSync(i64),
    VaultSync(Option<i64>),
    CompBoards(Vec<BoardRecord>),
    Ships(Vec<ShipRecord>),
    SupervisorCollected(BTreeMap<String, bool>),
    SupervisorTimers(BTreeMap<String, Option<i64>>),
}

impl PersistedValue {
    pub fn key(&self) -> StorageKey {
        match self {
            Self::HangarSync(_) => StorageKey::HangarSync,
            Self::VaultSync(_) => StorageKey::VaultSync,
            Self::CompBoards(_) => StorageKey::CompBoards,
            Self::Ships(_) => StorageKey::Ships,
            Self::SupervisorCollected(_) => StorageKey::SupervisorCollected,
            Self::SupervisorTimers(_) => StorageKey::SupervisorTimers,
        }
    }

    pub fn decode(key: StorageKey, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match key {
            StorageKey::HangarSync => Self::HangarSync(serde_json::from_value(value)?),
            StorageKey::VaultSync => Self::VaultSync(serde_json::from_value(value)?),
            StorageKey::CompBoards => Self::CompBoards(serde_json::from_value(value)?),
            StorageKey::Ships => Self::Ships(serde_json::from_value(value)?),
            StorageKey::SupervisorCollected => {
                Self::SupervisorCollected(serde_json::from_value(value)?)
            }
            StorageKey::SupervisorTimers => Self::SupervisorTimers(serde_json::from_value(value)?),
        })
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::HangarSync(v) => serde_json::to_value(v),
            Self::VaultSync(v) => serde_json::to_value(v),
            Self::CompBoards(v) => serde_json::to_value(v),
            Self::Ships(v) => serde_json::to_value(v),
            Self::SupervisorCollected(v) => serde_json::to_value(v),
            Self::SupervisorTimers(v) => serde_json::to_value(v),
        }
    }
}

/// Every persisted record that currently holds a valid value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    values: BTreeMap<StorageKey, PersistedValue>,
}

impl Snapshot {
    /// Reads the store the way the tracker loads it: corrupt records are left
    /// out and corrupt list entries are dropped.
    pub fn read<S: Storage + ?Sized>(store: &S) -> Result<Self, StorageError> {
        let mut values = BTreeMap::new();
        for key in StorageKey::ALL {
            let Some(raw) = store.get(key)? else {
                continue;
            };
            let decoded = serde_json::from_str(&raw).and_then(|value| match (key, value) {
                (StorageKey::CompBoards, Value::Array(items)) => {
                    Ok(PersistedValue::CompBoards(valid_entries(items)))
                }
                (StorageKey::Ships, Value::Array(items)) => {
                    Ok(PersistedValue::Ships(valid_entries(items)))
                }
                (key, value) => PersistedValue::decode(key, value),
            });
            match decoded {
                Ok(value) => {
                    values.insert(key, value);
                }
                Err(e) => warn!(%key, error = %e, "skipping corrupt record"),
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: StorageKey) -> Option<&PersistedValue> {
        self.values.get(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &PersistedValue> {
        self.values.values()
    }
}

/// Renders the export document: version, export instant, then each record.
pub fn export_document(snapshot: &Snapshot, now_ms: i64) -> Result<String, EngineError> {
    let mut doc = Map::new();
    doc.insert("version".into(), Value::from(EXPORT_VERSION));
    doc.insert("exportedAt".into(), Value::from(iso_timestamp(now_ms)));
    for value in snapshot.values() {
        doc.insert(value.key().as_str().into(), value.to_json()?);
    }
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

/// `exec-hangar-tracker-YYYY-MM-DD.json` for the given instant.
pub fn export_file_name(now_ms: i64) -> String {
    let day = DateTime::<Utc>::from_timestamp_millis(now_ms)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("exec-hangar-tracker-{day}.json")
}

/// Parses an uploaded document into the records it would write. Unknown
/// keys are ignored; a missing key is simply not written. Any malformed
/// recognized key rejects the whole document.
pub fn parse_import(text: &str) -> Result<Vec<PersistedValue>, EngineError> {
    let doc: Value = serde_json::from_str(text).map_err(|e| invalid(format!("not JSON: {e}")))?;
    let Value::Object(mut doc) = doc else {
        return Err(invalid("top level is not an object".into()));
    };
    let mut values = Vec::new();
    for key in StorageKey::ALL {
        if let Some(raw) = doc.remove(key.as_str()) {
            let value =
                PersistedValue::decode(key, raw).map_err(|e| invalid(format!("{key}: {e}")))?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Validates then writes an import in a single transaction.
pub fn apply_import<S: Storage + ?Sized>(store: &mut S, text: &str) -> Result<usize, EngineError> {
    let values = parse_import(text)?;
    let entries = values
        .iter()
        .map(|v| Ok((v.key(), serde_json::to_string(&v.to_json()?)?)))
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    store.set_many(&entries)?;
    Ok(entries.len())
}

fn valid_entries<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn invalid(reason: String) -> EngineError {
    warn!(%reason, "rejecting import");
    EngineError::InvalidImport { reason }
}

fn iso_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangartrack_storage::MemoryStorage;

    #[test]
    fn export_has_header_and_present_keys_only() {
        let mut store = MemoryStorage::new();
        store.set(StorageKey::HangarSync, "-3000").unwrap();
        let snapshot = Snapshot::read(&store).unwrap();
        let text = export_document(&snapshot, 1_769_983_794_775).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["exportedAt"], "2026-02-01T22:09:54.775Z");
        assert_eq!(doc["cz-hangar-sync"], -3000);
        assert!(doc.get("cz-ships").is_none());
    }

    #[test]
    fn file_name_uses_utc_date() {
        assert_eq!(export_file_name(1_769_983_794_775), "exec-hangar-tracker-2026-02-01.json");
    }

    #[test]
    fn non_object_rejected() {
        for text in ["[]", "42", "null", "\"x\"", "{oops"] {
            assert!(matches!(parse_import(text), Err(EngineError::InvalidImport { .. })), "{text}");
        }
    }

    #[test]
    fn unknown_keys_ignored() {
        let values =
            parse_import(r#"{"version": 1, "theme": "dark", "cz-vault-sync": null}"#).unwrap();
        assert_eq!(values, vec![PersistedValue::VaultSync(None)]);
    }

    #[test]
    fn one_bad_key_rejects_everything() {
        let mut store = MemoryStorage::new();
        store.set(StorageKey::HangarSync, "5").unwrap();
        let text = r#"{"cz-hangar-sync": -10, "cz-ships": "not a list"}"#;
        assert!(apply_import(&mut store, text).is_err());
        assert_eq!(store.get(StorageKey::HangarSync).unwrap().as_deref(), Some("5"));
        assert_eq!(store.get(StorageKey::Ships).unwrap(), None);
    }

    #[test]
    fn corrupt_record_left_out_of_snapshot() {
        let mut store = MemoryStorage::new();
        store.set(StorageKey::CompBoards, "{{{").unwrap();
        store.set(StorageKey::VaultSync, "123").unwrap();
        let snapshot = Snapshot::read(&store).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get(StorageKey::VaultSync),
            Some(&PersistedValue::VaultSync(Some(123)))
        );
    }

    #[test]
    fn snapshot_keeps_good_list_entries() {
        let mut store = MemoryStorage::new();
        store
            .set(
                StorageKey::Ships,
                r#"[{"id": "Syulen-military", "claimed": true}, {"claimed": 3}]"#,
            )
            .unwrap();
        let snapshot = Snapshot::read(&store).unwrap();
        let Some(PersistedValue::Ships(ships)) = snapshot.get(StorageKey::Ships) else {
            panic!("ships missing from snapshot");
        };
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0].id, "Syulen-military");
    }
}
