use hangartrack_core::BoardId;
use hangartrack_engine::{EngineError, PersistedValue};
use hangartrack_harness::{HANGAR_EPOCH_MS, MINUTE_MS, TestTracker};
use hangartrack_storage::{Storage, StorageKey};
use serde_json::Value;

fn populate(t: &mut TestTracker) -> Result<(), EngineError> {
    t.advance(42 * MINUTE_MS);
    t.sync_hangar()?;
    t.sync_vault()?;
    t.toggle_board(BoardId::new(3))?;
    t.start_board_timer(BoardId::new(7))?;
    t.toggle_ship("Syulen-stealth")?;
    t.toggle_supervisor("sv-35")?;
    t.start_supervisor_cooldown("sv-34")?;
    t.reset_supervisor_cooldown("sv-34")?;
    Ok(())
}

#[test]
fn export_contains_every_persisted_key() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;
    let doc: Value = serde_json::from_str(&t.export()?)?;

    assert_eq!(doc["version"], 1);
    assert_eq!(doc["exportedAt"], "2026-02-01T22:51:54.775Z");
    for key in StorageKey::ALL {
        assert!(doc.get(key.as_str()).is_some(), "missing {key}");
    }
    assert_eq!(doc["cz-supervisor-timers"]["sv-34"], Value::Null);
    assert_eq!(doc["cz-compboards"].as_array().map(Vec::len), Some(7));
    assert_eq!(t.export_file_name(), "exec-hangar-tracker-2026-02-01.json");
    Ok(())
}

#[test]
fn export_import_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;
    let before = t.snapshot()?;
    assert_eq!(before.len(), 6);
    let doc = t.export()?;

    t.reset_all(true)?;
    assert!(t.snapshot()?.is_empty());
    assert_eq!(t.boards().collected_count(), 0);

    assert_eq!(t.import(&doc)?, 6);
    assert_eq!(t.snapshot()?, before);
    assert!(t.boards().get(BoardId::new(3)).unwrap().collected);
    assert!(t.ships().get("Syulen-stealth").unwrap().claimed);
    assert!(t.hangar().synced);
    assert_eq!(t.vault().is_open, Some(true));
    Ok(())
}

#[test]
fn import_into_another_tracker() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = TestTracker::new()?;
    populate(&mut source)?;
    let doc = source.export()?;

    let mut dest = TestTracker::start_at(Default::default(), HANGAR_EPOCH_MS + 42 * MINUTE_MS)?;
    dest.import(&doc)?;
    assert_eq!(dest.snapshot()?, source.snapshot()?);
    assert_eq!(dest.tick(), source.tick());
    Ok(())
}

#[test]
fn malformed_import_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;
    let before = t.snapshot()?;

    let bad = [
        "not json at all",
        "[1, 2, 3]",
        r#"{"cz-hangar-sync": 5, "cz-compboards": {"id": 1}}"#,
        r#"{"cz-ships": [{"claimed": true}]}"#,
        r#"{"cz-vault-sync": "yesterday"}"#,
        r#"{"cz-supervisor-collected": {"sv-34": "yes"}}"#,
    ];
    for text in bad {
        let err = t.import(text).unwrap_err();
        assert!(matches!(err, EngineError::InvalidImport { .. }), "{text}");
        assert_eq!(
            err.to_string(),
            "Invalid backup file. Expected an Exec Hangar Tracker JSON export."
        );
        assert_eq!(t.snapshot()?, before, "{text}");
    }
    Ok(())
}

#[test]
fn partial_import_leaves_missing_keys_alone() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;
    let written = t.import(r#"{"version": 1, "cz-ships": [], "extra": true}"#)?;
    assert_eq!(written, 1);
    assert_eq!(t.ships().claimed_count(), 0);
    assert!(t.boards().get(BoardId::new(3)).unwrap().collected);
    assert_eq!(
        t.snapshot()?.get(StorageKey::Ships),
        Some(&PersistedValue::Ships(Vec::new()))
    );
    Ok(())
}

#[test]
fn reset_all_requires_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;

    assert!(matches!(t.reset_all(false), Err(EngineError::ConfirmationRequired)));
    assert_eq!(t.snapshot()?.len(), 6);

    t.reset_all(true)?;
    assert!(t.storage().present_keys()?.is_empty());
    assert!(!t.hangar().synced);
    assert_eq!(t.vault().is_open, None);
    assert_eq!(t.ships().claimed_count(), 0);
    assert!(!t.supervisor().is_collected("sv-35"));
    Ok(())
}

#[test]
fn corrupt_storage_loads_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut t = TestTracker::new()?;
    populate(&mut t)?;
    {
        let conn = t.storage().conn();
        conn.execute("UPDATE kv SET value = '{broken' WHERE key = 'cz-compboards'", [])?;
        conn.execute("UPDATE kv SET value = 'true' WHERE key = 'cz-hangar-sync'", [])?;
    }
    t.reload()?;
    assert_eq!(t.boards().collected_count(), 0);
    assert!(!t.hangar().synced);
    // Untouched records still load.
    assert_eq!(t.ships().claimed_count(), 1);

    // Corrupt records are left out of exports rather than poisoning them.
    let doc: Value = serde_json::from_str(&t.export()?)?;
    assert!(doc.get("cz-compboards").is_none());
    let doc = t.export()?;
    t.import(&doc)?;
    Ok(())
}
