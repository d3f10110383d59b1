pub mod backup;
pub mod boards;
pub mod error;
pub mod ships;
pub mod stages;
pub mod supervisor;
pub mod timers;

pub use backup::{PersistedValue, Snapshot, EXPORT_VERSION};
pub use boards::{BoardRecord, CompBoard, CompBoards};
pub use error::EngineError;
pub use ships::{ShipRecord, ShipTracker, ShipVariant};
pub use stages::{StageReport, StageStatus};
pub use supervisor::SupervisorCards;
pub use timers::CountdownTimers;

use std::collections::BTreeMap;

use hangartrack_core::{
    BoardId, HangarClock, HangarReading, SystemClock, TimeSource, TrackerConfig, VaultClock,
    VaultReading,
};
use hangartrack_storage::{Storage, StorageKey, load_json, load_json_items, save_json};
use tracing::{debug, info};

/// Everything a display needs for one poll, sampled at a single instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub now_ms: i64,
    pub hangar: HangarReading,
    pub vault: VaultReading,
    pub stages: StageReport,
}

/// Owns the store and the clock, holds the in-memory state, and persists
/// every mutation before returning.
///
/// Readings are derived from absolute instants on each call, so a consumer can
/// poll at any rate (or stop and resume polling) without losing state.
pub struct Tracker<S: Storage, C: TimeSource = SystemClock> {
    config: TrackerConfig,
    storage: S,
    clock: C,
    hangar: HangarClock,
    vault: VaultClock,
    boards: CompBoards,
    ships: ShipTracker,
    supervisor: SupervisorCards,
    supervisor_timers: CountdownTimers,
}

impl<S: Storage, C: TimeSource> Tracker<S, C> {
    pub fn open(config: TrackerConfig, storage: S, clock: C) -> Result<Self, EngineError> {
        config.validate()?;
        let mut tracker = Self {
            hangar: HangarClock::new(&config.hangar)?,
            vault: VaultClock::new(&config.vault)?,
            boards: CompBoards::from_records(&config.catalog, &[]),
            ships: ShipTracker::from_records(&config.catalog, &[]),
            supervisor: SupervisorCards::from_map(&config.catalog, BTreeMap::new()),
            supervisor_timers: CountdownTimers::new(),
            config,
            storage,
            clock,
        };
        tracker.reload()?;
        Ok(tracker)
    }

    /// Rebuilds all in-memory state from the store. Absent or corrupt records
    /// load as their defaults; a corrupt entry inside a list drops only itself.
    pub fn reload(&mut self) -> Result<(), EngineError> {
        let store = &self.storage;
        let catalog = &self.config.catalog;

        let offset: i64 = load_json(store, StorageKey::HangarSync, 0);
        self.hangar = HangarClock::new(&self.config.hangar)?.with_offset(offset);

        let synced_at: Option<i64> = load_json(store, StorageKey::VaultSync, None);
        self.vault = VaultClock::new(&self.config.vault)?.with_sync(synced_at);

        let boards: Vec<BoardRecord> = load_json_items(store, StorageKey::CompBoards);
        self.boards = CompBoards::from_records(catalog, &boards);

        let ships: Vec<ShipRecord> = load_json_items(store, StorageKey::Ships);
        self.ships = ShipTracker::from_records(catalog, &ships);

        let collected = load_json(store, StorageKey::SupervisorCollected, BTreeMap::new());
        self.supervisor = SupervisorCards::from_map(catalog, collected);

        let timers = load_json(store, StorageKey::SupervisorTimers, BTreeMap::new());
        self.supervisor_timers = CountdownTimers::from_map(timers);

        debug!(
            offset,
            vault_synced = synced_at.is_some(),
            boards = self.boards.collected_count(),
            "state loaded"
        );
        Ok(())
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Samples the clock once and derives every live reading from it.
    pub fn tick(&self) -> Readings {
        let now_ms = self.now_ms();
        let hangar = self.hangar.read(now_ms);
        let stages = StageReport::evaluate(&self.supervisor, &self.boards, &hangar);
        Readings {
            now_ms,
            vault: self.vault.read(now_ms),
            hangar,
            stages,
        }
    }

    // Mutators build the next state, persist it, and only then swap it in, so
    // a failed write leaves memory matching the store.

    // -- hangar --

    pub fn hangar(&self) -> HangarReading {
        self.hangar.read(self.now_ms())
    }

    /// Call at the moment the hangar is seen turning green.
    pub fn sync_hangar(&mut self) -> Result<i64, EngineError> {
        let mut next = self.hangar.clone();
        let offset = next.sync(self.now_ms());
        save_json(&mut self.storage, StorageKey::HangarSync, &offset)?;
        self.hangar = next;
        info!(offset, "hangar synced");
        Ok(offset)
    }

    pub fn reset_hangar_sync(&mut self) -> Result<(), EngineError> {
        save_json(&mut self.storage, StorageKey::HangarSync, &0i64)?;
        self.hangar.reset_sync();
        info!("hangar sync cleared");
        Ok(())
    }

    // -- vault --

    pub fn vault(&self) -> VaultReading {
        self.vault.read(self.now_ms())
    }

    /// Call at the moment the vault door is seen opening.
    pub fn sync_vault(&mut self) -> Result<(), EngineError> {
        let now = self.now_ms();
        save_json(&mut self.storage, StorageKey::VaultSync, &Some(now))?;
        self.vault.sync(now);
        info!(synced_at = now, "vault synced");
        Ok(())
    }

    pub fn reset_vault(&mut self) -> Result<(), EngineError> {
        save_json(&mut self.storage, StorageKey::VaultSync, &None::<i64>)?;
        self.vault.reset();
        info!("vault sync cleared");
        Ok(())
    }

    // -- compboards --

    pub fn boards(&self) -> &CompBoards {
        &self.boards
    }

    /// Returns false, persisting nothing, for an id outside the catalog.
    pub fn toggle_board(&mut self, id: BoardId) -> Result<bool, EngineError> {
        let mut next = self.boards.clone();
        if !next.toggle(id) {
            debug!(%id, "toggle ignored for unknown board");
            return Ok(false);
        }
        self.commit_boards(next)?;
        debug!(%id, "board toggled");
        Ok(true)
    }

    /// Starts the board's respawn timer; returns the expiry.
    pub fn start_board_timer(&mut self, id: BoardId) -> Result<Option<i64>, EngineError> {
        let now = self.now_ms();
        let mut next = self.boards.clone();
        let Some(end) = next.start_timer(id, &self.config.timers, now) else {
            return Ok(None);
        };
        self.commit_boards(next)?;
        debug!(%id, end, "board timer started");
        Ok(Some(end))
    }

    pub fn reset_board_timer(&mut self, id: BoardId) -> Result<bool, EngineError> {
        let mut next = self.boards.clone();
        if !next.reset_timer(id) {
            return Ok(false);
        }
        self.commit_boards(next)?;
        debug!(%id, "board timer reset");
        Ok(true)
    }

    pub fn board_remaining(&self, id: BoardId) -> Option<i64> {
        self.boards.remaining_ms(id, self.now_ms())
    }

    pub fn board_progress(&self, id: BoardId) -> f64 {
        self.boards.progress(id, &self.config.timers, self.now_ms())
    }

    pub fn reset_boards(&mut self) -> Result<(), EngineError> {
        let mut next = self.boards.clone();
        next.reset_all();
        self.commit_boards(next)?;
        info!("all boards reset");
        Ok(())
    }

    fn commit_boards(&mut self, next: CompBoards) -> Result<(), EngineError> {
        save_json(&mut self.storage, StorageKey::CompBoards, &next.records())?;
        self.boards = next;
        Ok(())
    }

    // -- ships --

    pub fn ships(&self) -> &ShipTracker {
        &self.ships
    }

    pub fn toggle_ship(&mut self, id: &str) -> Result<bool, EngineError> {
        let mut next = self.ships.clone();
        if !next.toggle(id) {
            debug!(id, "toggle ignored for unknown ship");
            return Ok(false);
        }
        self.commit_ships(next)?;
        debug!(id, "ship toggled");
        Ok(true)
    }

    pub fn reset_ships(&mut self) -> Result<(), EngineError> {
        let mut next = self.ships.clone();
        next.reset_all();
        self.commit_ships(next)?;
        info!("all ship claims reset");
        Ok(())
    }

    fn commit_ships(&mut self, next: ShipTracker) -> Result<(), EngineError> {
        save_json(&mut self.storage, StorageKey::Ships, &next.records())?;
        self.ships = next;
        Ok(())
    }

    // -- supervisor cards --

    pub fn supervisor(&self) -> &SupervisorCards {
        &self.supervisor
    }

    pub fn supervisor_timers(&self) -> &CountdownTimers {
        &self.supervisor_timers
    }

    pub fn toggle_supervisor(&mut self, id: &str) -> Result<bool, EngineError> {
        let mut next = self.supervisor.clone();
        if !next.toggle(id) {
            debug!(id, "toggle ignored for unknown printer");
            return Ok(false);
        }
        save_json(&mut self.storage, StorageKey::SupervisorCollected, next.as_map())?;
        self.supervisor = next;
        debug!(id, "supervisor card toggled");
        Ok(true)
    }

    /// Starts a printer's cooldown; returns the expiry.
    pub fn start_supervisor_cooldown(&mut self, id: &str) -> Result<Option<i64>, EngineError> {
        if !self.supervisor.is_known(id) {
            return Ok(None);
        }
        let mut next = self.supervisor_timers.clone();
        let end = next.start(id, self.config.timers.supervisor_cooldown_ms, self.now_ms());
        self.commit_supervisor_timers(next)?;
        debug!(id, end, "supervisor cooldown started");
        Ok(Some(end))
    }

    pub fn reset_supervisor_cooldown(&mut self, id: &str) -> Result<bool, EngineError> {
        if !self.supervisor.is_known(id) {
            return Ok(false);
        }
        let mut next = self.supervisor_timers.clone();
        next.reset(id);
        self.commit_supervisor_timers(next)?;
        debug!(id, "supervisor cooldown reset");
        Ok(true)
    }

    pub fn supervisor_remaining(&self, id: &str) -> Option<i64> {
        self.supervisor_timers.remaining_ms(id, self.now_ms())
    }

    pub fn supervisor_progress(&self, id: &str) -> f64 {
        self.supervisor_timers
            .progress(id, self.config.timers.supervisor_cooldown_ms, self.now_ms())
    }

    fn commit_supervisor_timers(&mut self, next: CountdownTimers) -> Result<(), EngineError> {
        save_json(&mut self.storage, StorageKey::SupervisorTimers, &next)?;
        self.supervisor_timers = next;
        Ok(())
    }

    // -- aggregate --

    pub fn stages(&self) -> StageReport {
        StageReport::evaluate(&self.supervisor, &self.boards, &self.hangar())
    }

    // -- backup --

    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(Snapshot::read(&self.storage)?)
    }

    pub fn export(&self) -> Result<String, EngineError> {
        let doc = backup::export_document(&self.snapshot()?, self.now_ms())?;
        info!(bytes = doc.len(), "progress exported");
        Ok(doc)
    }

    pub fn export_file_name(&self) -> String {
        backup::export_file_name(self.now_ms())
    }

    /// Replaces the records present in `text` and reloads. A malformed
    /// document changes nothing.
    pub fn import(&mut self, text: &str) -> Result<usize, EngineError> {
        let written = backup::apply_import(&mut self.storage, text)?;
        self.reload()?;
        info!(written, "progress imported");
        Ok(written)
    }

    /// Deletes every persisted record and reloads defaults. Irreversible, so
    /// the caller must pass `confirmed = true`.
    pub fn reset_all(&mut self, confirmed: bool) -> Result<(), EngineError> {
        if !confirmed {
            return Err(EngineError::ConfirmationRequired);
        }
        self.storage.remove_many(&StorageKey::ALL)?;
        self.reload()?;
        info!("all progress wiped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hangartrack_core::ManualClock;
    use hangartrack_storage::{MemoryStorage, StorageError};

    use super::*;

    /// In-memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
    }

    impl FlakyStorage {
        fn check(&self) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Serialization("disk full".into()));
            }
            Ok(())
        }
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            self.check()?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
            self.check()?;
            self.inner.remove(key)
        }

        fn set_many(&mut self, entries: &[(StorageKey, String)]) -> Result<(), StorageError> {
            self.check()?;
            self.inner.set_many(entries)
        }

        fn remove_many(&mut self, keys: &[StorageKey]) -> Result<(), StorageError> {
            self.check()?;
            self.inner.remove_many(keys)
        }
    }

    fn tracker(storage: FlakyStorage) -> Tracker<FlakyStorage, ManualClock> {
        let config = TrackerConfig::default();
        let clock = ManualClock::new(config.hangar.epoch_ms + 1_000);
        Tracker::open(config, storage, clock).unwrap()
    }

    #[test]
    fn failed_write_leaves_memory_as_stored() {
        let mut t = tracker(FlakyStorage::default());
        t.storage.fail_writes = true;

        assert!(t.toggle_board(BoardId::new(1)).is_err());
        assert!(!t.boards().get(BoardId::new(1)).unwrap().collected);
        assert!(t.start_board_timer(BoardId::new(2)).is_err());
        assert_eq!(t.board_remaining(BoardId::new(2)), None);
        assert!(t.sync_hangar().is_err());
        assert!(!t.hangar().synced);
        assert!(t.sync_vault().is_err());
        assert_eq!(t.vault().is_open, None);
        assert!(t.toggle_ship("Corsair-military").is_err());
        assert_eq!(t.ships().claimed_count(), 0);
        assert!(t.toggle_supervisor("sv-34").is_err());
        assert!(!t.supervisor().is_collected("sv-34"));
        assert!(t.start_supervisor_cooldown("sv-34").is_err());
        assert_eq!(t.supervisor_remaining("sv-34"), None);
        assert_eq!(t.storage().inner.present_keys().unwrap(), Vec::new());

        // A retry once the store recovers writes the intended value, not its inverse.
        t.storage.fail_writes = false;
        assert!(t.toggle_board(BoardId::new(1)).unwrap());
        t.reload().unwrap();
        assert!(t.boards().get(BoardId::new(1)).unwrap().collected);
    }

    #[test]
    fn failed_reset_keeps_progress() {
        let mut t = tracker(FlakyStorage::default());
        t.toggle_board(BoardId::new(4)).unwrap();
        t.toggle_ship("Syulen-stealth").unwrap();
        t.sync_hangar().unwrap();
        t.sync_vault().unwrap();
        t.storage.fail_writes = true;

        assert!(t.reset_boards().is_err());
        assert!(t.reset_ships().is_err());
        assert!(t.reset_hangar_sync().is_err());
        assert!(t.reset_vault().is_err());
        assert!(t.reset_all(true).is_err());

        assert_eq!(t.boards().collected_count(), 1);
        assert_eq!(t.ships().claimed_count(), 1);
        assert!(t.hangar().synced);
        assert_eq!(t.vault().is_open, Some(true));
    }

    #[test]
    fn corrupt_list_entries_drop_alone() {
        let mut storage = FlakyStorage::default();
        storage
            .inner
            .set(
                StorageKey::CompBoards,
                r#"[{"id": 1, "collected": true}, {"id": "x"}, {"id": 5, "timerEnd": 99}]"#,
            )
            .unwrap();
        storage
            .inner
            .set(
                StorageKey::Ships,
                r#"[{"claimed": true}, {"id": "Corsair-military", "claimed": true}]"#,
            )
            .unwrap();

        let t = tracker(storage);
        assert!(t.boards().get(BoardId::new(1)).unwrap().collected);
        assert_eq!(t.boards().get(BoardId::new(5)).unwrap().timer_end, Some(99));
        assert_eq!(t.boards().collected_count(), 1);
        assert!(t.ships().get("Corsair-military").unwrap().claimed);
        assert_eq!(t.ships().claimed_count(), 1);
    }
}
