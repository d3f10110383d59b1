//! Test support: trackers wired to a manual clock.

use std::ops::{Deref, DerefMut};

use hangartrack_core::{HangarConfig, ManualClock, TrackerConfig};
use hangartrack_engine::{EngineError, Tracker};
use hangartrack_storage::SqliteStorage;
use tempfile::TempDir;

/// A green-phase start under the default calibration.
pub const HANGAR_EPOCH_MS: i64 = 1_769_983_794_775;

pub const MINUTE_MS: i64 = 60_000;

/// A tracker over an in-memory SQLite store whose clock only moves when the
/// test moves it.
pub struct TestTracker {
    pub tracker: Tracker<SqliteStorage, ManualClock>,
    pub clock: ManualClock,
}

impl TestTracker {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Result<Self, EngineError> {
        Self::start_at(config, HANGAR_EPOCH_MS)
    }

    pub fn start_at(config: TrackerConfig, now_ms: i64) -> Result<Self, EngineError> {
        let clock = ManualClock::new(now_ms);
        let storage = SqliteStorage::open_in_memory()?;
        let tracker = Tracker::open(config, storage, clock.clone())?;
        Ok(Self { tracker, clock })
    }

    pub fn advance(&self, ms: i64) {
        self.clock.advance(ms);
    }

    pub fn set_now(&self, ms: i64) {
        self.clock.set(ms);
    }

    /// Moves the clock to the first instant of the next red phase.
    pub fn advance_to_red(&self) {
        if self.tracker.hangar().is_green() {
            self.advance(self.tracker.hangar().remaining_ms);
        }
    }

    /// Moves the clock to the first instant of the next green phase.
    pub fn advance_to_green(&self) {
        if self.tracker.hangar().is_red() {
            self.advance(self.tracker.hangar().remaining_ms);
        }
    }

    /// Collects every board in the catalog.
    pub fn collect_all_boards(&mut self) -> Result<(), EngineError> {
        let ids: Vec<_> = self
            .tracker
            .boards()
            .iter()
            .filter(|b| !b.collected)
            .map(|b| b.id())
            .collect();
        for id in ids {
            self.tracker.toggle_board(id)?;
        }
        Ok(())
    }
}

impl Deref for TestTracker {
    type Target = Tracker<SqliteStorage, ManualClock>;

    fn deref(&self) -> &Self::Target {
        &self.tracker
    }
}

impl DerefMut for TestTracker {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tracker
    }
}

/// A tracker backed by a database file that outlives the tracker, for
/// reopen-and-reload scenarios.
pub struct OnDiskFixture {
    dir: TempDir,
    pub clock: ManualClock,
}

impl OnDiskFixture {
    pub fn new(now_ms: i64) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        Ok(Self {
            dir,
            clock: ManualClock::new(now_ms),
        })
    }

    pub fn path(&self) -> String {
        self.dir.path().join("tracker.db").to_string_lossy().into_owned()
    }

    pub fn open(&self) -> Result<Tracker<SqliteStorage, ManualClock>, EngineError> {
        let storage = SqliteStorage::open(&self.path())?;
        Tracker::open(TrackerConfig::default(), storage, self.clock.clone())
    }
}

/// Default hangar calibration, for computing expected instants in tests.
pub fn hangar_config() -> HangarConfig {
    HangarConfig::default()
}
