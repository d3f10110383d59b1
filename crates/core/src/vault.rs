//! The vault timer door. There is no known epoch: the clock stays unknown
//! until the user observes the door opening and records that instant.

use crate::CoreError;
use crate::config::VaultConfig;
use crate::cycle::PhaseSchedule;

#[derive(Debug, Clone, PartialEq)]
pub struct VaultReading {
    /// `None` until synced.
    pub is_open: Option<bool>,
    pub remaining_ms: i64,
    /// Fraction of the current phase elapsed, 0 to 1.
    pub progress: f64,
    pub phase_duration_ms: i64,
}

impl VaultReading {
    fn unknown() -> Self {
        Self {
            is_open: None,
            remaining_ms: 0,
            progress: 0.0,
            phase_duration_ms: 0,
        }
    }

    pub fn synced(&self) -> bool {
        self.is_open.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct VaultClock {
    schedule: PhaseSchedule,
    synced_at_ms: Option<i64>,
}

impl VaultClock {
    pub fn new(config: &VaultConfig) -> Result<Self, CoreError> {
        Ok(Self {
            schedule: PhaseSchedule::new(vec![config.open_ms, config.closed_ms])?,
            synced_at_ms: None,
        })
    }

    pub fn with_sync(mut self, synced_at_ms: Option<i64>) -> Self {
        self.synced_at_ms = synced_at_ms;
        self
    }

    pub fn synced_at_ms(&self) -> Option<i64> {
        self.synced_at_ms
    }

    pub fn read(&self, now_ms: i64) -> VaultReading {
        let Some(epoch) = self.synced_at_ms else {
            return VaultReading::unknown();
        };
        let pos = self.schedule.locate(now_ms, 0, epoch);
        VaultReading {
            is_open: Some(pos.index == 0),
            remaining_ms: pos.remaining_ms,
            progress: pos.phase_fraction(),
            phase_duration_ms: pos.phase_duration_ms,
        }
    }

    /// Records `now` as the moment the door opened.
    pub fn sync(&mut self, now_ms: i64) {
        self.synced_at_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.synced_at_ms = None;
    }
}
