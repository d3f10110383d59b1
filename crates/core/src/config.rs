//! Calibration constants and durations, injected at construction.
//!
//! The defaults are community-calibrated observations of the game, not
//! truths; recalibrating means changing these values, never the algorithms.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::catalog::{Catalog, Keycard};

pub const MINUTE_MS: i64 = 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarConfig {
    /// An instant at which a green phase is known to have started.
    pub epoch_ms: i64,
    pub cycle_ms: i64,
    pub green_ms: i64,
}

impl Default for HangarConfig {
    fn default() -> Self {
        Self {
            epoch_ms: 1_769_983_794_775,
            cycle_ms: 11_101_413,
            green_ms: 3_900_415,
        }
    }
}

impl HangarConfig {
    /// The red phase takes whatever the green phase leaves of the cycle.
    pub fn red_ms(&self) -> i64 {
        self.cycle_ms - self.green_ms
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub open_ms: i64,
    pub closed_ms: i64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            open_ms: MINUTE_MS,
            closed_ms: 20 * MINUTE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub blue_keycard_ms: i64,
    pub board_default_ms: i64,
    pub supervisor_cooldown_ms: i64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            blue_keycard_ms: 15 * MINUTE_MS,
            board_default_ms: 30 * MINUTE_MS,
            supervisor_cooldown_ms: 30 * MINUTE_MS,
        }
    }
}

impl TimerConfig {
    /// Boards behind a blue keycard respawn faster.
    pub fn board_duration_ms(&self, keycards: &[Keycard]) -> i64 {
        if keycards.contains(&Keycard::Blue) {
            self.blue_keycard_ms
        } else {
            self.board_default_ms
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub hangar: HangarConfig,
    pub vault: VaultConfig,
    pub timers: TimerConfig,
    pub poll_interval_ms: u64,
    pub catalog: Catalog,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            hangar: HangarConfig::default(),
            vault: VaultConfig::default(),
            timers: TimerConfig::default(),
            poll_interval_ms: 250,
            catalog: Catalog::default(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        let positive = [
            ("hangar.cycle_ms", self.hangar.cycle_ms),
            ("hangar.green_ms", self.hangar.green_ms),
            ("vault.open_ms", self.vault.open_ms),
            ("vault.closed_ms", self.vault.closed_ms),
            ("timers.blue_keycard_ms", self.timers.blue_keycard_ms),
            ("timers.board_default_ms", self.timers.board_default_ms),
            ("timers.supervisor_cooldown_ms", self.timers.supervisor_cooldown_ms),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.hangar.green_ms >= self.hangar.cycle_ms {
            return Err(CoreError::InvalidConfig(format!(
                "hangar.green_ms ({}) must be shorter than hangar.cycle_ms ({})",
                self.hangar.green_ms, self.hangar.cycle_ms
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(CoreError::InvalidConfig("poll_interval_ms must be positive".into()));
        }
        self.catalog.validate()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
