//! The executive hangar door: a long two-phase cycle (green = open, red =
//! closed) anchored to a calibrated epoch, with an optional user-set offset
//! that corrects drift between the epoch and what is observed in game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::config::HangarConfig;
use crate::cycle::PhaseSchedule;

/// Number of indicator lights counting down to reopening.
pub const LED_COUNT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HangarPhase {
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HangarReading {
    pub phase: HangarPhase,
    pub remaining_ms: i64,
    /// Position in the whole cycle, 0 to 100.
    pub progress_pct: f64,
    /// `LED_COUNT` while green; climbs from 0 as the red phase elapses.
    pub leds_lit: u8,
    pub synced: bool,
    /// Wall-clock instant of the next phase change.
    pub changes_at_ms: i64,
}

impl HangarReading {
    pub fn is_green(&self) -> bool {
        self.phase == HangarPhase::Green
    }

    pub fn is_red(&self) -> bool {
        self.phase == HangarPhase::Red
    }

    /// `HH:MM UTC` of the next phase change.
    pub fn changes_at_label(&self) -> String {
        match DateTime::<Utc>::from_timestamp_millis(self.changes_at_ms) {
            Some(at) => at.format("%H:%M UTC").to_string(),
            None => "--:-- UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HangarClock {
    schedule: PhaseSchedule,
    epoch_ms: i64,
    offset_ms: i64,
}

impl HangarClock {
    pub fn new(config: &HangarConfig) -> Result<Self, CoreError> {
        if config.green_ms >= config.cycle_ms {
            return Err(CoreError::InvalidSchedule(
                "green phase must be shorter than the cycle".into(),
            ));
        }
        Ok(Self {
            schedule: PhaseSchedule::new(vec![config.green_ms, config.red_ms()])?,
            epoch_ms: config.epoch_ms,
            offset_ms: 0,
        })
    }

    pub fn with_offset(mut self, offset_ms: i64) -> Self {
        self.offset_ms = offset_ms;
        self
    }

    /// Zero means unsynced: only the built-in epoch is used.
    pub fn is_synced(&self) -> bool {
        self.offset_ms != 0
    }

    pub fn read(&self, now_ms: i64) -> HangarReading {
        let pos = self.schedule.locate(now_ms, self.offset_ms, self.epoch_ms);
        let phase = if pos.index == 0 {
            HangarPhase::Green
        } else {
            HangarPhase::Red
        };
        let leds_lit = match phase {
            HangarPhase::Green => LED_COUNT,
            HangarPhase::Red => {
                let lit = pos.phase_elapsed_ms() * i64::from(LED_COUNT) / pos.phase_duration_ms;
                lit.min(i64::from(LED_COUNT)) as u8
            }
        };
        HangarReading {
            phase,
            remaining_ms: pos.remaining_ms,
            progress_pct: pos.cycle_position_ms as f64 / self.schedule.total_ms() as f64 * 100.0,
            leds_lit,
            synced: self.is_synced(),
            changes_at_ms: now_ms.saturating_add(pos.remaining_ms),
        }
    }

    /// Declares `now` to be the start of a green phase. The offset is computed
    /// from the unadjusted instant, so repeating the call at the same instant
    /// yields the same offset.
    pub fn sync(&mut self, now_ms: i64) -> i64 {
        let pos = self.schedule.cycle_position(now_ms, 0, self.epoch_ms);
        self.offset_ms = -pos;
        self.offset_ms
    }

    pub fn reset_sync(&mut self) {
        self.offset_ms = 0;
    }
}
