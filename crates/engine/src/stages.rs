//! The five milestones, derived on every read and never stored.

use hangartrack_core::{HangarReading, Stage};

use crate::boards::CompBoards;
use crate::supervisor::SupervisorCards;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Done,
    /// Ready, but waiting on the hangar to open.
    Blocked,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    done: [bool; 5],
    /// Every board collected while the hangar is red.
    pub blocked: bool,
}

impl StageReport {
    pub fn evaluate(
        supervisor: &SupervisorCards,
        boards: &CompBoards,
        hangar: &HangarReading,
    ) -> Self {
        let mut done = [false; 5];
        for stage in Stage::ALL {
            done[usize::from(stage.number() - 1)] = match stage {
                Stage::SupervisorKeycards => supervisor.all_collected(),
                Stage::ExecutiveHangar => boards.all_collected() && hangar.is_green(),
                zone_stage => zone_stage.zone().is_some_and(|zone| boards.zone_done(zone)),
            };
        }
        Self {
            done,
            blocked: boards.all_collected() && !hangar.is_green(),
        }
    }

    pub fn is_done(&self, stage: Stage) -> bool {
        self.done[usize::from(stage.number() - 1)]
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        if self.is_done(stage) {
            StageStatus::Done
        } else if stage == Stage::ExecutiveHangar && self.blocked {
            StageStatus::Blocked
        } else {
            StageStatus::Pending
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, StageStatus)> + '_ {
        Stage::ALL.into_iter().map(|stage| (stage, self.status(stage)))
    }

    pub fn completed(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }

    pub fn total(&self) -> usize {
        self.done.len()
    }

    /// Whole-number percentage of stages done.
    pub fn percent(&self) -> u8 {
        (self.completed() as f64 / self.total() as f64 * 100.0).round() as u8
    }
}
