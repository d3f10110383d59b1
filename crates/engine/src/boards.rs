use hangartrack_core::{BoardDef, BoardId, Catalog, TimerConfig, Zone, countdown};
use serde::{Deserialize, Serialize};

/// Persisted shape of one board. Everything else comes from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub id: BoardId,
    #[serde(default)]
    pub collected: bool,
    #[serde(default)]
    pub timer_end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompBoard {
    pub def: BoardDef,
    pub collected: bool,
    pub timer_end: Option<i64>,
}

impl CompBoard {
    pub fn id(&self) -> BoardId {
        self.def.id
    }

    /// Respawn time for this board's timer.
    pub fn timer_duration_ms(&self, timers: &TimerConfig) -> i64 {
        timers.board_duration_ms(&self.def.keycards)
    }
}

/// The fixed board list with per-board collection and timer state.
#[derive(Debug, Clone, PartialEq)]
pub struct CompBoards {
    boards: Vec<CompBoard>,
}

impl CompBoards {
    /// Rebuilds the catalog's boards, taking `collected` and `timerEnd` from
    /// any saved record with the same id. Records for unknown ids are dropped.
    pub fn from_records(catalog: &Catalog, saved: &[BoardRecord]) -> Self {
        let boards = catalog
            .boards
            .iter()
            .map(|def| {
                let existing = saved.iter().find(|r| r.id == def.id);
                CompBoard {
                    def: def.clone(),
                    collected: existing.is_some_and(|r| r.collected),
                    timer_end: existing.and_then(|r| r.timer_end),
                }
            })
            .collect();
        Self { boards }
    }

    pub fn records(&self) -> Vec<BoardRecord> {
        self.boards
            .iter()
            .map(|b| BoardRecord {
                id: b.id(),
                collected: b.collected,
                timer_end: b.timer_end,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompBoard> {
        self.boards.iter()
    }

    pub fn get(&self, id: BoardId) -> Option<&CompBoard> {
        self.boards.iter().find(|b| b.id() == id)
    }

    fn get_mut(&mut self, id: BoardId) -> Option<&mut CompBoard> {
        self.boards.iter_mut().find(|b| b.id() == id)
    }

    /// Flips `collected`. Returns false for an unknown id.
    pub fn toggle(&mut self, id: BoardId) -> bool {
        match self.get_mut(id) {
            Some(board) => {
                board.collected = !board.collected;
                true
            }
            None => false,
        }
    }

    /// Starts the board's respawn timer; returns the expiry.
    pub fn start_timer(&mut self, id: BoardId, timers: &TimerConfig, now_ms: i64) -> Option<i64> {
        let board = self.get_mut(id)?;
        let end = now_ms.saturating_add(board.timer_duration_ms(timers));
        board.timer_end = Some(end);
        Some(end)
    }

    pub fn reset_timer(&mut self, id: BoardId) -> bool {
        match self.get_mut(id) {
            Some(board) => {
                board.timer_end = None;
                true
            }
            None => false,
        }
    }

    pub fn remaining_ms(&self, id: BoardId, now_ms: i64) -> Option<i64> {
        countdown::remaining_ms(self.get(id)?.timer_end, now_ms)
    }

    pub fn progress(&self, id: BoardId, timers: &TimerConfig, now_ms: i64) -> f64 {
        match self.get(id) {
            Some(board) => {
                countdown::progress(board.timer_end, board.timer_duration_ms(timers), now_ms)
            }
            None => 0.0,
        }
    }

    /// Uncollects every board and clears every timer.
    pub fn reset_all(&mut self) {
        for board in &mut self.boards {
            board.collected = false;
            board.timer_end = None;
        }
    }

    pub fn total(&self) -> usize {
        self.boards.len()
    }

    pub fn collected_count(&self) -> usize {
        self.boards.iter().filter(|b| b.collected).count()
    }

    pub fn all_collected(&self) -> bool {
        self.boards.iter().all(|b| b.collected)
    }

    pub fn by_zone(&self, zone: Zone) -> impl Iterator<Item = &CompBoard> {
        self.boards.iter().filter(move |b| b.def.zone == zone)
    }

    pub fn zone_done(&self, zone: Zone) -> bool {
        self.by_zone(zone).all(|b| b.collected)
    }
}
