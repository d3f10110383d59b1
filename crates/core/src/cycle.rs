//! Repeating phase clock.
//!
//! A cycle is an ordered list of phase durations. Phase 0 begins at a
//! reference instant and the schedule repeats forever in both directions, so
//! any instant maps to exactly one position in `[0, total)`.

use crate::CoreError;

/// Ordered phase durations of one repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSchedule {
    durations: Vec<i64>,
    total_ms: i64,
}

/// Where an instant falls inside a [`PhaseSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePosition {
    pub index: usize,
    /// Elapsed time in the current repetition, always in `[0, total)`.
    pub cycle_position_ms: i64,
    /// Offset of the current phase's start within the cycle.
    pub phase_start_ms: i64,
    pub phase_duration_ms: i64,
    pub remaining_ms: i64,
}

impl PhasePosition {
    pub fn phase_elapsed_ms(&self) -> i64 {
        self.cycle_position_ms - self.phase_start_ms
    }

    /// Fraction of the current phase already elapsed, in `[0, 1)`.
    pub fn phase_fraction(&self) -> f64 {
        1.0 - self.remaining_ms as f64 / self.phase_duration_ms as f64
    }
}

impl PhaseSchedule {
    pub fn new(durations: Vec<i64>) -> Result<Self, CoreError> {
        if durations.is_empty() {
            return Err(CoreError::InvalidSchedule("no phases".into()));
        }
        if let Some(d) = durations.iter().find(|d| **d <= 0) {
            return Err(CoreError::InvalidSchedule(format!(
                "phase duration must be positive, got {d}ms"
            )));
        }
        let total_ms = durations
            .iter()
            .try_fold(0i64, |acc, d| acc.checked_add(*d))
            .ok_or_else(|| CoreError::InvalidSchedule("cycle length overflows".into()))?;
        Ok(Self {
            durations,
            total_ms,
        })
    }

    pub fn total_ms(&self) -> i64 {
        self.total_ms
    }

    /// Position of `now + offset` in the cycle whose phase 0 starts at `epoch`.
    ///
    /// Uses a true modulo: instants before the epoch and negative offsets wrap
    /// around instead of producing a negative remainder.
    pub fn cycle_position(&self, now_ms: i64, offset_ms: i64, epoch_ms: i64) -> i64 {
        let raw = i128::from(now_ms) + i128::from(offset_ms) - i128::from(epoch_ms);
        raw.rem_euclid(i128::from(self.total_ms)) as i64
    }

    pub fn locate(&self, now_ms: i64, offset_ms: i64, epoch_ms: i64) -> PhasePosition {
        let pos = self.cycle_position(now_ms, offset_ms, epoch_ms);
        let mut index = 0;
        let mut start = 0;
        while index + 1 < self.durations.len() && pos >= start + self.durations[index] {
            start += self.durations[index];
            index += 1;
        }
        let duration = self.durations[index];
        PhasePosition {
            index,
            cycle_position_ms: pos,
            phase_start_ms: start,
            phase_duration_ms: duration,
            remaining_ms: start + duration - pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_phase() -> PhaseSchedule {
        PhaseSchedule::new(vec![100, 300]).unwrap()
    }

    #[test]
    fn rejects_empty_and_non_positive() {
        assert!(PhaseSchedule::new(vec![]).is_err());
        assert!(PhaseSchedule::new(vec![10, 0]).is_err());
        assert!(PhaseSchedule::new(vec![-5, 10]).is_err());
    }

    #[test]
    fn locates_phases_from_epoch() {
        let s = two_phase();
        let p = s.locate(1_000, 0, 1_000);
        assert_eq!((p.index, p.cycle_position_ms, p.remaining_ms), (0, 0, 100));

        let p = s.locate(1_099, 0, 1_000);
        assert_eq!((p.index, p.remaining_ms), (0, 1));

        let p = s.locate(1_100, 0, 1_000);
        assert_eq!((p.index, p.phase_start_ms, p.remaining_ms), (1, 100, 300));

        let p = s.locate(1_400, 0, 1_000);
        assert_eq!((p.index, p.cycle_position_ms), (0, 0));
    }

    #[test]
    fn instants_before_epoch_wrap() {
        let s = two_phase();
        // 1ms before the epoch is the last millisecond of the previous cycle.
        let p = s.locate(999, 0, 1_000);
        assert_eq!((p.index, p.cycle_position_ms, p.remaining_ms), (1, 399, 1));
    }

    #[test]
    fn negative_offset_wraps() {
        let s = two_phase();
        assert_eq!(s.cycle_position(1_050, -100, 1_000), 350);
    }

    #[test]
    fn phase_fraction_counts_phase_not_cycle() {
        let s = two_phase();
        let p = s.locate(1_250, 0, 1_000);
        assert_eq!(p.phase_elapsed_ms(), 150);
        assert!((p.phase_fraction() - 0.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn position_always_in_range(
            now in any::<i64>(),
            offset in -1_000_000_000i64..1_000_000_000,
            epoch in any::<i64>(),
        ) {
            let s = two_phase();
            let p = s.locate(now, offset, epoch);
            prop_assert!(p.cycle_position_ms >= 0 && p.cycle_position_ms < s.total_ms());
            prop_assert!(p.remaining_ms > 0 && p.remaining_ms <= p.phase_duration_ms);
            prop_assert_eq!(p.index == 0, p.cycle_position_ms < 100);
        }

        #[test]
        fn shifting_by_whole_cycles_is_invisible(
            now in -1_000_000_000_000i64..1_000_000_000_000,
            k in -1000i64..1000,
        ) {
            let s = two_phase();
            prop_assert_eq!(s.locate(now, 0, 0), s.locate(now + k * s.total_ms(), 0, 0));
        }
    }
}
