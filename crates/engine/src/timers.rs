use std::collections::BTreeMap;

use hangartrack_core::countdown;
use serde::{Deserialize, Serialize};

/// Absolute expiry instants keyed by caller-chosen ids.
///
/// Durations are policy and belong to the caller; the set only remembers when
/// each timer ends. A reset keeps the id with a `null` expiry, matching the
/// persisted `{id: expiry-or-null}` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountdownTimers {
    ends: BTreeMap<String, Option<i64>>,
}

impl CountdownTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(ends: BTreeMap<String, Option<i64>>) -> Self {
        Self { ends }
    }

    pub fn as_map(&self) -> &BTreeMap<String, Option<i64>> {
        &self.ends
    }

    /// Starts or restarts `id`; returns the new expiry.
    pub fn start(&mut self, id: &str, duration_ms: i64, now_ms: i64) -> i64 {
        let end = now_ms.saturating_add(duration_ms);
        self.ends.insert(id.to_string(), Some(end));
        end
    }

    pub fn reset(&mut self, id: &str) {
        self.ends.insert(id.to_string(), None);
    }

    pub fn end_ms(&self, id: &str) -> Option<i64> {
        self.ends.get(id).copied().flatten()
    }

    pub fn remaining_ms(&self, id: &str, now_ms: i64) -> Option<i64> {
        countdown::remaining_ms(self.end_ms(id), now_ms)
    }

    pub fn progress(&self, id: &str, duration_ms: i64, now_ms: i64) -> f64 {
        countdown::progress(self.end_ms(id), duration_ms, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_HOUR: i64 = 30 * 60 * 1000;

    #[test]
    fn idle_timer_has_no_remaining() {
        let timers = CountdownTimers::new();
        assert_eq!(timers.remaining_ms("sv-34", 0), None);
        assert_eq!(timers.progress("sv-34", HALF_HOUR, 0), 0.0);
    }

    #[test]
    fn expired_timer_sticks_at_zero() {
        let mut timers = CountdownTimers::new();
        let end = timers.start("sv-34", HALF_HOUR, 1_000);
        assert_eq!(end, 1_000 + HALF_HOUR);
        assert_eq!(timers.remaining_ms("sv-34", 1_000), Some(HALF_HOUR));
        assert!((timers.progress("sv-34", HALF_HOUR, 1_000 + HALF_HOUR / 2) - 0.5).abs() < 1e-9);

        assert_eq!(timers.remaining_ms("sv-34", end + 3_600_000), Some(0));
        assert_eq!(timers.progress("sv-34", HALF_HOUR, end + 1), 0.0);
        assert_eq!(timers.end_ms("sv-34"), Some(end));
    }

    #[test]
    fn reset_keeps_null_entry() {
        let mut timers = CountdownTimers::new();
        timers.start("sv-35", HALF_HOUR, 0);
        timers.reset("sv-35");
        assert_eq!(timers.remaining_ms("sv-35", 0), None);
        assert_eq!(timers.as_map().get("sv-35"), Some(&None));
    }

    #[test]
    fn restart_replaces_expiry() {
        let mut timers = CountdownTimers::new();
        timers.start("a", 1_000, 0);
        timers.start("a", 1_000, 5_000);
        assert_eq!(timers.remaining_ms("a", 5_500), Some(500));
    }
}
