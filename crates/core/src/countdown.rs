//! Countdown arithmetic over absolute expiry instants. Nothing counts down:
//! every query derives the answer from the expiry and the live clock, and an
//! expired timer simply reads zero until someone clears it.

/// Time left before `end_ms`, floored at zero. `None` when no timer is set.
pub fn remaining_ms(end_ms: Option<i64>, now_ms: i64) -> Option<i64> {
    end_ms.map(|end| end.saturating_sub(now_ms).max(0))
}

/// Fraction of `duration_ms` already elapsed. Zero when idle or expired.
pub fn progress(end_ms: Option<i64>, duration_ms: i64, now_ms: i64) -> f64 {
    match remaining_ms(end_ms, now_ms) {
        None | Some(0) => 0.0,
        Some(left) if duration_ms > 0 => (1.0 - left as f64 / duration_ms as f64).clamp(0.0, 1.0),
        Some(_) => 0.0,
    }
}

/// `H:MM:SS` when at least an hour is left, otherwise `MM:SS`. Partial
/// seconds round up so a running timer never shows `00:00`.
pub fn format_remaining(ms: i64) -> String {
    let total_sec = ms.max(0).saturating_add(999) / 1000;
    let h = total_sec / 3600;
    let m = (total_sec % 3600) / 60;
    let s = total_sec % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
