use std::collections::HashSet;

use chrono::NaiveDate;

use crate::targets::DailyTarget;

/// Consecutive completed days ending at `today` or yesterday.
///
/// Seeds with 1 when `today` itself is completed, then walks backward one day
/// at a time from yesterday, stopping at the first day absent from the set. A
/// day with no record at all counts as a gap, identical to an incomplete day.
pub fn current_streak(today: NaiveDate, completed: &HashSet<NaiveDate>) -> u32 {
    let mut streak = u32::from(completed.contains(&today));
    let mut cursor = today;

    loop {
        let Some(prev) = cursor.pred_opt() else {
            break;
        };
        if !completed.contains(&prev) {
            break;
        }
        streak += 1;
        cursor = prev;
    }

    streak
}

/// Maximum consecutive completed-day run across the full history, which must
/// be ordered ascending by date. The running counter resets on any incomplete
/// day.
pub fn longest_streak(targets_asc: &[DailyTarget]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;

    for target in targets_asc {
        if target.completed() {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    longest
}

/// `round(completed / total * 100)`; 0 when no days exist.
pub fn completion_rate(completed_days: u64, total_days: u64) -> u32 {
    if total_days == 0 {
        return 0;
    }

    ((completed_days as f64 / total_days as f64) * 100.0).round() as u32
}

/// `min(100, round(total / target * 100))`; 0 when the target is unset or
/// zero, guarding the divide.
pub fn progress_percent(total_laps: i64, target: i64) -> u32 {
    if target <= 0 {
        return 0;
    }

    let pct = (total_laps as f64 / target as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u32
}
