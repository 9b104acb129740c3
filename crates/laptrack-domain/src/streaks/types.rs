use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived streak statistics. Recomputed in full on every request; nothing
/// here is persisted or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed_days: u32,
    pub completion_rate: u32,
    pub last_completed_date: Option<NaiveDate>,
}

impl StreakData {
    pub fn zero() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_completed_days: 0,
            completion_rate: 0,
            last_completed_date: None,
        }
    }
}
