use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakStatsDto {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed_days: u32,
    pub completion_rate: u32,
    pub last_completed_date: Option<String>, // ISO 8601 date (YYYY-MM-DD)
    pub is_on_streak: bool,
}
