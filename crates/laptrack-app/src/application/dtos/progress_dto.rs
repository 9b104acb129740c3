use serde::{Deserialize, Serialize};

use super::LapEntryDto;

/// Full view state of a progress session: today's laps plus the derived
/// counters a display binds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressDto {
    pub laps: Vec<LapEntryDto>,
    pub target: i64,
    pub total_laps: i64,
    pub remaining: i64,
    pub progress_percent: u32,
    pub target_reached: bool,
    pub loading: bool,
    pub error: Option<String>,
}
