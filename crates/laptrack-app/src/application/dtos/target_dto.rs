use serde::{Deserialize, Serialize};

use laptrack_domain::targets::DailyTarget;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTargetDto {
    pub date: String, // YYYY-MM-DD
    pub target: i64,
    pub total_laps: i64,
    pub completed: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&DailyTarget> for DailyTargetDto {
    fn from(target: &DailyTarget) -> Self {
        Self {
            date: target.date().format("%Y-%m-%d").to_string(),
            target: target.target(),
            total_laps: target.total_laps(),
            completed: target.completed(),
            created_at: target.created_at().map(|t| t.to_rfc3339()),
            updated_at: target.updated_at().map(|t| t.to_rfc3339()),
        }
    }
}
