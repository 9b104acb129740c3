use serde::{Deserialize, Serialize};

use laptrack_domain::laps::{DailyLapTotal, LapEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapEntryDto {
    pub id: String,
    pub date: String,      // YYYY-MM-DD
    pub timestamp: String, // RFC 3339
    pub count: i64,
}

impl From<&LapEntry> for LapEntryDto {
    fn from(entry: &LapEntry) -> Self {
        Self {
            id: entry.id().as_str().to_string(),
            date: entry.date().format("%Y-%m-%d").to_string(),
            timestamp: entry.timestamp().to_rfc3339(),
            count: entry.count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapsSummaryDto {
    pub date: String, // YYYY-MM-DD
    pub total_laps: i64,
}

impl From<&DailyLapTotal> for LapsSummaryDto {
    fn from(total: &DailyLapTotal) -> Self {
        Self {
            date: total.date().format("%Y-%m-%d").to_string(),
            total_laps: total.total(),
        }
    }
}
