use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, LapId};

/// One logged repetition event. `count` is the increment this entry
/// represents, not a running total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapEntry {
    id: LapId,
    date: NaiveDate,
    timestamp: DateTime<Utc>,
    count: i64,
}

impl LapEntry {
    /// Create a new entry stamped with the current UTC instant. The calendar
    /// date is fixed at construction and never changes afterwards.
    pub fn new(count: i64) -> Result<Self, DomainError> {
        if count < 1 {
            return Err(DomainError::Validation(
                "Lap count must be at least 1".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: LapId::new(),
            date: now.date_naive(),
            timestamp: now,
            count,
        })
    }

    pub fn restore(id: LapId, date: NaiveDate, timestamp: DateTime<Utc>, count: i64) -> Self {
        Self {
            id,
            date,
            timestamp,
            count,
        }
    }

    pub fn id(&self) -> &LapId {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn count(&self) -> i64 {
        self.count
    }
}

/// Per-day aggregate of lap counts, used for lightweight history displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLapTotal {
    date: NaiveDate,
    total: i64,
}

impl DailyLapTotal {
    pub fn restore(date: NaiveDate, total: i64) -> Self {
        Self { date, total }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}
