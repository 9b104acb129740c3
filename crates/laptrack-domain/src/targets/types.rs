use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// Goal applied when a day has no explicit target yet.
pub const DEFAULT_DAILY_TARGET: i64 = 40;

/// Goal and cumulative progress record for one calendar date. One record per
/// date; `completed` always reflects the last-written `total_laps`/`target`
/// pair rather than being recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTarget {
    date: NaiveDate,
    target: i64,
    total_laps: i64,
    completed: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl DailyTarget {
    /// Fresh record for a date with no progress yet.
    pub fn new(date: NaiveDate, target: i64) -> Result<Self, DomainError> {
        if target < 0 {
            return Err(DomainError::Validation(
                "Daily target cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            date,
            target,
            total_laps: 0,
            completed: false,
            created_at: None,
            updated_at: None,
        })
    }

    /// Record carrying a recomputed progress state. The completion flag is
    /// derived here and nowhere else: `total_laps >= target`.
    pub fn with_progress(date: NaiveDate, target: i64, total_laps: i64) -> Self {
        Self {
            date,
            target,
            total_laps,
            completed: total_laps >= target,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn restore(
        date: NaiveDate,
        target: i64,
        total_laps: i64,
        completed: bool,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            date,
            target,
            total_laps,
            completed,
            created_at,
            updated_at,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn total_laps(&self) -> i64 {
        self.total_laps
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
