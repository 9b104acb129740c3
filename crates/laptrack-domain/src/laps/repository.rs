use async_trait::async_trait;
use chrono::NaiveDate;

use super::{DailyLapTotal, LapEntry};
use crate::shared::{DomainError, LapId};

#[async_trait]
pub trait LapEntryRepository: Send + Sync {
    /// Persist a new lap entry.
    async fn save(&self, entry: &LapEntry) -> Result<(), DomainError>;

    /// All entries for a date, ascending by timestamp.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<LapEntry>, DomainError>;

    /// Entries in `[start, end]` inclusive, descending by date and ascending
    /// by timestamp within each date.
    async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LapEntry>, DomainError>;

    /// Set `count` on the entry matching `id`. Errors when no entry matches.
    async fn update_count(&self, id: &LapId, count: i64) -> Result<(), DomainError>;

    /// Remove the entry matching `id`.
    async fn delete(&self, id: &LapId) -> Result<(), DomainError>;

    /// Per-day lap totals for the most recent `limit` days with any entries,
    /// descending by date.
    async fn recent_daily_totals(&self, limit: u32) -> Result<Vec<DailyLapTotal>, DomainError>;
}
