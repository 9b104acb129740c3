use async_trait::async_trait;
use chrono::NaiveDate;

use super::DailyTarget;
use crate::shared::DomainError;

#[async_trait]
pub trait DailyTargetRepository: Send + Sync {
    /// Single-row lookup by date. Absence is `Ok(None)`, never an error, so
    /// get-or-create can branch on it.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyTarget>, DomainError>;

    /// Insert a new record and return the stored row.
    async fn insert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError>;

    /// Insert-or-replace keyed on `date`; returns the stored row.
    async fn upsert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError>;

    /// All completed records, descending by date.
    async fn find_completed_desc(&self) -> Result<Vec<DailyTarget>, DomainError>;

    /// All records regardless of completion, ascending by date.
    async fn find_all_asc(&self) -> Result<Vec<DailyTarget>, DomainError>;

    /// Count of all records regardless of completion.
    async fn count_all(&self) -> Result<u64, DomainError>;

    /// Records in `[start, end]` inclusive, ascending by date.
    async fn find_in_range_asc(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTarget>, DomainError>;
}
