use std::sync::Arc;

use chrono::NaiveDate;
use log::info;

use crate::application::dtos::LapsSummaryDto;
use laptrack_domain::laps::{LapEntry, LapEntryRepository};
use laptrack_domain::shared::{today_utc, DomainError, LapId};

/// CRUD over individual lap events, scoped by calendar date. Stateless; all
/// reads and writes go straight through the repository.
#[derive(Clone)]
pub struct LapRecordsService {
    lap_repo: Arc<dyn LapEntryRepository>,
}

impl LapRecordsService {
    pub fn new(lap_repo: Arc<dyn LapEntryRepository>) -> Self {
        Self { lap_repo }
    }

    /// Insert a lap for today, stamped with the current instant.
    pub async fn add_lap_entry(&self, count: i64) -> Result<LapEntry, DomainError> {
        let entry = LapEntry::new(count)?;
        self.lap_repo.save(&entry).await?;

        info!(
            "[laps] add_lap_entry id={} date={} count={}",
            entry.id(),
            entry.date(),
            entry.count()
        );
        Ok(entry)
    }

    /// All entries for a date, ascending by timestamp.
    pub async fn laps_for_date(&self, date: NaiveDate) -> Result<Vec<LapEntry>, DomainError> {
        self.lap_repo.find_by_date(date).await
    }

    pub async fn todays_laps(&self) -> Result<Vec<LapEntry>, DomainError> {
        self.laps_for_date(today_utc()).await
    }

    /// Entries in `[start, end]` inclusive, newest date first.
    pub async fn laps_for_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LapEntry>, DomainError> {
        if start > end {
            return Err(DomainError::InvalidInput(
                "Range start is after range end".to_string(),
            ));
        }

        self.lap_repo.find_in_range(start, end).await
    }

    pub async fn update_lap_entry(&self, id: &LapId, count: i64) -> Result<(), DomainError> {
        if count < 1 {
            return Err(DomainError::Validation(
                "Lap count must be at least 1".to_string(),
            ));
        }

        self.lap_repo.update_count(id, count).await?;
        info!("[laps] update_lap_entry id={} count={}", id, count);
        Ok(())
    }

    pub async fn delete_lap_entry(&self, id: &LapId) -> Result<(), DomainError> {
        self.lap_repo.delete(id).await?;
        info!("[laps] delete_lap_entry id={}", id);
        Ok(())
    }

    /// Per-day totals for the most recent `limit` active days, newest first.
    pub async fn laps_summary(&self, limit: u32) -> Result<Vec<LapsSummaryDto>, DomainError> {
        let totals = self.lap_repo.recent_daily_totals(limit).await?;

        Ok(totals.iter().map(LapsSummaryDto::from).collect())
    }
}
