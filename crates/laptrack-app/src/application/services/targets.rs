use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use log::info;

use laptrack_domain::shared::{today_utc, DomainError};
use laptrack_domain::streaks::{self, StreakData};
use laptrack_domain::targets::{DailyTarget, DailyTargetRepository};

/// Manages the one-record-per-date daily targets and derives streak
/// statistics from their history.
#[derive(Clone)]
pub struct TargetService {
    target_repo: Arc<dyn DailyTargetRepository>,
}

impl TargetService {
    pub fn new(target_repo: Arc<dyn DailyTargetRepository>) -> Self {
        Self { target_repo }
    }

    /// Get-or-create today's target record. An existing record wins over the
    /// given default; absence creates a fresh one with no progress.
    pub async fn todays_target(&self, default_target: i64) -> Result<DailyTarget, DomainError> {
        let today = today_utc();

        if let Some(existing) = self.target_repo.find_by_date(today).await? {
            return Ok(existing);
        }

        let created = self
            .target_repo
            .insert(&DailyTarget::new(today, default_target)?)
            .await?;

        info!(
            "[streak] created todays target date={} target={}",
            created.date(),
            created.target()
        );
        Ok(created)
    }

    /// Write-through recomputation: upsert today's record with the given
    /// totals and the completion flag derived from them.
    pub async fn update_todays_progress(
        &self,
        total_laps: i64,
        target: i64,
    ) -> Result<DailyTarget, DomainError> {
        let record = DailyTarget::with_progress(today_utc(), target, total_laps);
        let stored = self.target_repo.upsert(&record).await?;

        info!(
            "[streak] progress upsert date={} total_laps={} target={} completed={}",
            stored.date(),
            stored.total_laps(),
            stored.target(),
            stored.completed()
        );
        Ok(stored)
    }

    /// Recompute streak statistics from the full daily-target history.
    pub async fn calculate_streaks(&self) -> Result<StreakData, DomainError> {
        let completed_desc = self.target_repo.find_completed_desc().await?;
        if completed_desc.is_empty() {
            return Ok(StreakData::zero());
        }

        let completed_dates: HashSet<NaiveDate> =
            completed_desc.iter().map(|t| t.date()).collect();
        let current = streaks::current_streak(today_utc(), &completed_dates);

        let all_asc = self.target_repo.find_all_asc().await?;
        let longest = streaks::longest_streak(&all_asc);

        let total_days = self.target_repo.count_all().await?;
        let rate = streaks::completion_rate(completed_desc.len() as u64, total_days);

        let data = StreakData {
            current_streak: current,
            longest_streak: longest,
            total_completed_days: completed_desc.len() as u32,
            completion_rate: rate,
            last_completed_date: completed_desc.first().map(|t| t.date()),
        };

        info!(
            "[streak] calculate_streaks current={} longest={} total={} rate={}",
            data.current_streak, data.longest_streak, data.total_completed_days, data.completion_rate
        );
        Ok(data)
    }

    /// Target records for the trailing window `[today - days + 1, today]`,
    /// ascending by date.
    pub async fn streak_history(&self, days: u32) -> Result<Vec<DailyTarget>, DomainError> {
        if days == 0 || days > 365 {
            return Err(DomainError::Validation(
                "Days must be between 1 and 365".to_string(),
            ));
        }

        let end = today_utc();
        let start = end - Duration::days(i64::from(days) - 1);

        self.target_repo.find_in_range_asc(start, end).await
    }
}
