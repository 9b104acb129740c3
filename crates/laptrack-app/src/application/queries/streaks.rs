use log::warn;

use crate::application::dtos::{DailyTargetDto, StreakStatsDto};
use crate::application::services::TargetService;
use laptrack_domain::shared::today_utc;
use laptrack_domain::streaks::StreakData;
use laptrack_domain::targets::DailyTarget;

/// Read-only session over streak statistics, shaped for display.
pub struct StreakOverview {
    target_service: TargetService,
    streak_data: Option<StreakData>,
    streak_history: Vec<DailyTarget>,
    loading: bool,
    error: Option<String>,
}

impl StreakOverview {
    pub fn new(target_service: TargetService) -> Self {
        Self {
            target_service,
            streak_data: None,
            streak_history: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Construct a session and compute streak statistics immediately.
    pub async fn load(target_service: TargetService) -> Self {
        let mut overview = Self::new(target_service);
        overview.refresh_streaks().await;
        overview
    }

    /// Recompute streak statistics. Failures are recorded as an error string;
    /// previously loaded data is retained.
    pub async fn refresh_streaks(&mut self) {
        self.loading = true;
        self.error = None;

        match self.target_service.calculate_streaks().await {
            Ok(data) => self.streak_data = Some(data),
            Err(e) => {
                warn!("[streak] refresh failed {}", e.format_with_code());
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Load the trailing target window for display. Errors here are
    /// non-fatal: logged and swallowed, state left unchanged.
    pub async fn load_streak_history(&mut self, days: u32) {
        match self.target_service.streak_history(days).await {
            Ok(history) => self.streak_history = history,
            Err(e) => warn!("[streak] history load failed {}", e.format_with_code()),
        }
    }

    pub fn streak_stats(&self) -> Option<StreakStatsDto> {
        self.streak_data.as_ref().map(|data| StreakStatsDto {
            current_streak: data.current_streak,
            longest_streak: data.longest_streak,
            total_completed_days: data.total_completed_days,
            completion_rate: data.completion_rate,
            last_completed_date: data
                .last_completed_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            is_on_streak: data.current_streak > 0,
        })
    }

    /// True when the streak is alive but today has not been completed yet.
    pub fn is_streak_at_risk(&self) -> bool {
        let Some(data) = self.streak_data.as_ref() else {
            return false;
        };
        let Some(last_completed) = data.last_completed_date else {
            return false;
        };

        last_completed < today_utc() && data.current_streak > 0
    }

    pub fn streak_data(&self) -> Option<&StreakData> {
        self.streak_data.as_ref()
    }

    pub fn streak_history(&self) -> &[DailyTarget] {
        &self.streak_history
    }

    pub fn history_snapshot(&self) -> Vec<DailyTargetDto> {
        self.streak_history.iter().map(DailyTargetDto::from).collect()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
