use log::warn;

use super::{LapRecordsService, TargetService};
use crate::application::dtos::{LapEntryDto, ProgressDto};
use laptrack_domain::laps::LapEntry;
use laptrack_domain::shared::{DomainError, LapId};
use laptrack_domain::streaks;
use laptrack_domain::targets::{DailyTarget, DEFAULT_DAILY_TARGET};

/// Result of a lap or target mutation. Carries the re-upserted daily target
/// when the mutation triggered a progress recomputation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub success: bool,
    pub target: Option<DailyTarget>,
}

impl MutationOutcome {
    fn ok(target: Option<DailyTarget>) -> Self {
        Self {
            success: true,
            target,
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            target: None,
        }
    }
}

/// Session owning today's view state: the lap list, the daily target, and the
/// derived progress counters.
///
/// Every mutation runs its gateway calls strictly in sequence (mutate, reload
/// today's laps, upsert the target with the recomputed summed total) and
/// updates in-memory state only after each round-trip completes. The chain is
/// not atomic; a failure mid-way leaves `total_laps` stale until the next
/// successful mutation.
pub struct ProgressTracker {
    lap_service: LapRecordsService,
    target_service: TargetService,
    laps: Vec<LapEntry>,
    daily_target: Option<DailyTarget>,
    loading: bool,
    error: Option<String>,
}

impl ProgressTracker {
    pub fn new(lap_service: LapRecordsService, target_service: TargetService) -> Self {
        Self {
            lap_service,
            target_service,
            laps: Vec::new(),
            daily_target: None,
            loading: true,
            error: None,
        }
    }

    /// Construct a session and load today's state immediately.
    pub async fn load(lap_service: LapRecordsService, target_service: TargetService) -> Self {
        let mut session = Self::new(lap_service, target_service);
        session.refresh_data().await;
        session
    }

    /// Load today's laps, then today's target (get-or-create with the default
    /// goal). The first failure is recorded and stops the chain; the loading
    /// flag clears either way.
    pub async fn refresh_data(&mut self) {
        self.loading = true;
        self.error = None;

        if let Err(e) = self.load_all().await {
            warn!("[progress] refresh failed {}", e.format_with_code());
            self.error = Some(e.to_string());
        }

        self.loading = false;
    }

    async fn load_all(&mut self) -> Result<(), DomainError> {
        self.laps = self.lap_service.todays_laps().await?;

        let target = self
            .target_service
            .todays_target(DEFAULT_DAILY_TARGET)
            .await?;
        self.daily_target = Some(target);

        Ok(())
    }

    pub async fn add_lap(&mut self, count: i64) -> MutationOutcome {
        if let Err(e) = self.lap_service.add_lap_entry(count).await {
            self.record_error(e);
            return MutationOutcome::failed();
        }

        self.resync_after_mutation().await
    }

    pub async fn update_lap(&mut self, id: &LapId, count: i64) -> MutationOutcome {
        if let Err(e) = self.lap_service.update_lap_entry(id, count).await {
            self.record_error(e);
            return MutationOutcome::failed();
        }

        self.resync_after_mutation().await
    }

    pub async fn delete_lap(&mut self, id: &LapId) -> MutationOutcome {
        if let Err(e) = self.lap_service.delete_lap_entry(id).await {
            self.record_error(e);
            return MutationOutcome::failed();
        }

        self.resync_after_mutation().await
    }

    /// Change today's goal. With a target already loaded this recomputes
    /// progress against the current summed total; otherwise it creates
    /// today's record with the new goal.
    pub async fn set_target(&mut self, new_target: i64) -> MutationOutcome {
        if self.daily_target.is_some() {
            let total = self.total_laps();
            match self
                .target_service
                .update_todays_progress(total, new_target)
                .await
            {
                Ok(updated) => {
                    self.daily_target = Some(updated.clone());
                    MutationOutcome::ok(Some(updated))
                }
                Err(e) => {
                    self.record_error(e);
                    MutationOutcome::failed()
                }
            }
        } else {
            match self.target_service.todays_target(new_target).await {
                Ok(created) => {
                    self.daily_target = Some(created.clone());
                    MutationOutcome::ok(Some(created))
                }
                Err(e) => {
                    self.record_error(e);
                    MutationOutcome::failed()
                }
            }
        }
    }

    async fn resync_after_mutation(&mut self) -> MutationOutcome {
        match self.reload_and_sync().await {
            Ok(updated) => MutationOutcome::ok(updated),
            Err(e) => {
                self.record_error(e);
                MutationOutcome::failed()
            }
        }
    }

    /// Reload today's laps and push the recomputed summed total through the
    /// target upsert. Skips the upsert when no target is loaded yet.
    async fn reload_and_sync(&mut self) -> Result<Option<DailyTarget>, DomainError> {
        self.laps = self.lap_service.todays_laps().await?;

        let Some(current) = self.daily_target.as_ref() else {
            return Ok(None);
        };
        let goal = current.target();

        let updated = self
            .target_service
            .update_todays_progress(self.total_laps(), goal)
            .await?;
        self.daily_target = Some(updated.clone());

        Ok(Some(updated))
    }

    fn record_error(&mut self, e: DomainError) {
        warn!("[progress] operation failed {}", e.format_with_code());
        self.error = Some(e.to_string());
    }

    // Derived values, recomputed on every access.

    pub fn total_laps(&self) -> i64 {
        self.laps.iter().map(LapEntry::count).sum()
    }

    pub fn target(&self) -> i64 {
        self.daily_target.as_ref().map_or(0, DailyTarget::target)
    }

    pub fn remaining(&self) -> i64 {
        (self.target() - self.total_laps()).max(0)
    }

    pub fn is_target_reached(&self) -> bool {
        self.total_laps() >= self.target()
    }

    pub fn progress_percent(&self) -> u32 {
        streaks::progress_percent(self.total_laps(), self.target())
    }

    pub fn laps(&self) -> &[LapEntry] {
        &self.laps
    }

    pub fn daily_target(&self) -> Option<&DailyTarget> {
        self.daily_target.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Display-shaped snapshot of the whole session.
    pub fn snapshot(&self) -> ProgressDto {
        ProgressDto {
            laps: self.laps.iter().map(LapEntryDto::from).collect(),
            target: self.target(),
            total_laps: self.total_laps(),
            remaining: self.remaining(),
            progress_percent: self.progress_percent(),
            target_reached: self.is_target_reached(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }
}
