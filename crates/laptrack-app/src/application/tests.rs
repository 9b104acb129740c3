use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::application::queries::StreakOverview;
use crate::application::services::{LapRecordsService, ProgressTracker, TargetService};
use laptrack_domain::laps::{DailyLapTotal, LapEntry, LapEntryRepository};
use laptrack_domain::shared::{today_utc, DomainError, LapId};
use laptrack_domain::targets::{DailyTarget, DailyTargetRepository};

// Mock repositories for testing

struct MockLapEntryRepository {
    entries: RwLock<Vec<LapEntry>>,
    fail: bool,
}

impl MockLapEntryRepository {
    fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    fn gate(&self) -> Result<(), DomainError> {
        if self.fail {
            Err(DomainError::Repository("lap store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LapEntryRepository for MockLapEntryRepository {
    async fn save(&self, entry: &LapEntry) -> Result<(), DomainError> {
        self.gate()?;
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<LapEntry>, DomainError> {
        self.gate()?;
        let mut found: Vec<LapEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.date() == date)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.timestamp());
        Ok(found)
    }

    async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LapEntry>, DomainError> {
        self.gate()?;
        let mut found: Vec<LapEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.date() >= start && e.date() <= end)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then(a.timestamp().cmp(&b.timestamp()))
        });
        Ok(found)
    }

    async fn update_count(&self, id: &LapId, count: i64) -> Result<(), DomainError> {
        self.gate()?;
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                let updated =
                    LapEntry::restore(entry.id().clone(), entry.date(), entry.timestamp(), count);
                *entry = updated;
                Ok(())
            }
            None => Err(DomainError::LapEntryNotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &LapId) -> Result<(), DomainError> {
        self.gate()?;
        self.entries.write().await.retain(|e| e.id() != id);
        Ok(())
    }

    async fn recent_daily_totals(&self, limit: u32) -> Result<Vec<DailyLapTotal>, DomainError> {
        self.gate()?;
        let entries = self.entries.read().await;
        let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
        for entry in entries.iter() {
            *per_day.entry(entry.date()).or_insert(0) += entry.count();
        }

        let mut totals: Vec<DailyLapTotal> = per_day
            .into_iter()
            .map(|(date, total)| DailyLapTotal::restore(date, total))
            .collect();
        totals.sort_by(|a, b| b.date().cmp(&a.date()));
        totals.truncate(limit as usize);
        Ok(totals)
    }
}

struct MockDailyTargetRepository {
    targets: RwLock<HashMap<NaiveDate, DailyTarget>>,
    fail: bool,
}

impl MockDailyTargetRepository {
    fn new() -> Self {
        Self {
            targets: RwLock::new(HashMap::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            targets: RwLock::new(HashMap::new()),
            fail: true,
        }
    }

    fn gate(&self) -> Result<(), DomainError> {
        if self.fail {
            Err(DomainError::Repository(
                "target store unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DailyTargetRepository for MockDailyTargetRepository {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyTarget>, DomainError> {
        self.gate()?;
        Ok(self.targets.read().await.get(&date).cloned())
    }

    async fn insert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError> {
        self.gate()?;
        let mut targets = self.targets.write().await;
        if targets.contains_key(&target.date()) {
            return Err(DomainError::Repository(
                "UNIQUE constraint failed: daily_targets.date".to_string(),
            ));
        }

        let now = Utc::now();
        let stored = DailyTarget::restore(
            target.date(),
            target.target(),
            target.total_laps(),
            target.completed(),
            Some(now),
            Some(now),
        );
        targets.insert(stored.date(), stored.clone());
        Ok(stored)
    }

    async fn upsert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError> {
        self.gate()?;
        let mut targets = self.targets.write().await;
        let created_at = targets
            .get(&target.date())
            .and_then(|existing| existing.created_at());

        let stored = DailyTarget::restore(
            target.date(),
            target.target(),
            target.total_laps(),
            target.completed(),
            created_at.or_else(|| Some(Utc::now())),
            Some(Utc::now()),
        );
        targets.insert(stored.date(), stored.clone());
        Ok(stored)
    }

    async fn find_completed_desc(&self) -> Result<Vec<DailyTarget>, DomainError> {
        self.gate()?;
        let mut found: Vec<DailyTarget> = self
            .targets
            .read()
            .await
            .values()
            .filter(|t| t.completed())
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(found)
    }

    async fn find_all_asc(&self) -> Result<Vec<DailyTarget>, DomainError> {
        self.gate()?;
        let mut found: Vec<DailyTarget> = self.targets.read().await.values().cloned().collect();
        found.sort_by_key(|t| t.date());
        Ok(found)
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        self.gate()?;
        Ok(self.targets.read().await.len() as u64)
    }

    async fn find_in_range_asc(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTarget>, DomainError> {
        self.gate()?;
        let mut found: Vec<DailyTarget> = self
            .targets
            .read()
            .await
            .values()
            .filter(|t| t.date() >= start && t.date() <= end)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.date());
        Ok(found)
    }
}

// Helpers

fn lap_service(repo: Arc<MockLapEntryRepository>) -> LapRecordsService {
    LapRecordsService::new(repo)
}

fn target_service(repo: Arc<MockDailyTargetRepository>) -> TargetService {
    TargetService::new(repo)
}

fn tracker(
    laps: Arc<MockLapEntryRepository>,
    targets: Arc<MockDailyTargetRepository>,
) -> ProgressTracker {
    ProgressTracker::new(lap_service(laps), target_service(targets))
}

async fn seed_target(repo: &MockDailyTargetRepository, offset_days: i64, target: i64, total: i64) {
    let date = today_utc() - Duration::days(offset_days);
    repo.upsert(&DailyTarget::with_progress(date, target, total))
        .await
        .expect("seed target");
}

// Target service

#[tokio::test]
async fn todays_target_get_or_create_is_idempotent() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    let service = target_service(repo.clone());

    let first = service.todays_target(40).await.unwrap();
    assert_eq!(first.date(), today_utc());
    assert_eq!(first.target(), 40);
    assert_eq!(first.total_laps(), 0);
    assert!(!first.completed());

    let second = service.todays_target(40).await.unwrap();
    assert_eq!(second.date(), first.date());
    assert_eq!(second.target(), first.target());

    assert_eq!(repo.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn todays_target_existing_record_wins_over_default() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    let service = target_service(repo.clone());

    service.todays_target(40).await.unwrap();
    let again = service.todays_target(10).await.unwrap();

    assert_eq!(again.target(), 40);
}

#[tokio::test]
async fn update_todays_progress_derives_completed_from_threshold() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    let service = target_service(repo);

    let below = service.update_todays_progress(25, 40).await.unwrap();
    assert_eq!(below.total_laps(), 25);
    assert!(!below.completed());

    let exact = service.update_todays_progress(40, 40).await.unwrap();
    assert!(exact.completed());

    let above = service.update_todays_progress(41, 40).await.unwrap();
    assert!(above.completed());
}

#[tokio::test]
async fn update_todays_progress_is_idempotent() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    let service = target_service(repo.clone());

    let first = service.update_todays_progress(25, 40).await.unwrap();
    let second = service.update_todays_progress(25, 40).await.unwrap();

    assert_eq!(first.date(), second.date());
    assert_eq!(first.total_laps(), second.total_laps());
    assert_eq!(first.completed(), second.completed());
    assert_eq!(repo.count_all().await.unwrap(), 1);
}

// Streak calculation

#[tokio::test]
async fn streaks_count_today_and_the_run_behind_it() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    for offset in [0, 1, 2] {
        seed_target(&repo, offset, 40, 40).await;
    }

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.current_streak, 3);
    assert_eq!(data.total_completed_days, 3);
    assert_eq!(data.completion_rate, 100);
    assert_eq!(data.last_completed_date, Some(today_utc()));
}

#[tokio::test]
async fn streaks_survive_a_not_yet_completed_today() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    seed_target(&repo, 1, 40, 40).await;
    seed_target(&repo, 2, 40, 40).await;

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.current_streak, 2);
    assert_eq!(
        data.last_completed_date,
        Some(today_utc() - Duration::days(1))
    );
}

#[tokio::test]
async fn streaks_stop_at_the_first_gap() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    seed_target(&repo, 0, 40, 40).await;
    // Day -1 exists but is incomplete; day -2 completed.
    seed_target(&repo, 1, 40, 5).await;
    seed_target(&repo, 2, 40, 40).await;

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.current_streak, 1);
}

#[tokio::test]
async fn streaks_empty_history_is_all_zero() {
    let repo = Arc::new(MockDailyTargetRepository::new());

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.current_streak, 0);
    assert_eq!(data.longest_streak, 0);
    assert_eq!(data.total_completed_days, 0);
    assert_eq!(data.completion_rate, 0);
    assert!(data.last_completed_date.is_none());
}

#[tokio::test]
async fn longest_streak_spans_the_whole_history() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    // Ascending dates with pattern T, T, F, T, T, T.
    let pattern = [(10, true), (9, true), (8, false), (7, true), (6, true), (5, true)];
    for (offset, completed) in pattern {
        seed_target(&repo, offset, 40, if completed { 40 } else { 3 }).await;
    }

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.longest_streak, 3);
    assert_eq!(data.total_completed_days, 5);
    assert_eq!(data.completion_rate, 83); // 5 of 6 days
}

#[tokio::test]
async fn completion_rate_counts_incomplete_days() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    for offset in [20, 22, 24] {
        seed_target(&repo, offset, 40, 40).await;
    }
    for offset in [30, 31, 32, 33, 34, 35, 36] {
        seed_target(&repo, offset, 40, 1).await;
    }

    let data = target_service(repo).calculate_streaks().await.unwrap();

    assert_eq!(data.total_completed_days, 3);
    assert_eq!(data.completion_rate, 30);
}

#[tokio::test]
async fn streak_history_returns_the_trailing_window() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    for offset in [0, 1, 2, 3, 4] {
        seed_target(&repo, offset, 40, 40).await;
    }

    let history = target_service(repo).streak_history(3).await.unwrap();

    let dates: Vec<NaiveDate> = history.iter().map(|t| t.date()).collect();
    assert_eq!(
        dates,
        vec![
            today_utc() - Duration::days(2),
            today_utc() - Duration::days(1),
            today_utc()
        ]
    );
}

#[tokio::test]
async fn streak_history_rejects_out_of_range_windows() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    let service = target_service(repo);

    assert!(service.streak_history(0).await.is_err());
    assert!(service.streak_history(366).await.is_err());
}

// Progress tracker

#[tokio::test]
async fn refresh_data_loads_laps_then_creates_default_target() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);

    assert!(session.loading());
    session.refresh_data().await;

    assert!(!session.loading());
    assert!(session.error().is_none());
    assert!(session.laps().is_empty());

    let target = session.daily_target().expect("target loaded");
    assert_eq!(target.target(), 40);
    assert_eq!(session.total_laps(), 0);
    assert_eq!(session.remaining(), 40);
    assert_eq!(session.progress_percent(), 0);
    assert!(!session.is_target_reached());
}

#[tokio::test]
async fn add_lap_recomputes_progress_from_the_summed_total() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;

    let outcome = session.add_lap(15).await;
    assert!(outcome.success);

    let second = session.add_lap(10).await;
    assert!(second.success);

    // The upserted record carries the summed total, not the raw increment.
    let stored = second.target.expect("recomputed target");
    assert_eq!(stored.total_laps(), 25);
    assert!(!stored.completed());
    assert_eq!(session.total_laps(), 25);
    assert_eq!(session.progress_percent(), 63);
    assert_eq!(session.remaining(), 15);
}

#[tokio::test]
async fn add_lap_marks_the_day_completed_at_the_threshold() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;

    session.add_lap(15).await;
    let outcome = session.add_lap(25).await;

    let stored = outcome.target.expect("recomputed target");
    assert_eq!(stored.total_laps(), 40);
    assert!(stored.completed());
    assert!(session.is_target_reached());
    assert_eq!(session.progress_percent(), 100);
    assert_eq!(session.remaining(), 0);
}

#[tokio::test]
async fn add_lap_without_a_loaded_target_skips_the_recompute() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets.clone());

    let outcome = session.add_lap(5).await;

    assert!(outcome.success);
    assert!(outcome.target.is_none());
    assert_eq!(session.laps().len(), 1);
    assert_eq!(targets.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn update_lap_resyncs_from_the_new_counts() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;
    session.add_lap(10).await;

    let id = session.laps()[0].id().clone();
    let outcome = session.update_lap(&id, 40).await;

    assert!(outcome.success);
    let stored = outcome.target.expect("recomputed target");
    assert_eq!(stored.total_laps(), 40);
    assert!(stored.completed());
}

#[tokio::test]
async fn deleting_the_only_lap_drives_progress_back_to_zero() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;

    let added = session.add_lap(40).await;
    assert!(added.target.expect("recomputed target").completed());

    let id = session.laps()[0].id().clone();
    let outcome = session.delete_lap(&id).await;

    assert!(outcome.success);
    let stored = outcome.target.expect("recomputed target");
    assert_eq!(stored.total_laps(), 0);
    assert!(!stored.completed());
    assert!(session.laps().is_empty());
    assert_eq!(session.remaining(), 40);
}

#[tokio::test]
async fn set_target_recomputes_against_the_current_total() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;
    session.add_lap(25).await;
    assert_eq!(session.progress_percent(), 63);

    let outcome = session.set_target(20).await;

    assert!(outcome.success);
    let stored = outcome.target.expect("updated target");
    assert_eq!(stored.target(), 20);
    assert!(stored.completed()); // 25 >= 20
    assert_eq!(session.progress_percent(), 100);
}

#[tokio::test]
async fn set_target_creates_todays_record_when_none_is_loaded() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets.clone());

    let outcome = session.set_target(10).await;

    assert!(outcome.success);
    let stored = outcome.target.expect("created target");
    assert_eq!(stored.target(), 10);
    assert_eq!(stored.total_laps(), 0);
    assert_eq!(targets.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn refresh_failure_surfaces_the_error_and_clears_loading() {
    let laps = Arc::new(MockLapEntryRepository::failing());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);

    session.refresh_data().await;

    assert!(!session.loading());
    let message = session.error().expect("error recorded");
    assert!(message.contains("lap store unavailable"));
    assert!(session.daily_target().is_none());
}

#[tokio::test]
async fn invalid_lap_count_fails_without_touching_state() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;
    session.add_lap(10).await;

    let outcome = session.add_lap(0).await;

    assert!(!outcome.success);
    assert!(session.error().is_some());
    assert_eq!(session.total_laps(), 10);
}

#[tokio::test]
async fn snapshot_mirrors_the_derived_values() {
    let laps = Arc::new(MockLapEntryRepository::new());
    let targets = Arc::new(MockDailyTargetRepository::new());
    let mut session = tracker(laps, targets);
    session.refresh_data().await;
    session.add_lap(25).await;

    let dto = session.snapshot();

    assert_eq!(dto.laps.len(), 1);
    assert_eq!(dto.target, 40);
    assert_eq!(dto.total_laps, 25);
    assert_eq!(dto.remaining, 15);
    assert_eq!(dto.progress_percent, 63);
    assert!(!dto.target_reached);
    assert!(!dto.loading);
    assert!(dto.error.is_none());

    let json = serde_json::to_value(&dto).expect("serialize snapshot");
    assert_eq!(json["total_laps"], 25);
    assert_eq!(json["progress_percent"], 63);
}

// Lap records service

#[tokio::test]
async fn laps_for_date_range_rejects_inverted_bounds() {
    let repo = Arc::new(MockLapEntryRepository::new());
    let service = lap_service(repo);

    let result = service
        .laps_for_date_range(today_utc(), today_utc() - Duration::days(1))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn laps_summary_aggregates_per_day_newest_first() {
    let repo = Arc::new(MockLapEntryRepository::new());
    let day1 = today_utc() - Duration::days(1);
    let day2 = today_utc();
    for (date, count) in [(day1, 10), (day1, 5), (day2, 20)] {
        let timestamp = date.and_hms_opt(9, 0, 0).expect("valid time").and_utc();
        repo.save(&LapEntry::restore(LapId::new(), date, timestamp, count))
            .await
            .unwrap();
    }

    let summary = lap_service(repo).laps_summary(5).await.unwrap();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].date, day2.format("%Y-%m-%d").to_string());
    assert_eq!(summary[0].total_laps, 20);
    assert_eq!(summary[1].total_laps, 15);
}

// Streak overview

#[tokio::test]
async fn overview_stats_flag_an_active_streak() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    for offset in [0, 1, 2] {
        seed_target(&repo, offset, 40, 40).await;
    }

    let mut overview = StreakOverview::new(target_service(repo));
    overview.refresh_streaks().await;

    let stats = overview.streak_stats().expect("stats loaded");
    assert_eq!(stats.current_streak, 3);
    assert!(stats.is_on_streak);
    assert_eq!(
        stats.last_completed_date.as_deref(),
        Some(today_utc().format("%Y-%m-%d").to_string().as_str())
    );
    assert!(!overview.is_streak_at_risk());
}

#[tokio::test]
async fn overview_marks_streak_at_risk_until_today_is_completed() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    seed_target(&repo, 1, 40, 40).await;
    seed_target(&repo, 2, 40, 40).await;

    let mut overview = StreakOverview::new(target_service(repo));
    overview.refresh_streaks().await;

    assert_eq!(overview.streak_data().unwrap().current_streak, 2);
    assert!(overview.is_streak_at_risk());
}

#[tokio::test]
async fn overview_without_history_is_never_at_risk() {
    let repo = Arc::new(MockDailyTargetRepository::new());

    let mut overview = StreakOverview::new(target_service(repo));
    overview.refresh_streaks().await;

    let stats = overview.streak_stats().expect("stats loaded");
    assert_eq!(stats.current_streak, 0);
    assert!(!stats.is_on_streak);
    assert!(stats.last_completed_date.is_none());
    assert!(!overview.is_streak_at_risk());
}

#[tokio::test]
async fn overview_refresh_failure_keeps_previous_data() {
    let repo = Arc::new(MockDailyTargetRepository::failing());

    let mut overview = StreakOverview::new(target_service(repo));
    overview.refresh_streaks().await;

    assert!(!overview.loading());
    assert!(overview.error().is_some());
    assert!(overview.streak_data().is_none());
    assert!(!overview.is_streak_at_risk());
}

#[tokio::test]
async fn overview_history_load_failure_is_non_fatal() {
    let repo = Arc::new(MockDailyTargetRepository::failing());

    let mut overview = StreakOverview::new(target_service(repo));
    overview.load_streak_history(30).await;

    assert!(overview.streak_history().is_empty());
    assert!(overview.error().is_none());
}

#[tokio::test]
async fn overview_history_snapshot_is_display_shaped() {
    let repo = Arc::new(MockDailyTargetRepository::new());
    seed_target(&repo, 0, 40, 40).await;
    seed_target(&repo, 1, 40, 10).await;

    let mut overview = StreakOverview::new(target_service(repo));
    overview.load_streak_history(7).await;

    let dtos = overview.history_snapshot();
    assert_eq!(dtos.len(), 2);
    assert!(!dtos[0].completed);
    assert!(dtos[1].completed);
}
