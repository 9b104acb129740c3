use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::persistence::{ResultExt, SqliteRepositoryBase};
use laptrack_domain::shared::DomainError;
use laptrack_domain::targets::{DailyTarget, DailyTargetRepository};

#[derive(FromRow)]
struct DailyTargetRow {
    date: String,
    target: i64,
    total_laps: i64,
    completed: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl DailyTargetRow {
    fn try_into_target(self) -> Result<DailyTarget, DomainError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            DomainError::DataIntegrity(format!("Invalid target date: {} ({})", self.date, e))
        })?;

        Ok(DailyTarget::restore(
            date,
            self.target,
            self.total_laps,
            self.completed,
            self.created_at,
            self.updated_at,
        ))
    }
}

pub struct SqliteDailyTargetRepository {
    base: SqliteRepositoryBase,
}

impl SqliteDailyTargetRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }

    /// Read the row for a date back out after a write, so callers get the
    /// stored record including audit timestamps.
    async fn fetch_stored(&self, date: NaiveDate) -> Result<DailyTarget, DomainError> {
        let row = self.find_row(date).await?;

        row.ok_or_else(|| {
            DomainError::DataIntegrity(format!(
                "Daily target missing after write: {}",
                date.format("%Y-%m-%d")
            ))
        })
    }

    async fn find_row(&self, date: NaiveDate) -> Result<Option<DailyTarget>, DomainError> {
        let query = r#"
            SELECT date, target, total_laps, completed, created_at, updated_at
            FROM daily_targets
            WHERE date = ?1
            LIMIT 1
        "#;

        let row: Option<DailyTargetRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(date.format("%Y-%m-%d").to_string()),
                "Find daily target by date",
            )
            .await?;

        row.map(|r| r.try_into_target()).transpose()
    }
}

#[async_trait]
impl DailyTargetRepository for SqliteDailyTargetRepository {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyTarget>, DomainError> {
        self.find_row(date).await
    }

    async fn insert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError> {
        let query = r#"
            INSERT INTO daily_targets (date, target, total_laps, completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        let now = Utc::now();
        self.base
            .execute(
                sqlx::query(query)
                    .bind(target.date().format("%Y-%m-%d").to_string())
                    .bind(target.target())
                    .bind(target.total_laps())
                    .bind(target.completed())
                    .bind(now)
                    .bind(now),
                "Insert daily target",
            )
            .await?;

        self.fetch_stored(target.date()).await
    }

    async fn upsert(&self, target: &DailyTarget) -> Result<DailyTarget, DomainError> {
        let query = r#"
            INSERT INTO daily_targets (date, target, total_laps, completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(date) DO UPDATE SET
                target = excluded.target,
                total_laps = excluded.total_laps,
                completed = excluded.completed,
                updated_at = excluded.updated_at
        "#;

        let now = Utc::now();
        self.base
            .execute(
                sqlx::query(query)
                    .bind(target.date().format("%Y-%m-%d").to_string())
                    .bind(target.target())
                    .bind(target.total_laps())
                    .bind(target.completed())
                    .bind(now)
                    .bind(now),
                "Upsert daily target",
            )
            .await?;

        self.fetch_stored(target.date()).await
    }

    async fn find_completed_desc(&self) -> Result<Vec<DailyTarget>, DomainError> {
        let query = r#"
            SELECT date, target, total_laps, completed, created_at, updated_at
            FROM daily_targets
            WHERE completed = 1
            ORDER BY date DESC
        "#;

        let rows: Vec<DailyTargetRow> = self
            .base
            .fetch_all(sqlx::query_as(query), "List completed daily targets")
            .await?;

        rows.into_iter().map(|r| r.try_into_target()).collect()
    }

    async fn find_all_asc(&self) -> Result<Vec<DailyTarget>, DomainError> {
        let query = r#"
            SELECT date, target, total_laps, completed, created_at, updated_at
            FROM daily_targets
            ORDER BY date ASC
        "#;

        let rows: Vec<DailyTargetRow> = self
            .base
            .fetch_all(sqlx::query_as(query), "List all daily targets")
            .await?;

        rows.into_iter().map(|r| r.try_into_target()).collect()
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) FROM daily_targets";

        let count: i64 = sqlx::query_scalar(query)
            .fetch_one(self.base.pool())
            .await
            .to_repo_err()?;

        Ok(count as u64)
    }

    async fn find_in_range_asc(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTarget>, DomainError> {
        let query = r#"
            SELECT date, target, total_laps, completed, created_at, updated_at
            FROM daily_targets
            WHERE date >= ?1
              AND date <= ?2
            ORDER BY date ASC
        "#;

        let rows: Vec<DailyTargetRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query)
                    .bind(start.format("%Y-%m-%d").to_string())
                    .bind(end.format("%Y-%m-%d").to_string()),
                "List daily targets in range",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_target()).collect()
    }
}
