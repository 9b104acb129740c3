use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::persistence::SqliteRepositoryBase;
use laptrack_domain::laps::{DailyLapTotal, LapEntry, LapEntryRepository};
use laptrack_domain::shared::{DomainError, LapId};

#[derive(FromRow)]
struct LapEntryRow {
    id: String,
    date: String,
    timestamp: DateTime<Utc>,
    count: i64,
}

impl LapEntryRow {
    fn try_into_entry(self) -> Result<LapEntry, DomainError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            DomainError::DataIntegrity(format!("Invalid lap date: {} ({})", self.date, e))
        })?;

        Ok(LapEntry::restore(
            LapId::from_string(&self.id),
            date,
            self.timestamp,
            self.count,
        ))
    }
}

#[derive(FromRow)]
struct DailyTotalRow {
    date: String,
    total: i64,
}

impl DailyTotalRow {
    fn try_into_total(self) -> Result<DailyLapTotal, DomainError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            DomainError::DataIntegrity(format!("Invalid lap date: {} ({})", self.date, e))
        })?;

        Ok(DailyLapTotal::restore(date, self.total))
    }
}

pub struct SqliteLapEntryRepository {
    base: SqliteRepositoryBase,
}

impl SqliteLapEntryRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl LapEntryRepository for SqliteLapEntryRepository {
    async fn save(&self, entry: &LapEntry) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO lap_entries (id, date, timestamp, count)
            VALUES (?1, ?2, ?3, ?4)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(entry.id().as_str())
                    .bind(entry.date().format("%Y-%m-%d").to_string())
                    .bind(entry.timestamp())
                    .bind(entry.count()),
                "Save lap entry",
            )
            .await?;

        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<LapEntry>, DomainError> {
        let query = r#"
            SELECT id, date, timestamp, count
            FROM lap_entries
            WHERE date = ?1
            ORDER BY timestamp ASC
        "#;

        let rows: Vec<LapEntryRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(date.format("%Y-%m-%d").to_string()),
                "Find lap entries by date",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_entry()).collect()
    }

    async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LapEntry>, DomainError> {
        let query = r#"
            SELECT id, date, timestamp, count
            FROM lap_entries
            WHERE date >= ?1
              AND date <= ?2
            ORDER BY date DESC, timestamp ASC
        "#;

        let rows: Vec<LapEntryRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query)
                    .bind(start.format("%Y-%m-%d").to_string())
                    .bind(end.format("%Y-%m-%d").to_string()),
                "Find lap entries in range",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_entry()).collect()
    }

    async fn update_count(&self, id: &LapId, count: i64) -> Result<(), DomainError> {
        let query = "UPDATE lap_entries SET count = ?2 WHERE id = ?1";

        let result = self
            .base
            .execute(
                sqlx::query(query).bind(id.as_str()).bind(count),
                "Update lap count",
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::LapEntryNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &LapId) -> Result<(), DomainError> {
        let query = "DELETE FROM lap_entries WHERE id = ?1";

        self.base
            .execute(sqlx::query(query).bind(id.as_str()), "Delete lap entry")
            .await?;

        Ok(())
    }

    async fn recent_daily_totals(&self, limit: u32) -> Result<Vec<DailyLapTotal>, DomainError> {
        let query = r#"
            SELECT date, SUM(count) AS total
            FROM lap_entries
            GROUP BY date
            ORDER BY date DESC
            LIMIT ?1
        "#;

        let rows: Vec<DailyTotalRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(i64::from(limit)),
                "List recent daily totals",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_total()).collect()
    }
}
