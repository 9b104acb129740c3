//! Composition root: wires the SQLite adapters into the application services.

use std::sync::Arc;

use laptrack_infrastructure::config::StorageConfig;
use laptrack_infrastructure::logging;
use laptrack_infrastructure::persistence::repositories::{
    SqliteDailyTargetRepository, SqliteLapEntryRepository,
};
use laptrack_infrastructure::persistence::Database;

use crate::application::queries::StreakOverview;
use crate::application::services::{LapRecordsService, ProgressTracker, TargetService};

pub struct App {
    lap_service: LapRecordsService,
    target_service: TargetService,
}

impl App {
    /// Initialize logging, open the database, run migrations, and wire the
    /// services.
    pub async fn init(config: &StorageConfig) -> anyhow::Result<Self> {
        logging::init_logger(config.log_dir())?;

        let db_path = config.database_path();
        let database = Database::new(&db_path.to_string_lossy()).await?;
        database.run_migrations().await?;

        let pool = Arc::new(database.pool().clone());
        let lap_service =
            LapRecordsService::new(Arc::new(SqliteLapEntryRepository::new(pool.clone())));
        let target_service =
            TargetService::new(Arc::new(SqliteDailyTargetRepository::new(pool)));

        Ok(Self {
            lap_service,
            target_service,
        })
    }

    pub fn lap_service(&self) -> &LapRecordsService {
        &self.lap_service
    }

    pub fn target_service(&self) -> &TargetService {
        &self.target_service
    }

    /// Fresh mutation session for today's progress.
    pub fn progress_tracker(&self) -> ProgressTracker {
        ProgressTracker::new(self.lap_service.clone(), self.target_service.clone())
    }

    /// Fresh read-only streak session.
    pub fn streak_overview(&self) -> StreakOverview {
        StreakOverview::new(self.target_service.clone())
    }
}
