//! Storage locations for the database and log files.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StorageConfig {
    data_dir: PathBuf,
}

impl StorageConfig {
    /// Resolve under the platform data directory, e.g.
    /// `~/.local/share/laptrack` on Linux.
    pub fn resolve() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir: base.join("laptrack"),
        }
    }

    /// Explicit root, used by tests and portable installs.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("laptrack.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
