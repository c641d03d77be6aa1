//! Run history persisted as a JSON array of reports

use crate::errors::{AppError, Result};
use crate::models::FactCheckReport;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored reports, oldest first. A missing file is an empty
    /// history; an unreadable or corrupt one is logged and treated as empty.
    pub fn load(&self) -> Vec<FactCheckReport> {
        if !self.path.exists() {
            return Vec::new();
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not load history");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(reports) => reports,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not load history");
                Vec::new()
            }
        }
    }

    /// Append reports to the stored history
    pub fn append(&self, reports: &[FactCheckReport]) -> Result<()> {
        if reports.is_empty() {
            return Ok(());
        }

        let mut existing = self.load();
        existing.extend_from_slice(reports);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| history_error(&self.path, e))?;
        }
        let json = serde_json::to_string_pretty(&existing)?;
        std::fs::write(&self.path, json).map_err(|e| history_error(&self.path, e))?;

        debug!(path = %self.path.display(), total = existing.len(), "History saved");
        Ok(())
    }

    /// Up to `limit` most recent reports, newest first
    pub fn recent(&self, limit: usize) -> Vec<FactCheckReport> {
        let mut reports = self.load();
        let skip = reports.len().saturating_sub(limit);
        reports.drain(..skip);
        reports.reverse();
        reports
    }
}

fn history_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::History {
        message: format!("Could not save history to {}: {}", path.display(), err),
    }
}
