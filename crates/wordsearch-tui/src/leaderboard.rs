//! Leaderboard persistence backends
//!
//! Supports different backends based on environment:
//! - Local: JSON file in the user's data directory
//! - Test: in-memory, nothing written

use std::path::PathBuf;
use wordsearch_core::{LeaderboardEntry, LeaderboardStorage, MemoryStorage, StorageError};

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Normal play - file-based storage
    Local,
    /// Testing - in-memory storage
    Test,
}

impl Environment {
    /// Detect environment from WORDSEARCH_ENV variable
    pub fn detect() -> Self {
        Self::from_value(std::env::var("WORDSEARCH_ENV").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("test") | Some("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Default leaderboard file location
pub fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordsearch_leaderboard.json")
}

/// Leaderboard stored as a JSON array of `{name, score}` objects
pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LeaderboardStorage for FileLeaderboard {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            // First run: nothing stored yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Unavailable(e.to_string())),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::Write(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
            }
        }
        std::fs::write(&self.path, json).map_err(|e| StorageError::Write(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "File"
    }
}

/// Create the appropriate backend based on environment
pub fn create_backend(env: Environment, path: Option<PathBuf>) -> Box<dyn LeaderboardStorage> {
    match env {
        Environment::Local => Box::new(FileLeaderboard::new(path.unwrap_or_else(default_path))),
        Environment::Test => Box::new(MemoryStorage::new()),
    }
}
