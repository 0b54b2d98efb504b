//! Best-score leaderboard
//!
//! Keeps one entry per player (their best score), sorted high to low and
//! capped at [`CAPACITY`]. Storage is pluggable:
//! - [`MemoryStorage`]: in-memory, for tests and ephemeral runs
//! - file-backed storage lives with the front end that owns a data directory

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Maximum number of entries kept
pub const CAPACITY: usize = 5;

/// One player's best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Errors that can occur while reading or writing stored entries
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt leaderboard data: {0}")]
    Corrupt(String),
    #[error("failed to write leaderboard: {0}")]
    Write(String),
}

/// Trait for leaderboard persistence backends
pub trait LeaderboardStorage: Send {
    /// Read the stored entry list
    fn load(&self) -> Result<Vec<LeaderboardEntry>, StorageError>;

    /// Replace the stored entry list
    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), StorageError>;

    /// Backend name for display and logs
    fn backend_name(&self) -> &'static str;
}

// ==================== In-memory backend ====================

/// In-memory storage, optionally failing on demand
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<Vec<LeaderboardEntry>>,
    unavailable: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing entries, as if read from disk
    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            data: Mutex::new(entries),
            unavailable: Mutex::new(false),
        }
    }

    /// Make every load/save fail until switched back
    pub fn set_available(&self, available: bool) {
        if let Ok(mut flag) = self.unavailable.lock() {
            *flag = !available;
        }
    }

    fn check_available(&self) -> Result<(), StorageError> {
        match self.unavailable.lock() {
            Ok(flag) if !*flag => Ok(()),
            _ => Err(StorageError::Unavailable("memory storage switched off".into())),
        }
    }

    /// Snapshot of what was last saved
    pub fn stored(&self) -> Vec<LeaderboardEntry> {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl LeaderboardStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        self.check_available()?;
        Ok(self.stored())
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), StorageError> {
        self.check_available()?;
        let mut data = self
            .data
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        *data = entries.to_vec();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

// ==================== Ranking store ====================

/// Bounded, score-sorted list of best scores per player.
///
/// Equal scores keep the order in which the players first entered the list.
pub struct RankingStore {
    entries: Vec<LeaderboardEntry>,
    storage: Box<dyn LeaderboardStorage>,
    /// Stored entries could not be read yet; saving now would overwrite them
    needs_reload: bool,
}

impl std::fmt::Debug for RankingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingStore")
            .field("entries", &self.entries)
            .field("storage", &self.storage.backend_name())
            .finish()
    }
}

impl Default for RankingStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl RankingStore {
    /// Open a store, reading whatever the backend holds.
    ///
    /// Missing or corrupt data starts an empty leaderboard. If the storage is
    /// only unavailable, nothing is written back until it can be read again.
    pub fn open(storage: Box<dyn LeaderboardStorage>) -> Self {
        let mut needs_reload = false;
        let loaded = match storage.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "{} leaderboard unreadable, starting empty: {}",
                    storage.backend_name(),
                    e
                );
                needs_reload = matches!(e, StorageError::Unavailable(_));
                Vec::new()
            }
        };

        let mut store = Self {
            entries: Vec::new(),
            storage,
            needs_reload,
        };
        store.absorb(loaded);
        store
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    /// Record a score. Returns true if the leaderboard changed.
    ///
    /// Zero scores are ignored. A returning player keeps their best score.
    pub fn submit_score(&mut self, player: &str, score: u64) -> bool {
        if score == 0 {
            return false;
        }

        let before = self.entries.clone();
        self.merge(player.to_string(), score);
        self.normalize();

        if self.entries == before {
            return false;
        }

        log::info!("leaderboard updated: {} scored {}", player, score);
        if !self.reload() {
            log::warn!(
                "{} leaderboard still unreadable, not saving over it",
                self.storage.backend_name()
            );
            return true;
        }
        if let Err(e) = self.storage.save(&self.entries) {
            log::warn!(
                "failed to save {} leaderboard, keeping it in memory: {}",
                self.storage.backend_name(),
                e
            );
        }
        true
    }

    /// The best `k` entries, highest first
    pub fn top(&self, k: usize) -> &[LeaderboardEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stored best score for a player, if they are on the board
    pub fn best_for(&self, player: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.name == player)
            .map(|e| e.score)
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Retry a load that failed earlier. Returns true once stored data is merged in.
    fn reload(&mut self) -> bool {
        if !self.needs_reload {
            return true;
        }
        match self.storage.load() {
            Ok(stored) => {
                self.needs_reload = false;
                self.absorb(stored);
                true
            }
            Err(_) => false,
        }
    }

    fn absorb(&mut self, loaded: Vec<LeaderboardEntry>) {
        for entry in loaded {
            self.merge(entry.name, entry.score);
        }
        self.normalize();
    }

    fn merge(&mut self, name: String, score: u64) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.score = existing.score.max(score),
            None => self.entries.push(LeaderboardEntry { name, score }),
        }
    }

    fn normalize(&mut self) {
        // sort_by is stable, so ties keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(CAPACITY);
    }
}
