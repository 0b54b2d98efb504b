//! Word-search engine.
//!
//! Builds square letter grids that hide a list of target words, finds words
//! along 8-connected trails, runs timed play sessions with a single hint, and
//! keeps a small best-score leaderboard.

mod dictionary;
mod finder;
mod generator;
mod grid;
mod leaderboard;
mod session;

pub use dictionary::{
    shorten_definition, DictionaryOracle, FallbackOracle, Lookup, OracleError, WordListOracle,
};
pub use finder::{PathFinder, Trail};
pub use generator::{Direction, Generator, GeneratorConfig};
pub use grid::{Alphabet, Grid, GridError, Position};
pub use leaderboard::{
    LeaderboardEntry, LeaderboardStorage, MemoryStorage, RankingStore, StorageError, CAPACITY,
};
pub use session::{
    FoundWord, HintState, PendingWord, Phase, Rejection, Session, SessionConfig, SessionEvent,
    SessionUpdate, SessionView, Submission,
};
