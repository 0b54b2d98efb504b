//! Play session state machine.
//!
//! A [`Session`] owns the grid, the found words, the score, the hint state,
//! the countdown and the leaderboard. Front ends feed it [`SessionEvent`]s and
//! render the [`SessionView`] it exposes.

use crate::dictionary::{shorten_definition, DictionaryOracle, Lookup, OracleError};
use crate::{Generator, GeneratorConfig, Grid, PathFinder, RankingStore, Trail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shown for valid words that come back without a definition
const NO_DEFINITION: &str = "No definition available";

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grid synthesis settings
    pub generator: GeneratorConfig,
    /// Words hidden in every grid, in placement priority order
    pub target_words: Vec<String>,
    /// Countdown length in seconds
    pub duration_secs: u32,
    /// Points per accepted word
    pub word_score: u64,
    /// Shortest word accepted
    pub min_word_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            target_words: ["CAT", "DOG", "SUN", "FUN"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            duration_secs: 120,
            word_score: 10,
            min_word_len: 3,
        }
    }
}

/// Whether the session still accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Active,
    Ended,
}

/// Hint feature state; one hint per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintState {
    /// No hint requested yet
    Available,
    /// The hint was handed out
    Granted,
    /// A hint was requested but no unfound target word could be traced
    Exhausted,
}

/// A word the player has had accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundWord {
    pub word: String,
    pub definition: String,
}

/// Why a submitted word was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SessionEnded,
    TooShort { min: usize },
    AlreadyFound,
    NotAWord,
    /// The dictionary could not be reached; the player may try again
    LookupFailed,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionEnded => write!(f, "Time's up"),
            Self::TooShort { min } => write!(f, "Words need at least {} letters", min),
            Self::AlreadyFound => write!(f, "Already found"),
            Self::NotAWord => write!(f, "Not a valid word"),
            Self::LookupFailed => write!(f, "Could not check the word, please try again"),
        }
    }
}

/// A word waiting on a dictionary lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWord {
    word: String,
    epoch: u64,
}

impl PendingWord {
    /// The normalised (uppercase) word to look up
    pub fn word(&self) -> &str {
        &self.word
    }
}

/// Outcome of a word submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted {
        word: String,
        points: u64,
        definition: String,
    },
    Rejected {
        word: String,
        reason: Rejection,
    },
    /// The lookup finished after the session ended or restarted
    Discarded { word: String },
}

/// Input to the session transition function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SubmitWord(String),
    RequestHint,
    Restart,
    /// One second of the countdown elapsed
    TimerTick,
}

/// What a transition produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Word(Submission),
    Hint(Option<Trail>),
    Restarted,
    Tick { remaining_secs: u32 },
    Ended { final_score: u64, recorded: bool },
}

/// Everything a front end needs to draw the session
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub grid: &'a Grid,
    pub player: &'a str,
    pub score: u64,
    pub found: &'a [FoundWord],
    pub remaining_secs: u32,
    pub hint_available: bool,
    pub hint_state: HintState,
    pub phase: Phase,
}

/// A single player's session
pub struct Session {
    config: SessionConfig,
    generator: Generator,
    finder: PathFinder,
    leaderboard: RankingStore,
    player: String,
    grid: Grid,
    found: Vec<FoundWord>,
    found_set: HashSet<String>,
    score: u64,
    remaining_secs: u32,
    hint: HintState,
    phase: Phase,
    /// Bumped on end and restart so stale lookups can be recognised
    epoch: u64,
    /// Whether the final score changed the leaderboard
    recorded: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("player", &self.player)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("remaining_secs", &self.remaining_secs)
            .field("hint", &self.hint)
            .field("found", &self.found_set)
            .finish()
    }
}

impl Session {
    /// Start a session with an entropy-seeded generator
    pub fn new(config: SessionConfig, player: &str, leaderboard: RankingStore) -> Self {
        let generator = Generator::with_config(config.generator.clone());
        Self::with_generator(config, generator, player, leaderboard)
    }

    /// Start a session with a seeded generator for reproducible grids
    pub fn with_seed(
        config: SessionConfig,
        seed: u64,
        player: &str,
        leaderboard: RankingStore,
    ) -> Self {
        let generator = Generator::with_seed(config.generator.clone(), seed);
        Self::with_generator(config, generator, player, leaderboard)
    }

    fn with_generator(
        mut config: SessionConfig,
        mut generator: Generator,
        player: &str,
        leaderboard: RankingStore,
    ) -> Self {
        config.target_words = config
            .target_words
            .iter()
            .map(|w| w.trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        let grid = generator.generate(config.target_words.as_slice());
        log::info!(
            "session started for {} on a {}x{} grid",
            player,
            grid.size(),
            grid.size()
        );

        Self {
            remaining_secs: config.duration_secs,
            config,
            generator,
            finder: PathFinder::new(),
            leaderboard,
            player: player.to_string(),
            grid,
            found: Vec::new(),
            found_set: HashSet::new(),
            score: 0,
            hint: HintState::Available,
            phase: Phase::Active,
            epoch: 0,
            recorded: false,
        }
    }

    /// Transition function: apply one event
    pub fn handle(&mut self, event: SessionEvent, oracle: &dyn DictionaryOracle) -> SessionUpdate {
        match event {
            SessionEvent::SubmitWord(word) => SessionUpdate::Word(self.submit_word(&word, oracle)),
            SessionEvent::RequestHint => SessionUpdate::Hint(self.request_hint()),
            SessionEvent::Restart => {
                self.restart();
                SessionUpdate::Restarted
            }
            SessionEvent::TimerTick => match self.tick() {
                Some(final_score) => SessionUpdate::Ended {
                    final_score,
                    recorded: self.recorded,
                },
                None => SessionUpdate::Tick {
                    remaining_secs: self.remaining_secs,
                },
            },
        }
    }

    // ==================== Word submission ====================

    /// Local checks before a dictionary lookup
    pub fn begin_submission(&self, candidate: &str) -> Result<PendingWord, Rejection> {
        if self.phase == Phase::Ended {
            return Err(Rejection::SessionEnded);
        }
        let word = candidate.trim().to_uppercase();
        if word.chars().count() < self.config.min_word_len {
            return Err(Rejection::TooShort {
                min: self.config.min_word_len,
            });
        }
        if self.found_set.contains(&word) {
            return Err(Rejection::AlreadyFound);
        }
        Ok(PendingWord {
            word,
            epoch: self.epoch,
        })
    }

    /// Commit the result of a dictionary lookup
    pub fn complete_submission(
        &mut self,
        pending: PendingWord,
        lookup: Result<Lookup, OracleError>,
    ) -> Submission {
        let PendingWord { word, epoch } = pending;

        if epoch != self.epoch || self.phase == Phase::Ended {
            log::debug!("discarding late lookup for {}", word);
            return Submission::Discarded { word };
        }
        // Another lookup for the same word may have landed first
        if self.found_set.contains(&word) {
            return Submission::Rejected {
                word,
                reason: Rejection::AlreadyFound,
            };
        }

        let lookup = match lookup {
            Ok(lookup) => lookup,
            Err(e) => {
                log::warn!("dictionary lookup for {} failed: {}", word, e);
                return Submission::Rejected {
                    word,
                    reason: Rejection::LookupFailed,
                };
            }
        };
        if !lookup.valid {
            log::debug!("{} is not in the dictionary", word);
            return Submission::Rejected {
                word,
                reason: Rejection::NotAWord,
            };
        }

        let definition = lookup
            .definition
            .as_deref()
            .map(shorten_definition)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DEFINITION.to_string());

        self.found_set.insert(word.clone());
        self.found.push(FoundWord {
            word: word.clone(),
            definition: definition.clone(),
        });
        self.score += self.config.word_score;
        log::debug!("accepted {} (score {})", word, self.score);

        Submission::Accepted {
            word,
            points: self.config.word_score,
            definition,
        }
    }

    /// Check and commit a word in one step
    pub fn submit_word(&mut self, candidate: &str, oracle: &dyn DictionaryOracle) -> Submission {
        match self.begin_submission(candidate) {
            Ok(pending) => {
                let lookup = oracle.lookup(pending.word());
                self.complete_submission(pending, lookup)
            }
            Err(reason) => Submission::Rejected {
                word: candidate.trim().to_uppercase(),
                reason,
            },
        }
    }

    // ==================== Hints ====================

    /// Trace the first unfound target word, once per session
    pub fn request_hint(&mut self) -> Option<Trail> {
        if self.phase == Phase::Ended || self.hint != HintState::Available {
            return None;
        }

        for word in &self.config.target_words {
            if self.found_set.contains(word) {
                continue;
            }
            if let Some(trail) = self.finder.find(&self.grid, word) {
                log::debug!("hint granted for {}", word);
                self.hint = HintState::Granted;
                return Some(trail);
            }
        }

        log::debug!("no unfound target word could be traced");
        self.hint = HintState::Exhausted;
        None
    }

    /// True while a hint request could still succeed
    pub fn hint_available(&self) -> bool {
        self.phase == Phase::Active
            && self.hint == HintState::Available
            && !self.all_targets_found()
    }

    fn all_targets_found(&self) -> bool {
        self.config
            .target_words
            .iter()
            .all(|w| self.found_set.contains(w))
    }

    // ==================== Clock and lifecycle ====================

    /// Advance the countdown by one second. Returns the final score if this
    /// tick ended the session.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase == Phase::Ended {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.end();
            return Some(self.score);
        }
        None
    }

    /// End the session and record the score. Calling again has no effect.
    pub fn end(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        self.phase = Phase::Ended;
        self.epoch += 1;
        log::info!(
            "session ended for {}: {} points, {} words",
            self.player,
            self.score,
            self.found.len()
        );

        self.recorded = self.leaderboard.submit_score(&self.player, self.score);
    }

    /// Throw the current session away and start a fresh one
    pub fn restart(&mut self) {
        self.grid = self.generator.generate(self.config.target_words.as_slice());
        self.found.clear();
        self.found_set.clear();
        self.score = 0;
        self.remaining_secs = self.config.duration_secs;
        self.hint = HintState::Available;
        self.phase = Phase::Active;
        self.epoch += 1;
        self.recorded = false;
        log::info!("session restarted for {}", self.player);
    }

    /// Change the player for the next recorded score
    pub fn set_player(&mut self, player: &str) {
        self.player = player.to_string();
    }

    // ==================== Accessors ====================

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            grid: &self.grid,
            player: &self.player,
            score: self.score,
            found: &self.found,
            remaining_secs: self.remaining_secs,
            hint_available: self.hint_available(),
            hint_state: self.hint,
            phase: self.phase,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn found(&self) -> &[FoundWord] {
        &self.found
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found_set.contains(&word.to_uppercase())
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hint_state(&self) -> HintState {
        self.hint
    }

    pub fn leaderboard(&self) -> &RankingStore {
        &self.leaderboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lookup, OracleError, WordListOracle};
    use std::cell::Cell;

    /// Oracle that fails every lookup
    struct Offline;

    impl DictionaryOracle for Offline {
        fn lookup(&self, _word: &str) -> Result<Lookup, OracleError> {
            Err(OracleError::Unavailable("offline".into()))
        }
    }

    /// Oracle that accepts everything and counts calls
    #[derive(Default)]
    struct AcceptAll {
        calls: Cell<usize>,
    }

    impl DictionaryOracle for AcceptAll {
        fn lookup(&self, _word: &str) -> Result<Lookup, OracleError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Lookup::valid(None))
        }
    }

    fn session() -> Session {
        Session::with_seed(SessionConfig::default(), 7, "Ann", RankingStore::in_memory())
    }

    /// A seed whose grid contains every default target word
    fn session_with_all_targets() -> Session {
        for seed in 0..500 {
            let s = Session::with_seed(
                SessionConfig::default(),
                seed,
                "Ann",
                RankingStore::in_memory(),
            );
            let finder = PathFinder::new();
            if s.config().target_words.iter().all(|w| finder.contains(s.grid(), w)) {
                return s;
            }
        }
        panic!("no seed placed every target word");
    }

    #[test]
    fn test_new_session_state() {
        let s = session();
        let view = s.view();
        assert_eq!(view.phase, Phase::Active);
        assert_eq!(view.score, 0);
        assert_eq!(view.remaining_secs, 120);
        assert!(view.found.is_empty());
        assert!(view.hint_available);
        assert_eq!(view.grid.size(), 4);
        assert_eq!(view.player, "Ann");
    }

    #[test]
    fn test_accept_word_scores_and_records_definition() {
        let mut s = session();
        let oracle = WordListOracle::new();
        match s.submit_word("cat", &oracle) {
            Submission::Accepted { word, points, definition } => {
                assert_eq!(word, "CAT");
                assert_eq!(points, 10);
                assert!(definition.len() <= 100);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.score(), 10);
        assert!(s.is_found("CAT"));
        assert_eq!(s.found().len(), 1);
    }

    #[test]
    fn test_local_checks_skip_the_oracle() {
        let mut s = session();
        let oracle = AcceptAll::default();

        let short = s.submit_word("AB", &oracle);
        assert_eq!(
            short,
            Submission::Rejected {
                word: "AB".into(),
                reason: Rejection::TooShort { min: 3 }
            }
        );
        assert_eq!(oracle.calls.get(), 0);

        assert!(matches!(s.submit_word("TEA", &oracle), Submission::Accepted { .. }));
        assert_eq!(oracle.calls.get(), 1);
        let again = s.submit_word("tea", &oracle);
        assert!(matches!(
            again,
            Submission::Rejected { reason: Rejection::AlreadyFound, .. }
        ));
        assert_eq!(oracle.calls.get(), 1);
        assert_eq!(s.score(), 10);
    }

    #[test]
    fn test_missing_definition_gets_placeholder() {
        let mut s = session();
        match s.submit_word("OWL", &AcceptAll::default()) {
            Submission::Accepted { definition, .. } => assert_eq!(definition, NO_DEFINITION),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_and_failed_lookups_are_rejections() {
        let mut s = session();
        let invalid = s.submit_word("QQQ", &WordListOracle::new());
        assert!(matches!(
            invalid,
            Submission::Rejected { reason: Rejection::NotAWord, .. }
        ));
        let failed = s.submit_word("CAT", &Offline);
        assert!(matches!(
            failed,
            Submission::Rejected { reason: Rejection::LookupFailed, .. }
        ));
        assert_eq!(s.score(), 0);
        assert!(s.found().is_empty());
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn test_late_lookup_after_end_is_discarded() {
        let mut s = session();
        let pending = s.begin_submission("CAT").unwrap();
        s.end();
        let result = s.complete_submission(pending, Ok(Lookup::valid(None)));
        assert_eq!(result, Submission::Discarded { word: "CAT".into() });
        assert_eq!(s.score(), 0);
        assert!(!s.is_found("CAT"));
    }

    #[test]
    fn test_late_lookup_after_restart_is_discarded() {
        let mut s = session();
        let pending = s.begin_submission("CAT").unwrap();
        s.restart();
        let result = s.complete_submission(pending, Ok(Lookup::valid(None)));
        assert!(matches!(result, Submission::Discarded { .. }));
        assert!(s.found().is_empty());
    }

    #[test]
    fn test_duplicate_pending_lookups_count_once() {
        let mut s = session();
        let first = s.begin_submission("CAT").unwrap();
        let second = s.begin_submission("CAT").unwrap();
        assert!(matches!(
            s.complete_submission(first, Ok(Lookup::valid(None))),
            Submission::Accepted { .. }
        ));
        assert!(matches!(
            s.complete_submission(second, Ok(Lookup::valid(None))),
            Submission::Rejected { reason: Rejection::AlreadyFound, .. }
        ));
        assert_eq!(s.score(), 10);
    }

    #[test]
    fn test_hint_granted_once() {
        let mut s = session_with_all_targets();
        let trail = s.request_hint().expect("first hint");
        assert!(trail.spells(s.grid(), "CAT"));
        assert_eq!(s.hint_state(), HintState::Granted);
        assert!(!s.hint_available());
        assert_eq!(s.request_hint(), None);
        assert_eq!(s.request_hint(), None);
    }

    #[test]
    fn test_hint_skips_found_words() {
        let mut s = session_with_all_targets();
        s.submit_word("CAT", &AcceptAll::default());
        let trail = s.request_hint().unwrap();
        assert!(trail.spells(s.grid(), "DOG"));
    }

    #[test]
    fn test_hint_exhausted_when_nothing_traceable() {
        let config = SessionConfig {
            target_words: vec!["ABCDEFGHIJKLMNOPQ".into()],
            ..SessionConfig::default()
        };
        let mut s = Session::with_seed(config, 1, "Ann", RankingStore::in_memory());
        assert_eq!(s.request_hint(), None);
        assert_eq!(s.hint_state(), HintState::Exhausted);
        assert!(!s.hint_available());
    }

    #[test]
    fn test_hint_unavailable_once_all_targets_found() {
        let mut s = session();
        let oracle = AcceptAll::default();
        for word in ["CAT", "DOG", "SUN", "FUN"] {
            s.submit_word(word, &oracle);
        }
        assert!(!s.hint_available());
        assert_eq!(s.request_hint(), None);
        assert_eq!(s.hint_state(), HintState::Exhausted);
    }

    #[test]
    fn test_hint_resets_on_restart() {
        let mut s = session_with_all_targets();
        assert!(s.request_hint().is_some());
        s.restart();
        assert_eq!(s.hint_state(), HintState::Available);
        assert!(s.hint_available());
    }

    #[test]
    fn test_countdown_ends_session_and_records_score() {
        let config = SessionConfig {
            duration_secs: 3,
            ..SessionConfig::default()
        };
        let mut s = Session::with_seed(config, 5, "Ann", RankingStore::in_memory());
        let oracle = AcceptAll::default();
        s.submit_word("CAT", &oracle);

        assert_eq!(
            s.handle(SessionEvent::TimerTick, &oracle),
            SessionUpdate::Tick { remaining_secs: 2 }
        );
        s.handle(SessionEvent::TimerTick, &oracle);
        assert_eq!(
            s.handle(SessionEvent::TimerTick, &oracle),
            SessionUpdate::Ended {
                final_score: 10,
                recorded: true
            }
        );
        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(s.leaderboard().best_for("Ann"), Some(10));

        // Frozen after the end
        assert!(matches!(
            s.submit_word("DOG", &oracle),
            Submission::Rejected { reason: Rejection::SessionEnded, .. }
        ));
        assert_eq!(s.request_hint(), None);
        assert_eq!(s.tick(), None);
        assert_eq!(s.remaining_secs(), 0);
    }

    #[test]
    fn test_zero_score_not_recorded() {
        let mut s = session();
        s.end();
        assert!(s.leaderboard().is_empty());
    }

    #[test]
    fn test_end_records_once() {
        let mut s = session();
        s.submit_word("CAT", &AcceptAll::default());
        s.end();
        s.end();
        assert_eq!(s.leaderboard().len(), 1);
        assert_eq!(s.leaderboard().best_for("Ann"), Some(10));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session();
        let oracle = AcceptAll::default();
        s.submit_word("CAT", &oracle);
        s.tick();
        s.end();

        assert_eq!(s.handle(SessionEvent::Restart, &oracle), SessionUpdate::Restarted);
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.score(), 0);
        assert!(s.found().is_empty());
        assert_eq!(s.remaining_secs(), 120);
        // Leaderboard survives restarts
        assert_eq!(s.leaderboard().best_for("Ann"), Some(10));
        assert!(matches!(s.submit_word("CAT", &oracle), Submission::Accepted { .. }));
    }

    #[test]
    fn test_new_player_after_restart_gets_own_entry() {
        let mut s = session();
        let oracle = AcceptAll::default();
        s.submit_word("CAT", &oracle);
        s.end();

        s.set_player("Bo");
        s.restart();
        assert_eq!(s.view().player, "Bo");
        s.submit_word("DOG", &oracle);
        s.submit_word("SUN", &oracle);
        s.end();

        assert_eq!(s.leaderboard().best_for("Ann"), Some(10));
        assert_eq!(s.leaderboard().best_for("Bo"), Some(20));
    }

    #[test]
    fn test_handle_routes_events() {
        let mut s = session_with_all_targets();
        let oracle = WordListOracle::new();
        assert!(matches!(
            s.handle(SessionEvent::SubmitWord("dog".into()), &oracle),
            SessionUpdate::Word(Submission::Accepted { .. })
        ));
        match s.handle(SessionEvent::RequestHint, &oracle) {
            SessionUpdate::Hint(Some(trail)) => assert!(trail.spells(s.grid(), "CAT")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            s.handle(SessionEvent::RequestHint, &oracle),
            SessionUpdate::Hint(None)
        );
    }

    #[test]
    fn test_target_words_normalised() {
        let config = SessionConfig {
            target_words: vec![" cat ".into(), "".into(), "Dog".into()],
            ..SessionConfig::default()
        };
        let s = Session::with_seed(config, 2, "Ann", RankingStore::in_memory());
        assert_eq!(s.config().target_words, vec!["CAT", "DOG"]);
    }
}
