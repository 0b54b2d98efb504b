use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use wordsearch_core::{
    DictionaryOracle, PathFinder, Phase, Position, Session, SessionEvent, SessionUpdate,
    Submission, Trail,
};

/// How often the main loop ticks
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Ticks per countdown second
const TICKS_PER_SECOND: u32 = 10;

/// Longest player name accepted by the name prompt
const MAX_NAME_LEN: usize = 20;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Final result shown on the end-of-game overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub final_score: u64,
    pub recorded: bool,
}

/// The main application state
pub struct App {
    /// Current play session
    pub session: Session,
    /// Word validity source
    oracle: Box<dyn DictionaryOracle>,
    finder: PathFinder,
    /// Color theme
    pub theme: Theme,
    /// Word being typed
    pub input: String,
    /// Where the typed word sits on the grid, if it can be traced
    pub typed_trail: Option<Trail>,
    /// Tiles revealed by the hint
    pub hint_trail: Option<Trail>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Ticks since the last countdown second
    clock_ticks: u32,
    /// Set after the first Ctrl+R during a running round
    confirm_restart: bool,
    /// Name being entered before a restart
    pub name_prompt: Option<String>,
    /// Outcome of the last finished round
    pub result: Option<RoundResult>,
}

impl App {
    pub fn new(session: Session, oracle: Box<dyn DictionaryOracle>, theme: Theme) -> Self {
        Self {
            session,
            oracle,
            finder: PathFinder::new(),
            theme,
            input: String::new(),
            typed_trail: None,
            hint_trail: None,
            message: None,
            message_timer: 0,
            clock_ticks: 0,
            confirm_restart: false,
            name_prompt: None,
            result: None,
        }
    }

    /// Update timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        // The clock waits while the player types a name
        if self.session.phase() == Phase::Ended || self.name_prompt.is_some() {
            return;
        }

        self.clock_ticks += 1;
        if self.clock_ticks >= TICKS_PER_SECOND {
            self.clock_ticks = 0;
            self.apply(SessionEvent::TimerTick);
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }
        if self.name_prompt.is_some() {
            self.handle_prompt_key(key);
            return AppAction::Continue;
        }
        if ctrl && key.code == KeyCode::Char('r') {
            self.request_restart();
            return AppAction::Continue;
        }
        self.confirm_restart = false;

        match self.session.phase() {
            Phase::Ended => self.handle_ended_key(key),
            Phase::Active => self.handle_game_key(key),
        }
    }

    fn handle_ended_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter => self.open_name_prompt(),
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('?') | KeyCode::Tab => self.apply(SessionEvent::RequestHint),
            KeyCode::Char(c) if c.is_alphabetic() => {
                let max = self.session.grid().size().pow(2);
                if self.input.chars().count() < max {
                    // Starting a new word hides the hint
                    if self.input.is_empty() {
                        self.hint_trail = None;
                    }
                    self.input.extend(c.to_uppercase());
                    self.retrace();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.retrace();
            }
            KeyCode::Esc => self.clear_input(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
        AppAction::Continue
    }

    fn request_restart(&mut self) {
        if self.session.phase() == Phase::Active && !self.confirm_restart {
            self.confirm_restart = true;
            self.show_message("Press Ctrl+R again to restart. Your current round will be lost.");
            return;
        }
        self.confirm_restart = false;
        self.open_name_prompt();
    }

    /// Ask who plays next, starting from the current name
    fn open_name_prompt(&mut self) {
        self.name_prompt = Some(self.session.player().to_string());
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(name) = self.name_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_NAME_LEN => {
                name.push(c);
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => {
                let name = match name.trim() {
                    "" => "Player".to_string(),
                    trimmed => trimmed.to_string(),
                };
                self.session.set_player(&name);
                self.name_prompt = None;
                self.apply(SessionEvent::Restart);
            }
            KeyCode::Esc => {
                self.name_prompt = None;
                self.apply(SessionEvent::Restart);
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        if self.input.is_empty() {
            return;
        }
        if self.typed_trail.is_none() {
            let msg = format!("{} is not on the grid", self.input);
            self.show_message(&msg);
            self.clear_input();
            return;
        }
        let word = std::mem::take(&mut self.input);
        self.typed_trail = None;
        self.hint_trail = None;
        self.apply(SessionEvent::SubmitWord(word));
    }

    /// Feed an event to the session and reflect the outcome on screen
    fn apply(&mut self, event: SessionEvent) {
        match self.session.handle(event, self.oracle.as_ref()) {
            SessionUpdate::Word(Submission::Accepted { word, points, .. }) => {
                self.show_message(&format!("Found {}! +{}", word, points));
            }
            SessionUpdate::Word(Submission::Rejected { word, reason }) => {
                self.show_message(&format!("{}: {}", word, reason));
            }
            SessionUpdate::Word(Submission::Discarded { .. }) => {}
            SessionUpdate::Hint(Some(trail)) => {
                self.hint_trail = Some(trail);
                self.show_message("Hint: follow the highlighted tiles");
            }
            SessionUpdate::Hint(None) => self.show_message("No hints available."),
            SessionUpdate::Restarted => {
                self.clear_input();
                self.hint_trail = None;
                self.result = None;
                self.clock_ticks = 0;
                self.show_message("New grid. Good luck!");
            }
            SessionUpdate::Tick { .. } => {}
            SessionUpdate::Ended {
                final_score,
                recorded,
            } => {
                self.clear_input();
                self.result = Some(RoundResult {
                    final_score,
                    recorded,
                });
            }
        }
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.typed_trail = None;
    }

    fn retrace(&mut self) {
        self.typed_trail = if self.input.is_empty() {
            None
        } else {
            self.finder.find(self.session.grid(), &self.input)
        };
    }

    /// True when the tile belongs to the typed word's trail
    pub fn is_typed(&self, pos: Position) -> bool {
        self.typed_trail.as_ref().is_some_and(|t| t.contains(pos))
    }

    /// True when the tile belongs to the hint trail
    pub fn is_hinted(&self, pos: Position) -> bool {
        self.hint_trail.as_ref().is_some_and(|t| t.contains(pos))
    }

    /// True when the player has typed something that cannot be traced
    pub fn input_untraceable(&self) -> bool {
        !self.input.is_empty() && self.typed_trail.is_none()
    }
}
