//! Command line flags and how they become a session setup

use crate::dictionary_api::DictionaryApi;
use crate::leaderboard::{self, Environment};
use crate::theme::ThemeName;
use clap::Parser;
use std::path::PathBuf;
use wordsearch_core::{
    DictionaryOracle, FallbackOracle, GeneratorConfig, RankingStore, SessionConfig,
    WordListOracle,
};

#[derive(Parser, Debug)]
#[command(
    name = "wordsearch",
    version,
    about = "Find words hidden in a letter grid before the clock runs out"
)]
pub struct Cli {
    /// Grid side length
    #[arg(long, value_name = "N", default_value_t = 4, value_parser = clap::value_parser!(u16).range(2..=12))]
    pub size: u16,
    /// Round length in seconds
    #[arg(long, value_name = "SECS", default_value_t = 120, value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: u32,
    /// Name recorded on the leaderboard
    #[arg(long, default_value = "Player")]
    pub player: String,
    /// Comma-separated words to hide in every grid
    #[arg(long, value_name = "WORDS", value_delimiter = ',')]
    pub words: Option<Vec<String>>,
    /// Word list file, one word per line (optionally WORD<TAB>definition)
    #[arg(long, value_name = "PATH")]
    pub dict: Option<PathBuf>,
    /// Check words against the local word list only
    #[arg(long)]
    pub offline: bool,
    /// Seed for reproducible grids
    #[arg(long)]
    pub seed: Option<u64>,
    /// Leaderboard file location
    #[arg(long, value_name = "PATH")]
    pub leaderboard: Option<PathBuf>,
    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeName::Dark)]
    pub theme: ThemeName,
}

impl Cli {
    /// Session settings with the defaults overridden by flags
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig {
            generator: GeneratorConfig {
                size: self.size as usize,
                ..GeneratorConfig::default()
            },
            duration_secs: self.duration,
            ..SessionConfig::default()
        };
        if let Some(words) = &self.words {
            config.target_words = words
                .iter()
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        config
    }

    /// The player name, falling back to "Player" when blank
    pub fn player_name(&self) -> &str {
        match self.player.trim() {
            "" => "Player",
            name => name,
        }
    }

    /// The dictionary: dictionaryapi.dev backed by the local word list,
    /// or the word list alone with `--offline`
    pub fn oracle(&self) -> Box<dyn DictionaryOracle> {
        let words = self.word_list();
        if self.offline {
            Box::new(words)
        } else {
            Box::new(FallbackOracle::new(DictionaryApi::new(), words))
        }
    }

    /// Local words: `--dict` if it loads, otherwise the bundled list.
    /// Hidden words are always included.
    pub fn word_list(&self) -> WordListOracle {
        let base = match &self.dict {
            Some(path) => match WordListOracle::from_path(path) {
                Ok(oracle) => oracle,
                Err(e) => {
                    log::warn!("using bundled word list: {}", e);
                    WordListOracle::bundled()
                }
            },
            None => WordListOracle::bundled(),
        };
        self.session_config()
            .target_words
            .iter()
            .fold(base, |oracle, word| oracle.with_word(word, None))
    }

    /// Open the leaderboard for the detected environment
    pub fn ranking_store(&self) -> RankingStore {
        let env = Environment::detect();
        let backend = leaderboard::create_backend(env, self.leaderboard.clone());
        log::info!("using {} leaderboard ({:?})", backend.backend_name(), env);
        RankingStore::open(backend)
    }
}
