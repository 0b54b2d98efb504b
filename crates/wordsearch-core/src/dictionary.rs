//! Word validity lookups.
//!
//! The session never decides on its own whether a word is real; it asks a
//! [`DictionaryOracle`]. Lookups may fail, and a failed lookup is treated as a
//! rejected word.

use std::collections::HashMap;
use std::path::Path;

/// Longest definition shown to the player, in characters
const MAX_DEFINITION_CHARS: usize = 100;

/// Result of a dictionary lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub valid: bool,
    pub definition: Option<String>,
}

impl Lookup {
    pub fn valid(definition: Option<String>) -> Self {
        Self {
            valid: true,
            definition,
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            definition: None,
        }
    }
}

/// Errors from a dictionary source
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("dictionary unavailable: {0}")]
    Unavailable(String),
    #[error("malformed dictionary data: {0}")]
    Malformed(String),
}

/// Anything that can say whether a word exists
pub trait DictionaryOracle {
    fn lookup(&self, word: &str) -> Result<Lookup, OracleError>;
}

/// Clip a definition for display, keeping at most 100 characters
pub fn shorten_definition(definition: &str) -> String {
    let definition = definition.trim();
    if definition.chars().count() > MAX_DEFINITION_CHARS {
        let mut short: String = definition.chars().take(MAX_DEFINITION_CHARS - 3).collect();
        short.push_str("...");
        short
    } else {
        definition.to_string()
    }
}

/// Definitions for the default target words, always present
const GLOSSARY: &[(&str, &str)] = &[
    ("CAT", "A small domesticated carnivorous mammal with soft fur and retractable claws."),
    ("DOG", "A domesticated carnivorous mammal kept as a pet or for work."),
    ("SUN", "The star around which the earth orbits."),
    ("FUN", "Enjoyment, amusement, or light-hearted pleasure."),
];

/// Common English words shipped with the crate
const BUNDLED_WORDS: &str = include_str!("../data/words.txt");

/// In-memory dictionary built from a word list
#[derive(Debug, Clone)]
pub struct WordListOracle {
    words: HashMap<String, Option<String>>,
}

impl Default for WordListOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl WordListOracle {
    /// A dictionary holding only the built-in glossary
    pub fn new() -> Self {
        let words = GLOSSARY
            .iter()
            .map(|(word, def)| (word.to_string(), Some(def.to_string())))
            .collect();
        Self { words }
    }

    /// The built-in glossary plus the bundled list of common words
    pub fn bundled() -> Self {
        let mut oracle = Self::new();
        if let Err(e) = oracle.extend_from_text(BUNDLED_WORDS) {
            log::warn!("bundled word list skipped: {}", e);
        }
        oracle
    }

    /// Parse word-list text on top of the built-in glossary.
    ///
    /// One entry per line: `WORD` or `WORD<TAB>definition`. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self, OracleError> {
        let mut oracle = Self::new();
        oracle.extend_from_text(text)?;
        Ok(oracle)
    }

    fn extend_from_text(&mut self, text: &str) -> Result<(), OracleError> {
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (word, definition) = match line.split_once('\t') {
                Some((word, def)) => (word.trim(), Some(def.trim()).filter(|d| !d.is_empty())),
                None => (line.trim(), None),
            };
            if word.chars().any(|c| !c.is_alphabetic()) {
                return Err(OracleError::Malformed(format!(
                    "line {}: {:?} is not a single word",
                    line_no + 1,
                    word
                )));
            }
            self.insert(word, definition);
        }
        Ok(())
    }

    /// Load a word list file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OracleError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let oracle = Self::parse(&text)?;
        log::info!("loaded {} dictionary words from {}", oracle.len(), path.display());
        Ok(oracle)
    }

    /// Add one word, keeping an existing definition if the new one is empty
    pub fn with_word(mut self, word: &str, definition: Option<&str>) -> Self {
        self.insert(word, definition);
        self
    }

    fn insert(&mut self, word: &str, definition: Option<&str>) {
        let entry = self.words.entry(word.to_uppercase()).or_insert(None);
        if let Some(definition) = definition {
            *entry = Some(definition.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl DictionaryOracle for WordListOracle {
    fn lookup(&self, word: &str) -> Result<Lookup, OracleError> {
        Ok(match self.words.get(&word.to_uppercase()) {
            Some(definition) => Lookup::valid(definition.clone()),
            None => Lookup::invalid(),
        })
    }
}

/// Asks `primary` first and falls back to a local word list.
///
/// A word counts if either source knows it. When `primary` fails, the
/// fallback alone decides.
pub struct FallbackOracle<P> {
    primary: P,
    fallback: WordListOracle,
}

impl<P: DictionaryOracle> FallbackOracle<P> {
    pub fn new(primary: P, fallback: WordListOracle) -> Self {
        Self { primary, fallback }
    }
}

impl<P: DictionaryOracle> DictionaryOracle for FallbackOracle<P> {
    fn lookup(&self, word: &str) -> Result<Lookup, OracleError> {
        let local = self.fallback.lookup(word)?;
        match self.primary.lookup(word) {
            Ok(found) if found.valid => Ok(Lookup::valid(found.definition.or(local.definition))),
            Ok(_) => Ok(local),
            Err(e) => {
                log::warn!("dictionary lookup for {} failed, using word list: {}", word, e);
                Ok(local)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glossary_words_are_valid() {
        let oracle = WordListOracle::new();
        for word in ["CAT", "dog", "Sun", "FUN"] {
            let lookup = oracle.lookup(word).unwrap();
            assert!(lookup.valid, "{} should be valid", word);
            assert!(lookup.definition.is_some());
        }
        assert!(!oracle.lookup("QXZ").unwrap().valid);
    }

    #[test]
    fn test_parse_word_list() {
        let text = "# comment\n\nbat\tA flying mammal.\r\nowl\n  \ncat\n";
        let oracle = WordListOracle::parse(text).unwrap();
        assert_eq!(oracle.len(), 6);
        assert_eq!(
            oracle.lookup("BAT").unwrap(),
            Lookup::valid(Some("A flying mammal.".to_string()))
        );
        assert_eq!(oracle.lookup("owl").unwrap(), Lookup::valid(None));
        // A bare entry does not wipe the built-in definition
        assert!(oracle.lookup("CAT").unwrap().definition.is_some());
    }

    #[test]
    fn test_parse_rejects_phrases() {
        let err = WordListOracle::parse("ice cream\n").unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = WordListOracle::from_path("/nonexistent/wordsearch/words.txt").unwrap_err();
        assert!(matches!(err, OracleError::Unavailable(_)));
    }

    #[test]
    fn test_shorten_definition() {
        assert_eq!(shorten_definition("  short  "), "short");
        let long = "x".repeat(150);
        let short = shorten_definition(&long);
        assert_eq!(short.chars().count(), 100);
        assert!(short.ends_with("..."));
        assert_eq!(shorten_definition(&"y".repeat(100)), "y".repeat(100));
    }

    #[test]
    fn test_bundled_list_knows_common_words() {
        let mut oracle = WordListOracle::new();
        assert!(oracle.extend_from_text(BUNDLED_WORDS).is_ok());

        let oracle = WordListOracle::bundled();
        for word in ["tea", "ACT", "house", "Water"] {
            assert!(oracle.lookup(word).unwrap().valid, "{} should be valid", word);
        }
        assert!(oracle.len() > 1000);
        assert!(!oracle.lookup("QXZ").unwrap().valid);
    }

    /// Scripted primary source
    struct Scripted(Result<Lookup, OracleError>);

    impl DictionaryOracle for Scripted {
        fn lookup(&self, _word: &str) -> Result<Lookup, OracleError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let down = Scripted(Err(OracleError::Unavailable("offline".into())));
        let oracle = FallbackOracle::new(down, WordListOracle::bundled());
        assert!(oracle.lookup("TEA").unwrap().valid);
        assert!(!oracle.lookup("QXZ").unwrap().valid);
    }

    #[test]
    fn test_fallback_merges_answers() {
        let online = Scripted(Ok(Lookup::valid(Some("Online meaning.".into()))));
        let oracle = FallbackOracle::new(online, WordListOracle::new());
        assert_eq!(
            oracle.lookup("QXZ").unwrap(),
            Lookup::valid(Some("Online meaning.".into()))
        );

        // Primary knows the word but has no text; local glossary fills in
        let bare = Scripted(Ok(Lookup::valid(None)));
        let oracle = FallbackOracle::new(bare, WordListOracle::new());
        assert!(oracle.lookup("CAT").unwrap().definition.is_some());

        // Primary rejects, local list still accepts
        let rejects = Scripted(Ok(Lookup::invalid()));
        let oracle = FallbackOracle::new(rejects, WordListOracle::new().with_word("QWX", None));
        assert!(oracle.lookup("QWX").unwrap().valid);
        assert!(!oracle.lookup("ZZZ").unwrap().valid);
    }
}
