//! Word lookups against dictionaryapi.dev

use serde::Deserialize;
use std::time::Duration;
use wordsearch_core::{DictionaryOracle, Lookup, OracleError};

const API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Lookups block the game loop, so keep them short
const TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

/// Online English dictionary
pub struct DictionaryApi {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for DictionaryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryApi {
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            base_url: base_url.to_string(),
        }
    }
}

impl DictionaryOracle for DictionaryApi {
    fn lookup(&self, word: &str) -> Result<Lookup, OracleError> {
        let url = format!("{}{}", self.base_url, word.to_lowercase());
        match self.agent.get(&url).call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| OracleError::Unavailable(e.to_string()))?;
                parse_entries(&body)
            }
            // Unknown words come back as 404
            Err(ureq::Error::Status(404, _)) => Ok(Lookup::invalid()),
            Err(ureq::Error::Status(code, _)) => {
                Err(OracleError::Unavailable(format!("HTTP {} for {}", code, word)))
            }
            Err(e) => Err(OracleError::Unavailable(e.to_string())),
        }
    }
}

/// Read the first definition of the first meaning from an API response
fn parse_entries(body: &str) -> Result<Lookup, OracleError> {
    let entries: Vec<Entry> =
        serde_json::from_str(body).map_err(|e| OracleError::Malformed(e.to_string()))?;

    let Some(meaning) = entries.first().and_then(|entry| entry.meanings.first()) else {
        return Ok(Lookup::invalid());
    };
    let definition = meaning
        .definitions
        .first()
        .map(|d| d.definition.clone());
    Ok(Lookup::valid(definition))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_definition() {
        let body = r#"[{
            "word": "tea",
            "meanings": [
                {"partOfSpeech": "noun", "definitions": [
                    {"definition": "The dried leaves of the tea plant.", "example": "a cup of tea"},
                    {"definition": "A drink made by infusing them."}
                ]},
                {"partOfSpeech": "verb", "definitions": [{"definition": "To drink tea."}]}
            ]
        }]"#;
        assert_eq!(
            parse_entries(body).unwrap(),
            Lookup::valid(Some("The dried leaves of the tea plant.".to_string()))
        );
    }

    #[test]
    fn test_parse_meaning_without_definitions() {
        let body = r#"[{"word": "tea", "meanings": [{"definitions": []}]}]"#;
        assert_eq!(parse_entries(body).unwrap(), Lookup::valid(None));
    }

    #[test]
    fn test_parse_no_meanings_is_invalid() {
        assert_eq!(parse_entries("[]").unwrap(), Lookup::invalid());
        assert_eq!(parse_entries(r#"[{"word": "qxz"}]"#).unwrap(), Lookup::invalid());
    }

    #[test]
    fn test_parse_unexpected_shape_is_malformed() {
        let body = r#"{"title": "No Definitions Found"}"#;
        assert!(matches!(parse_entries(body), Err(OracleError::Malformed(_))));
        assert!(matches!(parse_entries("<html>"), Err(OracleError::Malformed(_))));
    }

    #[test]
    fn test_unreachable_server_is_unavailable() {
        let api = DictionaryApi::with_base_url("http://127.0.0.1:9/entries/");
        assert!(matches!(api.lookup("tea"), Err(OracleError::Unavailable(_))));
    }
}
