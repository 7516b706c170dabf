// Stop-word language identifier.
//
// Scores text against the stop-word list of each supported language and
// picks the language with the most hits. Short microloan updates are full
// of function words, which makes this good enough for routing documents
// by language.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::{LanguageIdentifier, UNKNOWN_LANGUAGE};

/// One language's code and stop-word set.
struct LanguageProfile {
    code: &'static str,
    stop_words: HashSet<String>,
}

/// Stop-word based identifier. Built once per run.
pub struct StopWordIdentifier {
    profiles: Vec<LanguageProfile>,
}

impl Default for StopWordIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StopWordIdentifier {
    pub fn new() -> Self {
        let languages = [
            ("en", LANGUAGE::English),
            ("es", LANGUAGE::Spanish),
            ("fr", LANGUAGE::French),
            ("pt", LANGUAGE::Portuguese),
            ("de", LANGUAGE::German),
            ("it", LANGUAGE::Italian),
            ("ru", LANGUAGE::Russian),
        ];
        let profiles = languages
            .into_iter()
            .map(|(code, language)| LanguageProfile {
                code,
                stop_words: get(language).into_iter().collect(),
            })
            .collect();
        Self { profiles }
    }

    /// Supported language codes, in tie-break order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.code).collect()
    }
}

impl LanguageIdentifier for StopWordIdentifier {
    fn identify(&self, text: &str) -> String {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphabetic() && c != '\'')
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let mut best: Option<(&str, usize)> = None;
        for profile in &self.profiles {
            let hits = tokens
                .iter()
                .filter(|t| profile.stop_words.contains(t.as_str()))
                .count();
            // strictly greater: earlier languages win ties
            if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
                best = Some((profile.code, hits));
            }
        }

        debug!(?best, tokens = tokens.len(), "Language scores");
        best.map(|(code, _)| code)
            .unwrap_or(UNKNOWN_LANGUAGE)
            .to_string()
    }
}
