//! Vocabulary tables used by keyword extraction and similarity scoring.
//!
//! The defaults target an Italian retail helpdesk. Deployments with a
//! different vocabulary inject their own tables through [`Vocabulary::new`];
//! the scoring formula does not change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Function words dropped before weighting.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "il", "lo", "la", "gli", "le", "di", "da", "con", "per", "tra", "che", "non", "del", "della",
    "una", "uno", "sono", "come", "anche", "questo",
];

/// Domain terms weighted 3× and rewarded when shared.
const DEFAULT_TECHNICAL_TERMS: &[&str] = &[
    "ipos",
    "aggiornamento",
    "update",
    "errore",
    "error",
    "sistema",
    "system",
    "software",
    "stampante",
    "server",
    "database",
    "rete",
    "password",
    "login",
    "cassa",
];

/// A phrase matched on the full lowercased text of both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseBonus {
    pub phrase: String,
    pub bonus: f64,
}

/// Stop words, technical terms, and phrase bonuses.
///
/// All entries are stored lowercased.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stop_words: HashSet<String>,
    technical_terms: HashSet<String>,
    phrases: Vec<PhraseBonus>,
}

impl Vocabulary {
    pub fn new<S, T>(stop_words: S, technical_terms: T, phrases: Vec<PhraseBonus>) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .collect(),
            technical_terms: technical_terms
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .collect(),
            phrases: phrases
                .into_iter()
                .filter(|p| !p.phrase.trim().is_empty())
                .map(|p| PhraseBonus {
                    phrase: p.phrase.trim().to_lowercase(),
                    bonus: p.bonus,
                })
                .collect(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn is_technical(&self, token: &str) -> bool {
        self.technical_terms.contains(token)
    }

    pub fn phrases(&self) -> &[PhraseBonus] {
        &self.phrases
    }

    /// Stop words, sorted.
    pub fn stop_words(&self) -> Vec<String> {
        sorted(&self.stop_words)
    }

    /// Technical terms, sorted.
    pub fn technical_terms(&self) -> Vec<String> {
        sorted(&self.technical_terms)
    }
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = set.iter().cloned().collect();
    v.sort();
    v
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_STOP_WORDS.iter().copied(),
            DEFAULT_TECHNICAL_TERMS.iter().copied(),
            default_phrases(),
        )
    }
}

/// Built-in phrase bonuses: the point-of-sale product name, then the
/// register hardware.
pub fn default_phrases() -> Vec<PhraseBonus> {
    vec![
        PhraseBonus {
            phrase: "ipos".to_string(),
            bonus: 0.3,
        },
        PhraseBonus {
            phrase: "registratore di cassa".to_string(),
            bonus: 0.2,
        },
    ]
}
