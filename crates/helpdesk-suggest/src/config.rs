//! Configuration parsing and validation.
//!
//! Helpdesk Suggest is configured through a TOML file (default
//! `./config/hds.toml`). Only `[db]` is required; every other section
//! falls back to defaults.
//!
//! # Example
//!
//! ```toml
//! [db]
//! path = "./data/hds.sqlite"
//!
//! [suggestions]
//! candidate_limit = 200
//! rank_limit = 15
//! max_suggestions = 5
//! relevance_floor = 0.01
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [logging]
//! level = "info"
//!
//! [vocabulary]
//! technical_terms = ["ipos", "stampante", "server"]
//! phrases = [{ phrase = "ipos", bonus = 0.3 }]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use helpdesk_suggest_core::engine::SuggestParams;
use helpdesk_suggest_core::rank::RankParams;
use helpdesk_suggest_core::synthesize::SynthesisParams;
use helpdesk_suggest_core::vocabulary::{PhraseBonus, Vocabulary};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub vocabulary: Option<VocabularyConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuggestionsConfig {
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_rank_limit")]
    pub rank_limit: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_relevance_floor")]
    pub relevance_floor: f64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            rank_limit: default_rank_limit(),
            max_suggestions: default_max_suggestions(),
            relevance_floor: default_relevance_floor(),
        }
    }
}

fn default_candidate_limit() -> usize {
    200
}
fn default_rank_limit() -> usize {
    15
}
fn default_max_suggestions() -> usize {
    5
}
fn default_relevance_floor() -> f64 {
    0.01
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Replacement vocabulary tables. Omitted lists keep the built-in ones.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub technical_terms: Option<Vec<String>>,
    #[serde(default)]
    pub phrases: Option<Vec<PhraseBonus>>,
}

impl Config {
    /// Defaults for commands that only need the vocabulary
    /// (`hds keywords`, `hds score`) when no config file exists.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/hds.sqlite"),
            },
            suggestions: SuggestionsConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            vocabulary: None,
        }
    }

    /// Engine parameters derived from `[suggestions]`.
    pub fn suggest_params(&self) -> SuggestParams {
        SuggestParams {
            candidate_limit: self.suggestions.candidate_limit,
            rank: RankParams {
                limit: self.suggestions.rank_limit,
                relevance_floor: self.suggestions.relevance_floor,
            },
            synthesis: SynthesisParams {
                max_suggestions: self.suggestions.max_suggestions,
                ..SynthesisParams::default()
            },
        }
    }

    /// Vocabulary from `[vocabulary]`, falling back to the built-in tables
    /// for any list that is not configured.
    pub fn vocabulary(&self) -> Vocabulary {
        let Some(cfg) = &self.vocabulary else {
            return Vocabulary::default();
        };
        let defaults = Vocabulary::default();

        let stop_words = match &cfg.stop_words {
            Some(words) => words.clone(),
            None => defaults.stop_words(),
        };
        let technical_terms = match &cfg.technical_terms {
            Some(terms) => terms.clone(),
            None => defaults.technical_terms(),
        };
        let phrases = match &cfg.phrases {
            Some(p) => p.clone(),
            None => defaults.phrases().to_vec(),
        };
        Vocabulary::new(stop_words, technical_terms, phrases)
    }
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`].
/// A file that exists and fails to parse or validate is still an error.
pub fn load_config_or_minimal(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::minimal());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let s = &config.suggestions;
    if s.candidate_limit < 1 {
        anyhow::bail!("suggestions.candidate_limit must be >= 1");
    }
    if s.rank_limit < 1 {
        anyhow::bail!("suggestions.rank_limit must be >= 1");
    }
    if s.max_suggestions < 1 {
        anyhow::bail!("suggestions.max_suggestions must be >= 1");
    }
    if !(0.0..1.0).contains(&s.relevance_floor) {
        anyhow::bail!("suggestions.relevance_floor must be in [0.0, 1.0)");
    }

    if let Some(phrases) = config.vocabulary.as_ref().and_then(|v| v.phrases.as_ref()) {
        for p in phrases {
            if !(0.0..=1.0).contains(&p.bonus) {
                anyhow::bail!(
                    "vocabulary phrase '{}' has bonus {}; must be in [0.0, 1.0]",
                    p.phrase,
                    p.bonus
                );
            }
        }
    }

    Ok(())
}
