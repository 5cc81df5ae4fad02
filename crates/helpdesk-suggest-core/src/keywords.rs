//! Keyword extraction.
//!
//! Turns free text into its most significant terms:
//!
//! 1. Lowercase, and replace anything that is not an ASCII letter or digit,
//!    a Latin-1 letter (`À`–`ÿ`), or whitespace with a space.
//! 2. Split on whitespace; drop tokens of two characters or fewer and
//!    stop words.
//! 3. Accumulate a weight per token: technical terms count 3, others 1.
//! 4. Sort by weight (desc). Ties keep first-occurrence order.
//! 5. Keep the top [`MAX_KEYWORDS`].
//!
//! The input text itself is never modified; callers keep using the raw
//! text for phrase matching and cleaning.

use std::collections::HashMap;

use crate::vocabulary::Vocabulary;

/// Maximum number of keywords returned by [`extract_keywords`].
pub const MAX_KEYWORDS: usize = 15;

/// Weight added per occurrence of a technical term.
const TECHNICAL_WEIGHT: u32 = 3;

/// Extract up to [`MAX_KEYWORDS`] keywords, heaviest first.
///
/// Deterministic: the same text and vocabulary always yield the same
/// sequence in the same order.
///
/// # Example
///
/// ```rust
/// use helpdesk_suggest_core::keywords::extract_keywords;
/// use helpdesk_suggest_core::vocabulary::Vocabulary;
///
/// let kw = extract_keywords("La stampante della cassa non stampa", &Vocabulary::default());
/// assert_eq!(kw, vec!["stampante", "cassa", "stampa"]);
/// ```
pub fn extract_keywords(text: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    // Insertion order is first occurrence; the stable sort below relies on it.
    let mut weights: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in normalized.split_whitespace() {
        if token.chars().count() <= 2 || vocabulary.is_stop_word(token) {
            continue;
        }
        let weight = if vocabulary.is_technical(token) {
            TECHNICAL_WEIGHT
        } else {
            1
        };
        match index.get(token) {
            Some(&i) => weights[i].1 += weight,
            None => {
                index.insert(token.to_string(), weights.len());
                weights.push((token.to_string(), weight));
            }
        }
    }

    weights.sort_by(|a, b| b.1.cmp(&a.1));
    weights.truncate(MAX_KEYWORDS);
    weights.into_iter().map(|(token, _)| token).collect()
}

/// `[a-z0-9À-ÿ]` after lowercasing.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{C0}'..='\u{FF}').contains(&c)
}
