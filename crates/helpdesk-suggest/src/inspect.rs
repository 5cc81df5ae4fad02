//! Diagnostic commands: `hds keywords` and `hds score`.
//!
//! Both run the pure pipeline stages on ad-hoc text with the configured
//! vocabulary, which helps when tuning technical terms and phrases.

use anyhow::Result;

use helpdesk_suggest_core::engine::SuggestionEngine;

/// Print extracted keywords, one per line.
pub fn run_keywords(engine: &SuggestionEngine, text: &str) -> Result<()> {
    let keywords = engine.keywords(text);
    if keywords.is_empty() {
        println!("No keywords.");
        return Ok(());
    }
    for (i, kw) in keywords.iter().enumerate() {
        let tag = if engine.vocabulary().is_technical(kw) {
            " (technical)"
        } else {
            ""
        };
        println!("{:>2}. {}{}", i + 1, kw, tag);
    }
    Ok(())
}

/// Print the similarity breakdown of two texts.
pub fn run_score(engine: &SuggestionEngine, a: &str, b: &str, json: bool) -> Result<()> {
    let breakdown = engine.explain_similarity(a, b);
    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }
    println!("jaccard:          {:.3}", breakdown.jaccard);
    println!("technical bonus:  {:.3}", breakdown.technical_bonus);
    println!("phrase bonus:     {:.3}", breakdown.phrase_bonus);
    println!("score:            {:.3}", breakdown.score);
    Ok(())
}
