//! # Helpdesk Suggest Core
//!
//! Shared logic for Helpdesk Suggest: ticket models, keyword extraction,
//! similarity scoring, candidate ranking, suggestion synthesis, feedback
//! statistics, and the store abstraction.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Every pipeline stage is a pure function;
//! only [`engine::SuggestionEngine`] touches a [`store::Store`].
//!
//! ## Pipeline
//!
//! ```text
//! query ──▶ keywords ──▶ similarity ──▶ rank ──▶ synthesize ──▶ suggestions
//!                             ▲
//!                      Store::fetch_candidate_records
//! ```

pub mod engine;
pub mod feedback;
pub mod keywords;
pub mod models;
pub mod observer;
pub mod rank;
pub mod similarity;
pub mod store;
pub mod synthesize;
pub mod vocabulary;
