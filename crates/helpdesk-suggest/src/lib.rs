//! # Helpdesk Suggest
//!
//! Solution suggestions for new helpdesk tickets, derived from tickets that
//! were already resolved.
//!
//! The pipeline (keyword extraction, similarity scoring, candidate ranking,
//! suggestion synthesis, feedback statistics) lives in
//! `helpdesk-suggest-core`. This crate wires it to a SQLite ticket store,
//! a CLI, and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   import    │──▶│    SQLite    │──▶│    engine    │
//! │ JSON export │   │ tickets+fdbk │   │ rank+combine │
//! └─────────────┘   └──────────────┘   └──────┬───────┘
//!                                             │
//!                         ┌───────────────────┤
//!                         ▼                   ▼
//!                    ┌──────────┐       ┌──────────┐
//!                    │   CLI    │       │   HTTP   │
//!                    │  (hds)   │       │  (axum)  │
//!                    └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hds init
//! hds import tickets.json
//! hds suggest "Errore aggiornamento IPOS" --body "la cassa non si avvia"
//! hds feedback sug_1700000000000_0_ab12cd34 T-200 --helpful
//! hds stats
//! hds serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Helpdesk ticket rows |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite implementation of the core `Store` trait |
//! | [`import`] | Ticket import from JSON |
//! | [`suggest`] | Suggestion command |
//! | [`feedback`] | Feedback and stats commands |
//! | [`inspect`] | Keyword and similarity diagnostics |
//! | [`server`] | HTTP server |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod db;
pub mod feedback;
pub mod import;
pub mod inspect;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod server;
pub mod sqlite_store;
pub mod suggest;
