//! # Helpdesk Suggest CLI (`hds`)
//!
//! ## Usage
//!
//! ```bash
//! hds --config ./config/hds.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hds init` | Create the SQLite database and schema |
//! | `hds import <file>` | Import tickets from a JSON export |
//! | `hds suggest "<title>"` | Suggest solutions for a new ticket |
//! | `hds feedback <suggestion> <ticket>` | Record whether a suggestion helped |
//! | `hds stats` | Feedback accuracy and ticket counts |
//! | `hds keywords "<text>"` | Show extracted keywords |
//! | `hds score "<a>" "<b>"` | Show the similarity breakdown of two texts |
//! | `hds serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use helpdesk_suggest::{config, feedback, import, inspect, logging, migrate, server, suggest};

/// Helpdesk Suggest CLI: solution suggestions from resolved tickets.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/hds.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "hds",
    about = "Helpdesk Suggest — solution suggestions from previously resolved tickets",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/hds.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Import tickets from a JSON array export.
    ///
    /// Tickets are upserted by id, so re-importing refreshes them.
    Import {
        /// Path to the JSON file.
        path: PathBuf,
    },

    /// Suggest solutions for a new ticket.
    Suggest {
        /// Ticket title.
        title: String,

        /// Ticket description.
        #[arg(long)]
        body: Option<String>,

        /// Maximum number of suggestions.
        #[arg(long)]
        limit: Option<usize>,

        /// Print suggestions as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record feedback on a suggestion.
    Feedback {
        /// Suggestion identifier as printed by `hds suggest`.
        suggestion_id: String,

        /// Ticket the suggestion was shown for.
        ticket_id: String,

        /// The suggestion solved the problem.
        #[arg(long, conflicts_with = "not_helpful", required_unless_present = "not_helpful")]
        helpful: bool,

        /// The suggestion did not help.
        #[arg(long)]
        not_helpful: bool,

        /// Free-form comment.
        #[arg(long)]
        text: Option<String>,
    },

    /// Show feedback accuracy and ticket counts.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the keywords extracted from a text.
    Keywords {
        text: String,
    },

    /// Show how similar two texts are, term by term.
    Score {
        a: String,
        b: String,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that run on built-in defaults when no config file exists
    match &cli.command {
        Commands::Keywords { text } => {
            let cfg = config::load_config_or_minimal(&cli.config)?;
            logging::init(&cfg.logging.level);
            let engine = suggest::engine_from_config(&cfg, None);
            inspect::run_keywords(&engine, text)?;
            return Ok(());
        }
        Commands::Score { a, b, json } => {
            let cfg = config::load_config_or_minimal(&cli.config)?;
            logging::init(&cfg.logging.level);
            let engine = suggest::engine_from_config(&cfg, None);
            inspect::run_score(&engine, a, b, *json)?;
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging.level);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { path } => {
            import::run_import(&cfg, &path).await?;
        }
        Commands::Suggest {
            title,
            body,
            limit,
            json,
        } => {
            suggest::run_suggest(&cfg, &title, body, limit, json).await?;
        }
        Commands::Feedback {
            suggestion_id,
            ticket_id,
            helpful,
            not_helpful: _,
            text,
        } => {
            feedback::run_feedback(&cfg, &suggestion_id, &ticket_id, helpful, text).await?;
        }
        Commands::Stats { json } => {
            feedback::run_stats(&cfg, json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Keywords { .. } | Commands::Score { .. } => {}
    }

    Ok(())
}
