//! Score Ledger CLI
//!
//! Records game sessions and prints players, session history and rankings
//! as CSV.
//!
//! # Usage
//!
//! ```bash
//! score-ledger add-player A
//! score-ledger add-player B
//! score-ledger add-session --house -20 A=100 B=-80
//! score-ledger rankings
//! ```
//!
//! # Environment Variables
//!
//! - `SCORE_LEDGER_DB`: Database file (overridden by `--db`)
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use clap::{Parser, Subcommand};
use score_ledger::config::{DEFAULT_DATABASE, DEFAULT_RECENT_LIMIT};
use score_ledger::{LedgerConfig, ParticipantInput, Result, ScoreLedger, SessionFilter};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "score-ledger", about = "Zero-sum multiplayer score ledger", version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SCORE_LEDGER_DB", default_value = DEFAULT_DATABASE)]
    db: PathBuf,

    /// Sessions shown by `recent` when no limit is given
    #[arg(long, global = true, default_value_t = DEFAULT_RECENT_LIMIT)]
    recent_limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List players (id,name)
    Players,
    /// Add a player to the directory
    AddPlayer { name: String },
    /// Rename a player and every session that mentions them
    RenamePlayer { id: i64, new_name: String },
    /// Remove a player from the directory; history is kept
    DeletePlayer { id: i64 },
    /// Record a session from NAME=SCORE pairs
    AddSession {
        /// House adjustment making the session sum to zero
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        house: i64,
        #[arg(required = true)]
        participants: Vec<String>,
    },
    /// Most recent sessions
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// All sessions, optionally only those including one player
    History {
        #[arg(long)]
        player: Option<String>,
    },
    /// Cumulative leaderboard
    Rankings,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = LedgerConfig {
        database: cli.db,
        recent_limit: cli.recent_limit,
    };
    let mut ledger = ScoreLedger::open(&config)?;

    match cli.command {
        Command::Players => ledger.write_players(io::stdout().lock())?,
        Command::AddPlayer { name } => {
            let id = ledger.add_player(&name)?;
            println!("Added player {} ({})", name, id);
        }
        Command::RenamePlayer { id, new_name } => {
            let result = ledger.rename_player(id, &new_name)?;
            println!(
                "Renamed {} to {} ({} sessions updated, {} skipped)",
                result.old_name,
                result.new_name,
                result.rewritten.len(),
                result.skipped.len()
            );
        }
        Command::DeletePlayer { id } => {
            ledger.delete_player(id)?;
            println!("Deleted player {}", id);
        }
        Command::AddSession {
            house,
            participants,
        } => {
            let inputs: Vec<ParticipantInput> = participants
                .iter()
                .map(|pair| ParticipantInput::from_pair(pair))
                .collect();
            let id = ledger.add_session(&inputs, house)?;
            println!("Recorded session {}", id);
        }
        Command::Recent { limit } => {
            let records = ledger.list_recent_sessions(limit.unwrap_or(config.recent_limit))?;
            ScoreLedger::write_sessions(&records, io::stdout().lock())?;
        }
        Command::History { player } => {
            let filter = SessionFilter::from_query(player.as_deref());
            let records = ledger.list_all_sessions(&filter)?;
            ScoreLedger::write_sessions(&records, io::stdout().lock())?;
        }
        Command::Rankings => {
            let rankings = ledger.get_rankings()?;
            ScoreLedger::write_rankings(&rankings, io::stdout().lock())?;
        }
    }

    ledger.close()
}
