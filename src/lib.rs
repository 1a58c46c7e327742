//! # Score Ledger
//!
//! Records multiplayer game sessions, each a set of signed player scores plus
//! a house adjustment, and derives cumulative rankings from them.
//!
//! ## Design Principles
//!
//! - **Zero-sum sessions**: player scores plus the house adjustment must sum
//!   to `0` before a session is stored
//! - **Snapshots by value**: sessions keep a copy of each participant's name,
//!   so deleting a player never alters history
//! - **Transactional renames**: a rename updates the directory and every
//!   stored snapshot in one SQLite transaction
//! - **Best-effort scans**: unreadable stored sessions are reported as
//!   skipped instead of failing rankings or renames
//!
//! ## Example
//!
//! ```
//! use score_ledger::{ParticipantInput, ScoreLedger};
//!
//! let ledger = ScoreLedger::in_memory().unwrap();
//! ledger.add_player("A").unwrap();
//! ledger.add_player("B").unwrap();
//! ledger
//!     .add_session(
//!         &[ParticipantInput::new("A", "100"), ParticipantInput::new("B", "-80")],
//!         -20,
//!     )
//!     .unwrap();
//!
//! let rankings = ledger.get_rankings().unwrap();
//! assert_eq!(rankings.entries[0].name, "A");
//! assert_eq!(rankings.entries[0].total_score, 100);
//! ```

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod player;
pub mod ranking;
pub mod rename;
pub mod score;
pub mod session;
pub mod store;
pub mod validator;

pub use config::LedgerConfig;
pub use engine::ScoreLedger;
pub use error::{
    DirectoryError, LedgerError, Result, SkipReason, SkippedRecord, StorageError,
    ValidationError,
};
pub use ledger::ScanOutcome;
pub use player::{Player, PlayerId};
pub use ranking::{RankingEntry, Rankings};
pub use rename::RenameResult;
pub use session::{
    Participant, ParticipantInput, SessionFilter, SessionId, SessionRecord, ValidatedSession,
};
pub use store::Store;
pub use validator::validate;
