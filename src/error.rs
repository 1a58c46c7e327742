//! Error types for the score ledger.

use crate::session::SessionId;
use crate::player::PlayerId;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Reasons a candidate session is rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Fewer than two named participants remained after cleaning
    #[error("a session needs at least two named participants")]
    InsufficientParticipants,

    /// Scores plus the house adjustment do not cancel out
    #[error("unbalanced ledger: player total ({sum}) + house adjustment ({adjustment}) must equal 0")]
    UnbalancedLedger { sum: i64, adjustment: i64 },

    /// The score total does not fit in a signed 64-bit integer
    #[error("score total overflows a 64-bit integer")]
    ScoreOverflow,
}

/// Player directory failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Another player already holds the requested name
    #[error("a player named {0:?} already exists")]
    DuplicateName(String),

    /// No player with the given id
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// Player names must contain something other than whitespace
    #[error("player name must not be empty")]
    EmptyName,
}

/// Failure reported by the persistence layer.
#[derive(Error, Debug)]
#[error("storage error: {0}")]
pub struct StorageError(#[from] pub rusqlite::Error);

/// Errors that can occur during ledger operation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Failed to write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::Storage(StorageError(err))
    }
}

/// Why a stored session was left out of a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The participant column is not a JSON array of objects
    #[error("participant data is not a valid list: {0}")]
    MalformedBlob(String),

    /// An entry has no string `name`
    #[error("participant #{0} has no name")]
    MissingName(usize),

    /// An entry's score is absent or not an integer
    #[error("participant #{0} has a malformed score")]
    MalformedScore(usize),

    /// The creation time cannot be read as a timestamp
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// The house adjustment is not an integer
    #[error("house adjustment is not an integer")]
    MalformedHouseAdjustment,
}

/// A stored session that a scan could not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub session: SessionId,
    pub reason: SkipReason,
}
