//! Runtime configuration.

use std::path::PathBuf;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "score_ledger.db";

/// Default number of sessions shown by a "recent" listing.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// SQLite database file.
    pub database: PathBuf,
    /// Sessions returned by a recent-sessions listing when no limit is given.
    pub recent_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}
