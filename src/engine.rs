//! The score ledger facade.
//!
//! Ties the player directory, session storage, validation, rename
//! propagation and ranking together over one open store, and renders the
//! results as CSV for the command-line front end.

use crate::config::LedgerConfig;
use crate::directory;
use crate::error::Result;
use crate::ledger;
use crate::player::{Player, PlayerId};
use crate::ranking::{self, Rankings};
use crate::rename::{self, RenameResult};
use crate::session::{ParticipantInput, SessionFilter, SessionId, SessionRecord};
use crate::store::Store;
use crate::validator;
use log::info;
use std::io::Write;

/// A multiplayer score ledger backed by one store.
///
/// # Output Ordering
///
/// Players are listed by name, sessions newest first, and rankings by total
/// descending with ties broken by name, so repeated runs print identical
/// tables.
pub struct ScoreLedger {
    store: Store,
}

impl ScoreLedger {
    /// Wraps an already opened store.
    pub fn new(store: Store) -> Self {
        ScoreLedger { store }
    }

    /// Opens the database named in `config`.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        Ok(Self::new(Store::open(&config.database)?))
    }

    /// A ledger over a fresh in-memory database.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Store::open_in_memory()?))
    }

    /// Closes the underlying store.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    /// Names of all players, sorted.
    pub fn list_players(&self) -> Result<Vec<String>> {
        Ok(self
            .list_player_entries()?
            .into_iter()
            .map(|p| p.name)
            .collect())
    }

    /// All directory entries, sorted by name.
    pub fn list_player_entries(&self) -> Result<Vec<Player>> {
        directory::list(self.store.conn())
    }

    pub fn add_player(&self, name: &str) -> Result<PlayerId> {
        let id = directory::create(self.store.conn(), name)?;
        info!("Added player {:?} as {}", name, id);
        Ok(id)
    }

    /// Removes a player from the directory; their sessions stay as recorded.
    pub fn delete_player(&self, id: PlayerId) -> Result<()> {
        directory::delete(self.store.conn(), id)?;
        info!("Deleted player {}", id);
        Ok(())
    }

    /// Renames a player and every historical snapshot of their old name.
    pub fn rename_player(&mut self, id: PlayerId, new_name: &str) -> Result<RenameResult> {
        rename::rename(&mut self.store, id, new_name)
    }

    /// Validates and records a session.
    pub fn add_session(
        &self,
        participants: &[ParticipantInput],
        house_adjustment: i64,
    ) -> Result<SessionId> {
        let session = validator::validate(participants, house_adjustment)?;
        let id = ledger::append(self.store.conn(), &session)?;
        info!(
            "Recorded session {} ({} players, house {})",
            id,
            session.participants().len(),
            house_adjustment
        );
        Ok(id)
    }

    /// The `limit` most recent sessions.
    pub fn list_recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        ledger::list_recent(self.store.conn(), limit)
    }

    /// All sessions newest first, optionally limited to one participant.
    pub fn list_all_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>> {
        let mut records = ledger::list_all(self.store.conn())?;
        records.retain(|record| filter.matches(record));
        Ok(records)
    }

    pub fn get_rankings(&self) -> Result<Rankings> {
        ranking::compute_rankings(self.store.conn())
    }

    /// Writes the player directory as CSV.
    pub fn write_players<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "name"])?;

        for player in self.list_player_entries()? {
            csv_writer.write_record([player.id.to_string(), player.name])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes sessions as CSV, participants joined as `name:score;...`.
    pub fn write_sessions<W: Write>(records: &[SessionRecord], writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "date", "participants", "house"])?;

        for record in records {
            csv_writer.write_record([
                record.id.to_string(),
                record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.participants_summary(),
                record.house_adjustment.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the leaderboard as CSV with 1-based ranks.
    pub fn write_rankings<W: Write>(rankings: &Rankings, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["rank", "name", "total"])?;

        for (index, entry) in rankings.entries.iter().enumerate() {
            csv_writer.write_record([
                (index + 1).to_string(),
                entry.name.clone(),
                entry.total_score.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// The underlying store (for testing).
    #[cfg(test)]
    pub fn store(&self) -> &Store {
        &self.store
    }
}
