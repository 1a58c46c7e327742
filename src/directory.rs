//! Player directory operations.
//!
//! Functions take a `&Connection` so they run equally against the store
//! connection or inside a transaction.

use crate::error::{DirectoryError, Result};
use crate::player::{check_name, Player, PlayerId};
use crate::store::is_unique_violation;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Adds a player, failing with `DuplicateName` if the name is taken.
pub fn create(conn: &Connection, name: &str) -> Result<PlayerId> {
    let name = check_name(name)?;

    match conn.execute("INSERT INTO players (name) VALUES (?1)", params![name]) {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            debug!("Created player {} ({:?})", id, name);
            Ok(id)
        }
        Err(e) if is_unique_violation(&e) => {
            Err(DirectoryError::DuplicateName(name.to_string()).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Looks up a player by id.
pub fn find(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let player = conn
        .query_row(
            "SELECT id, name FROM players WHERE id = ?1",
            params![id],
            |row| Ok(Player::new(row.get(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;
    Ok(player)
}

/// Changes a directory entry's name.
///
/// Uniqueness is enforced by the store here, not checked beforehand.
pub fn set_name(conn: &Connection, id: PlayerId, new_name: &str) -> Result<()> {
    let new_name = check_name(new_name)?;

    match conn.execute(
        "UPDATE players SET name = ?1 WHERE id = ?2",
        params![new_name, id],
    ) {
        Ok(0) => Err(DirectoryError::PlayerNotFound(id).into()),
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            Err(DirectoryError::DuplicateName(new_name.to_string()).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Removes a directory entry. Sessions are never touched.
pub fn delete(conn: &Connection, id: PlayerId) -> Result<()> {
    let removed = conn.execute("DELETE FROM players WHERE id = ?1", params![id])?;
    if removed == 0 {
        return Err(DirectoryError::PlayerNotFound(id).into());
    }
    debug!("Deleted player {}", id);
    Ok(())
}

/// All players ordered by name.
pub fn list(conn: &Connection) -> Result<Vec<Player>> {
    let mut stmt = conn.prepare("SELECT id, name FROM players ORDER BY name, id")?;
    let players = stmt
        .query_map([], |row| Ok(Player::new(row.get(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(players)
}
