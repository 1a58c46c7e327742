//! Player rename with propagation into historical session snapshots.
//!
//! Sessions store participant names by value, so renaming a player has to
//! rewrite every stored snapshot that carries the old name. The directory
//! update and the sweep run in one transaction: either both commit or
//! neither does. Records whose participant data cannot be read are left
//! untouched and reported, and the rename still succeeds. Only the
//! participant column is read, so a bad timestamp does not stop a rewrite.

use crate::directory;
use crate::error::{DirectoryError, Result, SkippedRecord};
use crate::ledger;
use crate::player::PlayerId;
use crate::session::{rename_in_blob, SessionId};
use crate::store::Store;
use log::{info, warn};

/// What a successful rename changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameResult {
    pub player: PlayerId,
    pub old_name: String,
    pub new_name: String,
    /// Sessions whose snapshots were rewritten.
    pub rewritten: Vec<SessionId>,
    /// Sessions left unchanged because their stored data is malformed.
    pub skipped: Vec<SkippedRecord>,
}

/// Renames a player and rewrites their name in every stored session.
pub fn rename(store: &mut Store, player: PlayerId, new_name: &str) -> Result<RenameResult> {
    let tx = store.transaction()?;

    let old_name = directory::find(&tx, player)?
        .ok_or(DirectoryError::PlayerNotFound(player))?
        .name;

    directory::set_name(&tx, player, new_name)?;

    let mut result = RenameResult {
        player,
        old_name,
        new_name: new_name.to_string(),
        rewritten: Vec::new(),
        skipped: Vec::new(),
    };

    if result.old_name == result.new_name {
        tx.commit()?;
        return Ok(result);
    }

    for raw in ledger::raw_sessions(&tx)? {
        let renamed = raw
            .blob()
            .and_then(|blob| rename_in_blob(blob, &result.old_name, &result.new_name));

        match renamed {
            Ok(Some(blob)) => {
                ledger::write_blob(&tx, raw.id, &blob)?;
                result.rewritten.push(raw.id);
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(
                    "Session {}: not renamed, stored data is malformed: {}",
                    raw.id, reason
                );
                result.skipped.push(SkippedRecord {
                    session: raw.id,
                    reason,
                });
            }
        }
    }

    tx.commit()?;

    info!(
        "Renamed player {} from {:?} to {:?} ({} sessions rewritten, {} skipped)",
        player,
        result.old_name,
        result.new_name,
        result.rewritten.len(),
        result.skipped.len()
    );

    Ok(result)
}
