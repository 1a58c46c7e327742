//! Player directory entries.

use crate::error::DirectoryError;

/// Directory identifier assigned by the store.
pub type PlayerId = i64;

/// A live entry in the player directory.
///
/// Sessions never reference a `Player` by id; they hold a copy of the name
/// taken when the session was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
        }
    }
}

/// Checks that a directory name is usable, returning it unchanged.
pub fn check_name(name: &str) -> Result<&str, DirectoryError> {
    if name.trim().is_empty() {
        return Err(DirectoryError::EmptyName);
    }
    Ok(name)
}
