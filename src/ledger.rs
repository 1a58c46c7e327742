//! Session storage: append, scan, and in-place participant rewrites.
//!
//! Sessions are listed newest first (`created_at` descending, then `id`
//! descending for sessions written within the same instant).

use crate::error::{Result, SkipReason, SkippedRecord};
use crate::session::{
    decode_participants, encode_participants, Participant, SessionId, SessionRecord,
    ValidatedSession,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::types::{FromSql, Value, ValueRef};
use rusqlite::{params, Connection, Row};

const SELECT_NEWEST_FIRST: &str = "SELECT id, created_at, participants, house_adjustment \
     FROM sessions ORDER BY created_at DESC, id DESC";

/// Outcome of reading one stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Ok(SessionRecord),
    Skipped(SkippedRecord),
}

/// A session row before any of its stored columns are interpreted.
pub(crate) struct RawSession {
    pub id: SessionId,
    pub created_at: Value,
    pub participants: Value,
    pub house_adjustment: Value,
}

impl RawSession {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawSession {
            id: row.get(0)?,
            created_at: row.get(1)?,
            participants: row.get(2)?,
            house_adjustment: row.get(3)?,
        })
    }

    /// The participant column as text, or the reason it cannot be read.
    pub fn blob(&self) -> std::result::Result<&str, SkipReason> {
        match &self.participants {
            Value::Text(text) => Ok(text.as_str()),
            other => Err(SkipReason::MalformedBlob(format!(
                "expected text, found {:?}",
                other.data_type()
            ))),
        }
    }

    fn timestamp(&self) -> std::result::Result<DateTime<Utc>, SkipReason> {
        DateTime::<Utc>::column_result(ValueRef::from(&self.created_at))
            .map_err(|e| SkipReason::MalformedTimestamp(e.to_string()))
    }

    fn house(&self) -> std::result::Result<i64, SkipReason> {
        match self.house_adjustment {
            Value::Integer(n) => Ok(n),
            _ => Err(SkipReason::MalformedHouseAdjustment),
        }
    }

    fn decode(&self) -> std::result::Result<SessionRecord, SkipReason> {
        Ok(SessionRecord {
            id: self.id,
            created_at: self.timestamp()?,
            participants: self.blob().and_then(decode_participants)?,
            house_adjustment: self.house()?,
        })
    }

    fn into_outcome(self) -> ScanOutcome {
        match self.decode() {
            Ok(record) => ScanOutcome::Ok(record),
            Err(reason) => ScanOutcome::Skipped(SkippedRecord {
                session: self.id,
                reason,
            }),
        }
    }
}

/// Stores a validated session, stamping it with the current time.
pub fn append(conn: &Connection, session: &ValidatedSession) -> Result<SessionId> {
    append_at(conn, session, Utc::now())
}

/// Stores a validated session with an explicit creation time.
pub fn append_at(
    conn: &Connection,
    session: &ValidatedSession,
    created_at: DateTime<Utc>,
) -> Result<SessionId> {
    let blob = encode_participants(session.participants())
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    conn.execute(
        "INSERT INTO sessions (created_at, participants, house_adjustment) VALUES (?1, ?2, ?3)",
        params![created_at, blob, session.house_adjustment()],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        "Appended session {} with {} participants",
        id,
        session.participants().len()
    );
    Ok(id)
}

/// Reads every session newest first, reporting unreadable ones as skipped.
pub fn scan(conn: &Connection) -> Result<Vec<ScanOutcome>> {
    let mut stmt = conn.prepare(SELECT_NEWEST_FIRST)?;
    let outcomes = stmt
        .query_map([], RawSession::from_row)?
        .map(|raw| raw.map(RawSession::into_outcome))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(outcomes)
}

/// Every readable session, newest first.
pub fn list_all(conn: &Connection) -> Result<Vec<SessionRecord>> {
    list_newest(conn, usize::MAX)
}

/// The `limit` most recent readable sessions.
pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<SessionRecord>> {
    list_newest(conn, limit)
}

fn list_newest(conn: &Connection, limit: usize) -> Result<Vec<SessionRecord>> {
    let mut stmt = conn.prepare(SELECT_NEWEST_FIRST)?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while records.len() < limit {
        let Some(row) = rows.next()? else {
            break;
        };
        match RawSession::from_row(row)?.into_outcome() {
            ScanOutcome::Ok(record) => records.push(record),
            ScanOutcome::Skipped(skipped) => {
                warn!(
                    "Session {}: omitted from listing: {}",
                    skipped.session, skipped.reason
                );
            }
        }
    }

    Ok(records)
}

/// Session rows with their stored columns left uninterpreted.
pub(crate) fn raw_sessions(conn: &Connection) -> Result<Vec<RawSession>> {
    let mut stmt = conn.prepare(SELECT_NEWEST_FIRST)?;
    let rows = stmt
        .query_map([], RawSession::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Replaces one session's participant list. Returns `false` if no such session.
pub fn rewrite_participants(
    conn: &Connection,
    id: SessionId,
    participants: &[Participant],
) -> Result<bool> {
    let blob = encode_participants(participants)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    write_blob(conn, id, &blob)
}

pub(crate) fn write_blob(conn: &Connection, id: SessionId, blob: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE sessions SET participants = ?1 WHERE id = ?2",
        params![blob, id],
    )?;
    Ok(updated > 0)
}
