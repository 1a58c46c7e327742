//! Session models and the stored participant format.

use crate::error::SkipReason;
use crate::score::{parse_or_zero, stored_score};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Session identifier assigned by the store.
pub type SessionId = i64;

/// One participant as entered at the boundary, before validation.
///
/// Both fields are optional because form input may omit either one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantInput {
    pub name: Option<String>,
    pub score: Option<String>,
}

impl ParticipantInput {
    pub fn new(name: impl Into<String>, score: impl Into<String>) -> Self {
        ParticipantInput {
            name: Some(name.into()),
            score: Some(score.into()),
        }
    }

    /// Parses a `NAME=SCORE` pair. Text without `=` is a name with no score.
    ///
    /// The split happens at the last `=` so names may contain one.
    pub fn from_pair(pair: &str) -> Self {
        match pair.rsplit_once('=') {
            Some((name, score)) => ParticipantInput {
                name: Some(name.to_string()),
                score: Some(score.to_string()),
            },
            None => ParticipantInput {
                name: Some(pair.to_string()),
                score: None,
            },
        }
    }

    /// Returns the name if it contains anything besides whitespace.
    pub fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// The score with lenient coercion applied.
    pub fn score(&self) -> i64 {
        parse_or_zero(self.score.as_deref())
    }
}

/// The stored copy of a player's name and score for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub name: String,
    pub score: i64,
}

impl Participant {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Participant {
            name: name.into(),
            score,
        }
    }
}

/// A candidate session that passed balance validation.
///
/// Only the validator constructs these, so holding one means the zero-sum
/// invariant held at the time it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    participants: Vec<Participant>,
    house_adjustment: i64,
}

impl ValidatedSession {
    pub(crate) fn new(participants: Vec<Participant>, house_adjustment: i64) -> Self {
        ValidatedSession {
            participants,
            house_adjustment,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn house_adjustment(&self) -> i64 {
        self.house_adjustment
    }
}

/// A persisted game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub house_adjustment: i64,
}

impl SessionRecord {
    /// Returns `true` if any snapshot carries exactly this name.
    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name == name)
    }

    /// Participants rendered as `name:score` joined by `;`.
    pub fn participants_summary(&self) -> String {
        self.participants
            .iter()
            .map(|p| format!("{}:{}", p.name, p.score))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Query values meaning "no filter".
pub const ALL_SENTINELS: [&str; 2] = ["all", "全部"];

/// Restricts a session listing to one participant name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionFilter {
    #[default]
    All,
    Player(String),
}

impl SessionFilter {
    /// Interprets an optional query value; absent, empty and sentinel values mean `All`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None => SessionFilter::All,
            Some(v) if v.is_empty() || ALL_SENTINELS.contains(&v) => SessionFilter::All,
            Some(v) => SessionFilter::Player(v.to_string()),
        }
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        match self {
            SessionFilter::All => true,
            SessionFilter::Player(name) => record.has_participant(name),
        }
    }
}

/// Serializes a participant list for storage.
///
/// `serde_json` leaves non-ASCII characters unescaped.
pub fn encode_participants(participants: &[Participant]) -> serde_json::Result<String> {
    serde_json::to_string(participants)
}

/// Reads a stored participant list.
///
/// Every entry must carry a string `name` and an integral `score`; one bad
/// entry rejects the whole list.
pub fn decode_participants(blob: &str) -> Result<Vec<Participant>, SkipReason> {
    let entries = parse_entries(blob)?;
    let mut participants = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or(SkipReason::MissingName(index))?;
        let score = entry
            .get("score")
            .and_then(stored_score)
            .ok_or(SkipReason::MalformedScore(index))?;
        participants.push(Participant::new(name, score));
    }

    Ok(participants)
}

/// Replaces `old` with `new` in every entry of a stored participant list.
///
/// Works on the raw JSON so entries keep any other fields untouched; scores
/// are not inspected. Returns `Ok(None)` when no entry matched.
pub fn rename_in_blob(blob: &str, old: &str, new: &str) -> Result<Option<String>, SkipReason> {
    let mut entries = parse_entries(blob)?;
    let mut updated = false;

    for (index, entry) in entries.iter_mut().enumerate() {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or(SkipReason::MissingName(index))?;
        if name == old {
            entry.insert("name".to_string(), Value::String(new.to_string()));
            updated = true;
        }
    }

    if !updated {
        return Ok(None);
    }

    serde_json::to_string(&entries)
        .map(Some)
        .map_err(|e| SkipReason::MalformedBlob(e.to_string()))
}

fn parse_entries(blob: &str) -> Result<Vec<serde_json::Map<String, Value>>, SkipReason> {
    serde_json::from_str(blob).map_err(|e| SkipReason::MalformedBlob(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pair() {
        let input = ParticipantInput::from_pair("A=100");
        assert_eq!(input.name.as_deref(), Some("A"));
        assert_eq!(input.score(), 100);

        let input = ParticipantInput::from_pair("B=-80");
        assert_eq!(input.score(), -80);

        let input = ParticipantInput::from_pair("x=y=7");
        assert_eq!(input.name.as_deref(), Some("x=y"));
        assert_eq!(input.score(), 7);

        let input = ParticipantInput::from_pair("Solo");
        assert_eq!(input.name.as_deref(), Some("Solo"));
        assert_eq!(input.score(), 0);
    }

    #[test]
    fn test_usable_name_drops_blank() {
        assert!(ParticipantInput::new("", "1").usable_name().is_none());
        assert!(ParticipantInput::new("  ", "1").usable_name().is_none());
        assert!(ParticipantInput::default().usable_name().is_none());
        assert_eq!(ParticipantInput::new("A", "1").usable_name(), Some("A"));
    }

    #[test]
    fn test_encode_keeps_non_ascii() {
        let blob = encode_participants(&[Participant::new("小明", 10)]).unwrap();
        assert_eq!(blob, r#"[{"name":"小明","score":10}]"#);
        assert_eq!(
            decode_participants(&blob).unwrap(),
            vec![Participant::new("小明", 10)]
        );
    }

    #[test]
    fn test_decode_accepts_string_scores() {
        let parsed = decode_participants(r#"[{"name":"A","score":"12"}]"#).unwrap();
        assert_eq!(parsed, vec![Participant::new("A", 12)]);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            decode_participants("not json"),
            Err(SkipReason::MalformedBlob(_))
        ));
        assert!(matches!(
            decode_participants(r#"{"name":"A"}"#),
            Err(SkipReason::MalformedBlob(_))
        ));
        assert_eq!(
            decode_participants(r#"[{"name":"A","score":1},{"score":2}]"#),
            Err(SkipReason::MissingName(1))
        );
        assert_eq!(
            decode_participants(r#"[{"name":"A","score":"lots"}]"#),
            Err(SkipReason::MalformedScore(0))
        );
    }

    #[test]
    fn test_rename_in_blob() {
        let blob = r#"[{"name":"A","score":1},{"name":"B","score":-1}]"#;
        let renamed = rename_in_blob(blob, "A", "Alice").unwrap().unwrap();
        assert_eq!(
            decode_participants(&renamed).unwrap(),
            vec![Participant::new("Alice", 1), Participant::new("B", -1)]
        );
    }

    #[test]
    fn test_rename_in_blob_no_match() {
        let blob = r#"[{"name":"A","score":1},{"name":"B","score":-1}]"#;
        assert_eq!(rename_in_blob(blob, "C", "Carol").unwrap(), None);
    }

    #[test]
    fn test_rename_in_blob_ignores_scores() {
        let blob = r#"[{"name":"A","score":"oops"},{"name":"B","score":0}]"#;
        let renamed = rename_in_blob(blob, "A", "Alice").unwrap().unwrap();
        assert!(renamed.contains(r#""name":"Alice""#));
        assert!(renamed.contains(r#""score":"oops""#));
    }

    #[test]
    fn test_rename_in_blob_rejects_nameless_entry() {
        let blob = r#"[{"name":"A","score":1},{"score":-1}]"#;
        assert_eq!(
            rename_in_blob(blob, "A", "Alice"),
            Err(SkipReason::MissingName(1))
        );
    }

    #[test]
    fn test_has_participant_is_exact() {
        let record = SessionRecord {
            id: 1,
            created_at: Utc::now(),
            participants: vec![Participant::new("Ann", 5), Participant::new("Bob", -5)],
            house_adjustment: 0,
        };
        assert!(record.has_participant("Ann"));
        assert!(!record.has_participant("ann"));
        assert!(!record.has_participant("An"));
        assert_eq!(record.participants_summary(), "Ann:5;Bob:-5");
    }

    #[test]
    fn test_filter_from_query() {
        assert_eq!(SessionFilter::from_query(None), SessionFilter::All);
        assert_eq!(SessionFilter::from_query(Some("")), SessionFilter::All);
        assert_eq!(SessionFilter::from_query(Some("all")), SessionFilter::All);
        assert_eq!(SessionFilter::from_query(Some("全部")), SessionFilter::All);
        assert_eq!(
            SessionFilter::from_query(Some("Ann")),
            SessionFilter::Player("Ann".to_string())
        );
    }
}
