//! Cumulative leaderboard computed from stored sessions.

use crate::error::{Result, SkippedRecord};
use crate::ledger::{self, ScanOutcome};
use log::warn;
use rusqlite::Connection;
use std::collections::HashMap;

/// Total score for one name across all sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub name: String,
    pub total_score: i64,
}

impl RankingEntry {
    pub fn new(name: impl Into<String>, total_score: i64) -> Self {
        RankingEntry {
            name: name.into(),
            total_score,
        }
    }
}

/// A computed leaderboard plus the sessions that could not be counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rankings {
    /// Sorted by total descending, then name ascending.
    pub entries: Vec<RankingEntry>,
    pub skipped: Vec<SkippedRecord>,
}

/// Scans every session and sums scores by participant name.
///
/// A session with any unreadable snapshot contributes nothing.
pub fn compute_rankings(conn: &Connection) -> Result<Rankings> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut skipped = Vec::new();

    for outcome in ledger::scan(conn)? {
        match outcome {
            ScanOutcome::Ok(record) => {
                for participant in record.participants {
                    let total = totals.entry(participant.name).or_insert(0);
                    *total = total.saturating_add(participant.score);
                }
            }
            ScanOutcome::Skipped(record) => {
                warn!(
                    "Session {}: excluded from rankings: {}",
                    record.session, record.reason
                );
                skipped.push(record);
            }
        }
    }

    Ok(Rankings {
        entries: sort_entries(totals),
        skipped,
    })
}

fn sort_entries(totals: HashMap<String, i64>) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = totals
        .into_iter()
        .map(|(name, total)| RankingEntry::new(name, total))
        .collect();
    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipReason;
    use crate::session::ParticipantInput;
    use crate::store::Store;
    use crate::validator::validate;
    use rusqlite::params;

    fn add_session(store: &Store, pairs: &[(&str, &str)], house: i64) {
        let inputs: Vec<ParticipantInput> = pairs
            .iter()
            .map(|(n, s)| ParticipantInput::new(*n, *s))
            .collect();
        ledger::append(store.conn(), &validate(&inputs, house).unwrap()).unwrap();
    }

    fn insert_raw(store: &Store, blob: &str) -> i64 {
        store
            .conn()
            .execute(
                "INSERT INTO sessions (created_at, participants, house_adjustment) VALUES (?1, ?2, 0)",
                params![chrono::Utc::now(), blob],
            )
            .unwrap();
        store.conn().last_insert_rowid()
    }

    #[test]
    fn test_empty_ledger() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(compute_rankings(store.conn()).unwrap(), Rankings::default());
    }

    #[test]
    fn test_totals_accumulate_across_sessions() {
        let store = Store::open_in_memory().unwrap();
        add_session(&store, &[("A", "100"), ("B", "-80")], -20);
        add_session(&store, &[("A", "-30"), ("B", "10"), ("C", "20")], 0);

        let rankings = compute_rankings(store.conn()).unwrap();
        assert_eq!(
            rankings.entries,
            vec![
                RankingEntry::new("A", 70),
                RankingEntry::new("C", 20),
                RankingEntry::new("B", -70),
            ]
        );
    }

    #[test]
    fn test_ties_break_by_name() {
        let store = Store::open_in_memory().unwrap();
        add_session(&store, &[("Zed", "5"), ("Amy", "5"), ("Bo", "-10")], 0);

        let names: Vec<String> = compute_rankings(store.conn())
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Zed", "Bo"]);
    }

    #[test]
    fn test_malformed_session_excluded_entirely() {
        let store = Store::open_in_memory().unwrap();
        add_session(&store, &[("A", "10"), ("B", "-10")], 0);
        let bad = insert_raw(&store, r#"[{"name":"A","score":500},{"name":"B","score":"n/a"}]"#);

        let rankings = compute_rankings(store.conn()).unwrap();
        assert_eq!(
            rankings.entries,
            vec![RankingEntry::new("A", 10), RankingEntry::new("B", -10)]
        );
        assert_eq!(
            rankings.skipped,
            vec![SkippedRecord {
                session: bad,
                reason: SkipReason::MalformedScore(1),
            }]
        );
    }

    #[test]
    fn test_string_scores_in_storage_count() {
        let store = Store::open_in_memory().unwrap();
        insert_raw(&store, r#"[{"name":"A","score":"7"},{"name":"B","score":-7}]"#);

        let rankings = compute_rankings(store.conn()).unwrap();
        assert_eq!(
            rankings.entries,
            vec![RankingEntry::new("A", 7), RankingEntry::new("B", -7)]
        );
    }

    #[test]
    fn test_totals_saturate() {
        let store = Store::open_in_memory().unwrap();
        let blob = format!(r#"[{{"name":"A","score":{}}},{{"name":"B","score":0}}]"#, i64::MAX);
        insert_raw(&store, &blob);
        insert_raw(&store, &blob);

        let rankings = compute_rankings(store.conn()).unwrap();
        assert_eq!(rankings.entries[0], RankingEntry::new("A", i64::MAX));
    }

    #[test]
    fn test_garbled_timestamp_session_excluded() {
        let store = Store::open_in_memory().unwrap();
        add_session(&store, &[("A", "3"), ("B", "-3")], 0);
        store
            .conn()
            .execute(
                "INSERT INTO sessions (created_at, participants, house_adjustment) \
                 VALUES ('garbled', '[{\"name\":\"A\",\"score\":50},{\"name\":\"B\",\"score\":-50}]', 0)",
                [],
            )
            .unwrap();
        let garbled = store.conn().last_insert_rowid();

        let rankings = compute_rankings(store.conn()).unwrap();
        assert_eq!(
            rankings.entries,
            vec![RankingEntry::new("A", 3), RankingEntry::new("B", -3)]
        );
        assert_eq!(rankings.skipped.len(), 1);
        assert_eq!(rankings.skipped[0].session, garbled);
        assert!(matches!(
            rankings.skipped[0].reason,
            SkipReason::MalformedTimestamp(_)
        ));
    }
}
