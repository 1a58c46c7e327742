//! Score parsing.
//!
//! Two policies live here and nowhere else:
//!
//! - **Input scores are lenient.** Text typed by a user that is not an
//!   integer counts as `0`; it never rejects the session.
//! - **Stored scores are strict.** A persisted score must be an integer (or a
//!   string holding one); anything else marks the whole record as malformed.

use serde_json::Value;

/// Parses user-entered score text, coercing anything unparseable to `0`.
///
/// Surrounding whitespace is ignored and a leading `+` or `-` is accepted.
/// Missing input, empty text, fractions and values outside the `i64` range
/// all yield `0`.
///
/// ```
/// use score_ledger::score::parse_or_zero;
///
/// assert_eq!(parse_or_zero(Some(" -80 ")), -80);
/// assert_eq!(parse_or_zero(Some("abc")), 0);
/// assert_eq!(parse_or_zero(None), 0);
/// ```
pub fn parse_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|text| text.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Reads a score out of a stored participant entry.
///
/// Returns `None` for anything that is not an integral number.
pub fn stored_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
