//! Zero-sum balance validation for candidate sessions.

use crate::error::ValidationError;
use crate::session::{Participant, ParticipantInput, ValidatedSession};
use log::debug;

/// Minimum number of named participants in a session.
pub const MIN_PARTICIPANTS: usize = 2;

/// Cleans and checks a candidate session.
///
/// Entries without a usable name are dropped, scores are coerced with
/// [`parse_or_zero`](crate::score::parse_or_zero), and the remaining list must
/// have at least [`MIN_PARTICIPANTS`] entries whose scores plus
/// `house_adjustment` sum to zero. The participant-count check runs first.
pub fn validate(
    inputs: &[ParticipantInput],
    house_adjustment: i64,
) -> Result<ValidatedSession, ValidationError> {
    let participants: Vec<Participant> = inputs
        .iter()
        .filter_map(|input| {
            input
                .usable_name()
                .map(|name| Participant::new(name, input.score()))
        })
        .collect();

    if participants.len() < MIN_PARTICIPANTS {
        return Err(ValidationError::InsufficientParticipants);
    }

    let sum = participants
        .iter()
        .try_fold(0i64, |acc, p| acc.checked_add(p.score))
        .ok_or(ValidationError::ScoreOverflow)?;

    let balance = sum
        .checked_add(house_adjustment)
        .ok_or(ValidationError::ScoreOverflow)?;

    if balance != 0 {
        return Err(ValidationError::UnbalancedLedger {
            sum,
            adjustment: house_adjustment,
        });
    }

    debug!(
        "Validated session with {} participants, house adjustment {}",
        participants.len(),
        house_adjustment
    );

    Ok(ValidatedSession::new(participants, house_adjustment))
}
