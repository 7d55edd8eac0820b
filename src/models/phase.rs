//! Scheduling status of a concept, derived from its review state.
use super::ReviewState;
use super::sm2::PASSING_QUALITY;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewPhase {
    /// Never reviewed.
    New,
    /// One or two successful reviews in a row.
    Learning,
    /// Three or more successful reviews in a row.
    Review,
    /// Streak reset by a failed review.
    Lapsed,
}

impl ReviewPhase {
    pub fn of(state: &ReviewState) -> Self {
        match state.repetitions {
            0 if state.last_review.is_none() => ReviewPhase::New,
            0 => ReviewPhase::Lapsed,
            1 | 2 => ReviewPhase::Learning,
            _ => ReviewPhase::Review,
        }
    }

    /// Phase reached after grading a concept that had `prior_repetitions`.
    pub fn after(prior_repetitions: u32, quality: u8) -> Self {
        if quality < PASSING_QUALITY {
            return ReviewPhase::Lapsed;
        }
        match prior_repetitions.saturating_add(1) {
            1 | 2 => ReviewPhase::Learning,
            _ => ReviewPhase::Review,
        }
    }

    /// Concepts in this phase count as learned.
    pub fn is_learned(self) -> bool {
        self == ReviewPhase::Review
    }
}
