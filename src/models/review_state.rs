//! Memory-strength parameters tracked per concept.
use super::sm2::{DEFAULT_EASINESS, NextReview};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub easiness: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
    pub last_review: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// State of a concept that has never been reviewed, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            easiness: DEFAULT_EASINESS,
            interval: 1,
            repetitions: 0,
            next_review: now,
            last_review: None,
        }
    }

    /// Stores a scheduler result and records when the review happened.
    pub fn apply(&mut self, next: &NextReview, reviewed_at: DateTime<Utc>) {
        self.easiness = next.easiness;
        self.interval = next.interval;
        self.repetitions = next.repetitions;
        self.next_review = next.next_review;
        self.last_review = Some(reviewed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_state_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let state = ReviewState::new(now);

        assert_eq!(state.easiness, 2.5);
        assert_eq!(state.interval, 1);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.next_review, now);
        assert!(state.last_review.is_none());
    }

    #[test]
    fn test_apply_records_review_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap();
        let mut state = ReviewState::new(now);

        state.apply(
            &NextReview {
                easiness: 2.6,
                interval: 6,
                repetitions: 2,
                next_review: later,
            },
            now,
        );

        assert_eq!(state.easiness, 2.6);
        assert_eq!(state.interval, 6);
        assert_eq!(state.repetitions, 2);
        assert_eq!(state.next_review, later);
        assert_eq!(state.last_review, Some(now));
    }
}
