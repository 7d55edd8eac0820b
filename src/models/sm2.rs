//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each concept has an easiness factor (EF) that adjusts based on performance
//! - Quality grades 0-2 are lapses: repetitions reset to 0 and the interval to 1 day
//! - Quality grades 3-5 grow the interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after every review, lapses included, and never drops below 1.3
//!
//! Intervals are rounded half away from zero (`f64::round`).

use super::ReviewState;
use chrono::{DateTime, Days, Duration, Local, Utc};

pub const DEFAULT_EASINESS: f64 = 2.5;
pub const MIN_EASINESS: f64 = 1.3;
pub const MAX_QUALITY: u8 = 5;
/// Lowest quality that still counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;
pub const REMEMBERED_QUALITY: u8 = 4;
pub const FORGOTTEN_QUALITY: u8 = 2;

/// Parameters produced by a single review.
#[derive(Clone, Debug, PartialEq)]
pub struct NextReview {
    pub easiness: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
}

/// Calculates the next review according to the SM-2 algorithm.
///
/// quality: whole grades 0-5 (0 = complete blackout, 5 = perfect response);
/// fractional grades are not supported. Values above 5 are not rejected here,
/// callers validate at their boundary.
/// `reviewed_at` is the moment the review happened; the next review date is
/// that moment advanced by the new interval in calendar days.
pub fn calculate_next_review(
    state: &ReviewState,
    quality: u8,
    reviewed_at: DateTime<Utc>,
) -> NextReview {
    let q = quality as f64;
    let easiness = (state.easiness + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASINESS);

    let (interval, repetitions) = if quality < PASSING_QUALITY {
        (1, 0)
    } else {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            // Prior interval times the updated EF
            _ => ((state.interval as f64 * easiness).round() as u32).max(1),
        };
        (interval, repetitions)
    };

    NextReview {
        easiness,
        interval,
        repetitions,
        next_review: add_calendar_days(reviewed_at, interval),
    }
}

/// Maps the binary "remembered / not remembered" answer onto the 0-5 scale.
pub fn response_to_quality(remembered: bool) -> u8 {
    if remembered {
        REMEMBERED_QUALITY
    } else {
        FORGOTTEN_QUALITY
    }
}

/// Advances `at` by whole calendar days in the local time zone, so month ends
/// and DST shifts keep the wall-clock time of day.
pub fn add_calendar_days(at: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    at.with_timezone(&Local)
        .checked_add_days(Days::new(days as u64))
        .map(|local| local.with_timezone(&Utc))
        // Nonexistent local time on the target day (DST gap)
        .unwrap_or_else(|| at + Duration::days(days as i64))
}
