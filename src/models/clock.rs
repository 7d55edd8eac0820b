//! Time source used wherever "now" matters, so tests can pin it.
use super::ReviewState;
use super::sm2::{NextReview, calculate_next_review};
use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// SM-2 scheduling against a clock: reviews are assumed to happen "now".
#[derive(Clone, Debug, Default)]
pub struct Scheduler<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Next review for a review happening now. Leaves `state` untouched.
    pub fn compute_next_review(&self, state: &ReviewState, quality: u8) -> NextReview {
        calculate_next_review(state, quality, self.clock.now())
    }

    /// Reviews `state` now and applies the result. The clock is read once, so
    /// `last_review` and the next review date share the same instant, which is
    /// returned.
    pub fn review(&self, state: &mut ReviewState, quality: u8) -> DateTime<Utc> {
        let now = self.clock.now();
        let next = calculate_next_review(state, quality, now);
        state.apply(&next, now);
        now
    }
}
