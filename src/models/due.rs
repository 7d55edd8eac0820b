//! Due checks and counts over anything that carries review state.
use super::ReviewState;
use super::phase::ReviewPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything with SM-2 review state attached.
pub trait Schedulable {
    fn review_state(&self) -> &ReviewState;
}

impl Schedulable for ReviewState {
    fn review_state(&self) -> &ReviewState {
        self
    }
}

impl<T: Schedulable + ?Sized> Schedulable for &T {
    fn review_state(&self) -> &ReviewState {
        (**self).review_state()
    }
}

/// Due when the scheduled time is at or before `now`.
pub fn is_due(next_review: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    next_review <= now
}

/// Keeps due items, preserving their order.
pub fn filter_due<I>(concepts: I, now: DateTime<Utc>) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    I::Item: Schedulable,
{
    concepts
        .into_iter()
        .filter(move |concept| is_due(concept.review_state().next_review, now))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptStats {
    pub total: usize,
    pub due: usize,
    pub learned: usize,
}

/// Learned means three or more successful reviews in a row.
pub fn concept_stats<T: Schedulable>(concepts: &[T], now: DateTime<Utc>) -> ConceptStats {
    ConceptStats {
        total: concepts.len(),
        due: filter_due(concepts.iter(), now).count(),
        learned: concepts
            .iter()
            .filter(|c| ReviewPhase::of(c.review_state()).is_learned())
            .count(),
    }
}
