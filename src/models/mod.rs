pub mod clock;
pub mod concept;
pub mod due;
pub mod phase;
pub mod review_state;
pub mod sm2;

pub use clock::{Clock, FixedClock, Scheduler, SystemClock};
pub use concept::{Concept, NewConcept};
pub use due::{ConceptStats, Schedulable, concept_stats, filter_due, is_due};
pub use phase::ReviewPhase;
pub use review_state::ReviewState;
pub use sm2::{NextReview, calculate_next_review, response_to_quality};
