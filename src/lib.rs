pub mod database;
pub mod export;
pub mod models;

pub use database::{ConceptStore, StoreError};
pub use models::{Concept, ConceptStats, NewConcept, ReviewPhase, ReviewState, Scheduler};
