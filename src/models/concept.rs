//! A concept is a titled item to memorize, optionally grouped by category.
use super::ReviewState;
use super::due::Schedulable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    #[serde(flatten)]
    pub review: ReviewState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedulable for Concept {
    fn review_state(&self) -> &ReviewState {
        &self.review
    }
}

/// Input for creating a concept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewConcept {
    pub title: String,
    pub category: Option<String>,
}

impl NewConcept {
    pub fn new(title: impl Into<String>, category: Option<String>) -> Self {
        Self {
            title: title.into(),
            category,
        }
    }

    /// Trims both fields. Returns `None` when the title is blank; a blank
    /// category becomes `None`.
    pub fn normalized(&self) -> Option<NewConcept> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Some(NewConcept {
            title: title.to_string(),
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalized_trims_fields() {
        let input = NewConcept::new("  Ownership ", Some("  ".to_string()));
        let clean = input.normalized().unwrap();

        assert_eq!(clean.title, "Ownership");
        assert_eq!(clean.category, None);
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(NewConcept::new("   ", Some("rust".to_string())).normalized().is_none());
        assert!(NewConcept::default().normalized().is_none());
    }

    #[test]
    fn test_concept_json_is_flat() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let concept = Concept {
            id: 7,
            title: "Borrowing".to_string(),
            category: Some("rust".to_string()),
            review: ReviewState::new(now),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&concept).unwrap();
        assert_eq!(value["easiness"], 2.5);
        assert_eq!(value["repetitions"], 0);
        assert_eq!(value["title"], "Borrowing");

        let back: Concept = serde_json::from_value(value).unwrap();
        assert_eq!(back, concept);
    }
}
