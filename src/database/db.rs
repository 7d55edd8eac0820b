//! SQLite persistence for concepts
//!
//! Handles schema creation, CRUD operations for concepts and the
//! read-modify-write cycle that applies an SM-2 review to a stored concept.
//! Timestamps are stored as milliseconds since the Unix epoch (UTC).

use super::error::{Result, StoreError};
use crate::models::sm2::{MAX_QUALITY, MIN_EASINESS, response_to_quality};
use crate::models::{
    Clock, Concept, ConceptStats, NewConcept, ReviewState, Scheduler, SystemClock,
    concept_stats,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info};

const CONCEPT_COLUMNS: &str = "id, title, category, easiness, interval_days, repetitions,
     next_review, last_review, created_at, updated_at";

/// Due first, newest first among equally due concepts.
const CONCEPT_ORDER: &str = "ORDER BY next_review ASC, created_at DESC, id DESC";

/// Concept storage backed by a single SQLite connection.
///
/// Reviews run inside a transaction so a concept is never updated from a
/// stale read.
pub struct ConceptStore<C: Clock = SystemClock> {
    conn: Connection,
    scheduler: Scheduler<C>,
}

impl ConceptStore<SystemClock> {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened concept database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn,
            scheduler: Scheduler::new(SystemClock),
        })
    }
}

impl<C: Clock> ConceptStore<C> {
    /// Replaces the time source used for creation, reviews and due checks.
    pub fn with_clock<D: Clock>(self, clock: D) -> ConceptStore<D> {
        ConceptStore {
            conn: self.conn,
            scheduler: Scheduler::new(clock),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.scheduler.now()
    }

    /// Creates a concept in the initial SM-2 state, due immediately.
    pub fn create_concept(&self, input: &NewConcept) -> Result<Concept> {
        let input = input
            .normalized()
            .ok_or_else(|| StoreError::InvalidInput("title is required".to_string()))?;
        let now = self.now();
        let concept = Concept {
            id: 0,
            title: input.title,
            category: input.category,
            review: ReviewState::new(now),
            created_at: now,
            updated_at: now,
        };

        let id = insert_concept(&self.conn, &concept)?;
        info!(id, title = %concept.title, "concept created");
        Ok(Concept { id, ..concept })
    }

    /// Stores a concept exactly as given (review state and timestamps
    /// included) under a freshly assigned id.
    pub fn import_concept(&self, concept: &Concept) -> Result<Concept> {
        import_one(&self.conn, concept)
    }

    /// Imports all concepts or none: any invalid entry rolls back the batch.
    pub fn import_concepts(&mut self, concepts: &[Concept]) -> Result<Vec<Concept>> {
        let tx = self.conn.transaction()?;
        let imported = concepts
            .iter()
            .map(|concept| import_one(&tx, concept))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;

        info!(count = imported.len(), "concepts imported");
        Ok(imported)
    }

    pub fn get_concept(&self, id: i64) -> Result<Concept> {
        fetch_concept(&self.conn, id)?.ok_or(StoreError::NotFound(id))
    }

    /// All concepts, soonest due first.
    pub fn all_concepts(&self) -> Result<Vec<Concept>> {
        let sql = format!("SELECT {CONCEPT_COLUMNS} FROM concepts {CONCEPT_ORDER}");
        let mut stmt = self.conn.prepare(&sql)?;
        let concepts = stmt
            .query_map([], concept_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(concepts)
    }

    /// Concepts whose next review is at or before now, soonest due first.
    pub fn due_concepts(&self) -> Result<Vec<Concept>> {
        let sql = format!(
            "SELECT {CONCEPT_COLUMNS} FROM concepts WHERE next_review <= ?1 {CONCEPT_ORDER}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let concepts = stmt
            .query_map(params![to_millis(self.now())], concept_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(concepts)
    }

    pub fn delete_concept(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM concepts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(id, "concept deleted");
        Ok(())
    }

    /// Applies a "remembered / not remembered" answer.
    pub fn record_response(&mut self, id: i64, remembered: bool) -> Result<Concept> {
        self.review_concept(id, response_to_quality(remembered))
    }

    /// Grades a concept (0-5), reschedules it and records the review time.
    pub fn review_concept(&mut self, id: i64, quality: u8) -> Result<Concept> {
        if quality > MAX_QUALITY {
            return Err(StoreError::InvalidQuality(quality));
        }
        let tx = self.conn.transaction()?;

        let mut concept = fetch_concept(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        concept.updated_at = self.scheduler.review(&mut concept.review, quality);

        tx.execute(
            "UPDATE concepts
             SET easiness = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4,
                 last_review = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                concept.review.easiness,
                concept.review.interval,
                concept.review.repetitions,
                to_millis(concept.review.next_review),
                concept.review.last_review.map(to_millis),
                to_millis(concept.updated_at),
                id
            ],
        )?;
        tx.commit()?;

        info!(
            id,
            quality,
            interval = concept.review.interval,
            repetitions = concept.review.repetitions,
            easiness = concept.review.easiness,
            "concept reviewed"
        );
        Ok(concept)
    }

    /// Total, due-now and learned counts.
    pub fn stats(&self) -> Result<ConceptStats> {
        Ok(concept_stats(&self.all_concepts()?, self.now()))
    }
}

/// Creates the concepts table if it does not exist yet.
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS concepts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT,
            easiness REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 1,
            repetitions INTEGER NOT NULL DEFAULT 0,
            next_review INTEGER NOT NULL,
            last_review INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_concepts_next_review ON concepts (next_review);",
    )?;
    Ok(())
}

/// Rejects imported concepts whose review state breaks the SM-2 bounds.
fn validate_import(concept: &Concept) -> Result<()> {
    let review = &concept.review;
    let problem = if concept.title.trim().is_empty() {
        "title is required".to_string()
    } else if review.interval == 0 {
        format!("'{}': interval must be at least 1 day", concept.title)
    } else if !review.easiness.is_finite() || review.easiness < MIN_EASINESS {
        format!(
            "'{}': easiness must be at least {MIN_EASINESS}, got {}",
            concept.title, review.easiness
        )
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidInput(problem))
}

fn import_one(conn: &Connection, concept: &Concept) -> Result<Concept> {
    validate_import(concept)?;
    let id = insert_concept(conn, concept)?;
    debug!(id, title = %concept.title, "concept imported");
    Ok(Concept {
        id,
        ..concept.clone()
    })
}

fn insert_concept(conn: &Connection, concept: &Concept) -> Result<i64> {
    conn.execute(
        "INSERT INTO concepts (title, category, easiness, interval_days, repetitions,
                               next_review, last_review, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            concept.title,
            concept.category,
            concept.review.easiness,
            concept.review.interval,
            concept.review.repetitions,
            to_millis(concept.review.next_review),
            concept.review.last_review.map(to_millis),
            to_millis(concept.created_at),
            to_millis(concept.updated_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn fetch_concept(conn: &Connection, id: i64) -> Result<Option<Concept>> {
    let sql = format!("SELECT {CONCEPT_COLUMNS} FROM concepts WHERE id = ?1");
    let concept = conn
        .query_row(&sql, params![id], concept_from_row)
        .optional()?;
    Ok(concept)
}

fn concept_from_row(row: &Row<'_>) -> rusqlite::Result<Concept> {
    Ok(Concept {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        review: ReviewState {
            easiness: row.get(3)?,
            interval: row.get(4)?,
            repetitions: row.get(5)?,
            next_review: timestamp_at(row, 6)?,
            last_review: match row.get::<_, Option<i64>>(7)? {
                Some(millis) => Some(from_millis(7, millis)?),
                None => None,
            },
        },
        created_at: timestamp_at(row, 8)?,
        updated_at: timestamp_at(row, 9)?,
    })
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    from_millis(idx, row.get(idx)?)
}

fn from_millis(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}
