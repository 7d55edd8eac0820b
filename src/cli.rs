//! Command-line interface: argument parsing and command execution.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use concept_review::export::json::{export_json_to_path, import_into_store};
use concept_review::models::{Clock, Concept, NewConcept, ReviewPhase};
use concept_review::{ConceptStore, models::is_due};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "concepts", version, about = "Spaced-repetition tracker for concepts")]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "CONCEPTS_DB", default_value = "concepts.sqlite3")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a concept to memorize
    Add {
        title: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// List all concepts, soonest due first
    List,

    /// List concepts due for review now
    Due,

    /// Record a review of a concept
    Review {
        id: i64,

        /// The concept was not remembered
        #[arg(long, conflicts_with = "quality")]
        forgot: bool,

        /// Explicit recall quality (0 = blackout, 5 = perfect)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
        quality: Option<u8>,
    },

    /// Delete a concept
    Delete { id: i64 },

    /// Show total, due and learned counts
    Stats,

    /// Export all concepts to a JSON file
    Export { path: PathBuf },

    /// Import concepts from a JSON file
    Import { path: PathBuf },
}

pub fn execute<C: Clock>(
    command: Commands,
    store: &mut ConceptStore<C>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Add { title, category } => {
            let concept = store.create_concept(&NewConcept::new(title, category))?;
            writeln!(out, "Added concept {} '{}'", concept.id, concept.title)?;
        }
        Commands::List => {
            let now = store.now();
            for concept in store.all_concepts()? {
                writeln!(out, "{}", format_concept(&concept, now))?;
            }
        }
        Commands::Due => {
            let now = store.now();
            let due = store.due_concepts()?;
            if due.is_empty() {
                writeln!(out, "Nothing due. All caught up!")?;
            }
            for concept in due {
                writeln!(out, "{}", format_concept(&concept, now))?;
            }
        }
        Commands::Review {
            id,
            forgot,
            quality,
        } => {
            let concept = match quality {
                Some(quality) => store.review_concept(id, quality)?,
                None => store.record_response(id, !forgot)?,
            };
            writeln!(
                out,
                "'{}' next review {} (in {} day{})",
                concept.title,
                format_date(concept.review.next_review),
                concept.review.interval,
                if concept.review.interval == 1 { "" } else { "s" }
            )?;
        }
        Commands::Delete { id } => {
            store.delete_concept(id)?;
            writeln!(out, "Deleted concept {id}")?;
        }
        Commands::Stats => {
            let stats = store.stats()?;
            writeln!(out, "Total:   {}", stats.total)?;
            writeln!(out, "Due now: {}", stats.due)?;
            writeln!(out, "Learned: {}", stats.learned)?;
        }
        Commands::Export { path } => {
            let concepts = store.all_concepts()?;
            export_json_to_path(&concepts, &path)?;
            writeln!(out, "Exported {} concepts to {}", concepts.len(), path.display())?;
        }
        Commands::Import { path } => {
            let count = import_into_store(store, &path)?;
            writeln!(out, "Imported {count} concepts from {}", path.display())?;
        }
    }
    Ok(())
}

/// Formats a timestamp as a local YYYY-MM-DD string
fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn format_concept(concept: &Concept, now: DateTime<Utc>) -> String {
    let marker = if is_due(concept.review.next_review, now) {
        "*"
    } else {
        " "
    };
    let category = concept
        .category
        .as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default();
    format!(
        "{marker} {:>4}  {}{}  next {}  {:?}",
        concept.id,
        concept.title,
        category,
        format_date(concept.review.next_review),
        ReviewPhase::of(&concept.review)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use concept_review::models::FixedClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    fn run(store: &mut ConceptStore<FixedClock>, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("concepts").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        execute(cli.command, store, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_add_review_stats_flow() {
        let mut store = ConceptStore::open_in_memory()
            .unwrap()
            .with_clock(FixedClock(start()));

        let added = run(&mut store, &["add", "Ownership", "--category", "rust"]).unwrap();
        assert!(added.contains("Added concept 1 'Ownership'"));
        run(&mut store, &["add", "Borrowing"]).unwrap();

        let due = run(&mut store, &["due"]).unwrap();
        assert_eq!(due.lines().count(), 2);
        assert!(due.contains("[rust]"));

        let reviewed = run(&mut store, &["review", "1"]).unwrap();
        assert!(reviewed.contains("in 1 day)"));
        let reviewed = run(&mut store, &["review", "1", "--quality", "5"]).unwrap();
        assert!(reviewed.contains("in 6 days)"));

        let stats = run(&mut store, &["stats"]).unwrap();
        assert!(stats.contains("Total:   2"));
        assert!(stats.contains("Due now: 1"));
        assert!(stats.contains("Learned: 0"));
    }

    #[test]
    fn test_forgot_resets_streak() {
        let mut store = ConceptStore::open_in_memory()
            .unwrap()
            .with_clock(FixedClock(start()));
        run(&mut store, &["add", "Send and Sync"]).unwrap();
        run(&mut store, &["review", "1"]).unwrap();
        run(&mut store, &["review", "1", "--forgot"]).unwrap();

        let concept = store.get_concept(1).unwrap();
        assert_eq!(concept.review.repetitions, 0);
        assert_eq!(ReviewPhase::of(&concept.review), ReviewPhase::Lapsed);

        let mut store = store.with_clock(FixedClock(start() + Duration::days(1)));
        let due = run(&mut store, &["due"]).unwrap();
        assert!(due.contains("Send and Sync"));
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        let mut store = ConceptStore::open_in_memory()
            .unwrap()
            .with_clock(FixedClock(start()));
        assert!(run(&mut store, &["review", "1", "--quality", "6"]).is_err());
        assert!(run(&mut store, &["review", "1", "--quality", "3", "--forgot"]).is_err());
        assert!(run(&mut store, &["delete", "42"]).is_err());
        assert_eq!(run(&mut store, &["due"]).unwrap(), "Nothing due. All caught up!\n");
    }
}
