//! JSON import/export for concepts.
//! Concepts are written with their full review state so a backup restores
//! the schedule as well as the titles.

use crate::database::ConceptStore;
use crate::models::{Clock, Concept};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Exports concepts to a JSON file at the specified path.
pub fn export_json_to_path(concepts: &[Concept], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, concepts)
        .with_context(|| format!("writing concepts to {}", path.display()))?;
    writer.flush()?;

    info!(count = concepts.len(), path = %path.display(), "concepts exported");
    Ok(())
}

/// Reads concepts from a JSON file produced by [`export_json_to_path`].
pub fn import_json(path: impl AsRef<Path>) -> Result<Vec<Concept>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let concepts: Vec<Concept> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing concepts from {}", path.display()))?;
    Ok(concepts)
}

/// Imports every concept in the file into `store`, or none if any entry is
/// invalid. Ids are reassigned.
pub fn import_into_store<C: Clock>(
    store: &mut ConceptStore<C>,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let path = path.as_ref();
    let concepts = import_json(path)?;
    let imported = store
        .import_concepts(&concepts)
        .with_context(|| format!("importing concepts from {}", path.display()))?;

    info!(count = imported.len(), path = %path.display(), "import finished");
    Ok(imported.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedClock, NewConcept};
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn test_store() -> ConceptStore<FixedClock> {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        ConceptStore::open_in_memory().unwrap().with_clock(FixedClock(now))
    }

    #[test]
    fn test_export_and_import_keeps_review_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concepts.json");

        let mut source = test_store();
        let id = source
            .create_concept(&NewConcept::new("hello", Some("polish".to_string())))
            .unwrap()
            .id;
        source.create_concept(&NewConcept::new("goodbye", None)).unwrap();
        source.record_response(id, true).unwrap();
        source.record_response(id, true).unwrap();

        let exported = source.all_concepts().unwrap();
        export_json_to_path(&exported, &path).unwrap();

        let mut target = test_store();
        assert_eq!(import_into_store(&mut target, &path).unwrap(), 2);

        let imported = target.all_concepts().unwrap();
        assert_eq!(imported.len(), exported.len());
        for (orig, imp) in exported.iter().zip(imported.iter()) {
            assert_eq!(orig.title, imp.title);
            assert_eq!(orig.category, imp.category);
            assert_eq!(orig.review, imp.review);
        }
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let err = import_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing concepts"));
    }

    #[test]
    fn test_failed_import_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        let source = test_store();
        let good = source.create_concept(&NewConcept::new("x", None)).unwrap();
        let mut blank = good.clone();
        blank.title = " ".to_string();
        export_json_to_path(&[good, blank], &path).unwrap();

        let mut target = test_store();
        assert!(import_into_store(&mut target, &path).is_err());
        assert!(target.all_concepts().unwrap().is_empty());
    }
}
