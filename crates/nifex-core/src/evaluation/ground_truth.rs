//! Ground-truth fixture lookup.
//!
//! Fixtures are named after the exercise id embedded in the uploaded file name:
//! `scan_ex3.pdf` is scored against `<dir>/ex3_ground_truth.json`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::GroundTruthError;
use crate::rules::patterns::EXERCISE_ID;

/// Outcome of a ground-truth lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum GroundTruth {
    /// The reference record.
    Found(Value),
    /// No fixture applies; the reason is meant for display.
    Missing(String),
}

/// Extract the exercise id (`ex` followed by digits) from a file name.
///
/// Matching is case-insensitive and the id is returned lower-cased.
pub fn exercise_id(file_name: &str) -> Option<String> {
    let lowered = file_name.to_lowercase();
    EXERCISE_ID.find(&lowered).map(|m| m.as_str().to_string())
}

/// Directory of `exN_ground_truth.json` fixtures.
#[derive(Debug, Clone)]
pub struct GroundTruthStore {
    dir: PathBuf,
}

impl GroundTruthStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the fixture for an exercise id.
    pub fn path_for(&self, exercise_id: &str) -> PathBuf {
        self.dir.join(format!("{}_ground_truth.json", exercise_id))
    }

    /// Resolve the fixture for an uploaded file name.
    ///
    /// A file name without an exercise id, or an id without a fixture, is not
    /// an error. A fixture that exists but cannot be read or parsed is.
    pub fn lookup(&self, file_name: &str) -> Result<GroundTruth, GroundTruthError> {
        let Some(id) = exercise_id(file_name) else {
            return Ok(GroundTruth::Missing(
                "Could not find exercise number in filename.".to_string(),
            ));
        };

        let path = self.path_for(&id);
        if !path.exists() {
            return Ok(GroundTruth::Missing(format!(
                "Ground truth file not found: {}",
                path.display()
            )));
        }

        debug!("Loading ground truth from {}", path.display());
        load_file(&path).map(GroundTruth::Found)
    }
}

/// Read a JSON fixture from disk.
pub fn load_file(path: &Path) -> Result<Value, GroundTruthError> {
    let content = std::fs::read_to_string(path).map_err(|source| GroundTruthError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| GroundTruthError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_exercise_id() {
        assert_eq!(exercise_id("ex1.pdf"), Some("ex1".to_string()));
        assert_eq!(exercise_id("Scan_EX12_final.JPG"), Some("ex12".to_string()));
        assert_eq!(exercise_id("form.pdf"), None);
        assert_eq!(exercise_id("example.png"), None);
    }

    #[test]
    fn test_lookup_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ex2_ground_truth.json"),
            r#"{"lastName": "כהן", "firstName": "דנה"}"#,
        )
        .unwrap();

        let store = GroundTruthStore::new(dir.path());
        let truth = store.lookup("uploads/EX2.pdf").unwrap();

        assert_eq!(
            truth,
            GroundTruth::Found(json!({"lastName": "כהן", "firstName": "דנה"}))
        );
    }

    #[test]
    fn test_lookup_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ex4_ground_truth.json"),
            r#"{"z": "1", "a": "2"}"#,
        )
        .unwrap();

        let store = GroundTruthStore::new(dir.path());
        let GroundTruth::Found(Value::Object(map)) = store.lookup("ex4.png").unwrap() else {
            panic!("expected a fixture");
        };
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_lookup_without_id() {
        let store = GroundTruthStore::new("does-not-matter");
        let truth = store.lookup("scan.pdf").unwrap();
        assert!(matches!(truth, GroundTruth::Missing(reason) if reason.contains("exercise number")));
    }

    #[test]
    fn test_lookup_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = GroundTruthStore::new(dir.path());

        let truth = store.lookup("ex9.pdf").unwrap();
        assert!(matches!(truth, GroundTruth::Missing(reason) if reason.contains("ex9_ground_truth.json")));
    }

    #[test]
    fn test_lookup_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ex5_ground_truth.json"), "{not json").unwrap();

        let store = GroundTruthStore::new(dir.path());
        let err = store.lookup("ex5.pdf").unwrap_err();
        assert!(matches!(err, GroundTruthError::Parse { .. }));
    }
}
