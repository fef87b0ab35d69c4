use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::{bookmaker::RawRecord, config::SnapshotConfig, error::StoreError};

/// Read-only source of pre-fetched bookmaker snapshots.
pub trait SnapshotStore: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, bookmaker: &str) -> Result<Vec<RawRecord>, StoreError>;
}

/// Snapshots stored as one JSON array of flat objects per bookmaker.
pub struct JsonFileStore {
    config: SnapshotConfig,
}

impl JsonFileStore {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    pub fn path_for(&self, bookmaker: &str) -> PathBuf {
        self.config.path_for(bookmaker)
    }
}

impl SnapshotStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn fetch(&self, bookmaker: &str) -> Result<Vec<RawRecord>, StoreError> {
        let path = self.path_for(bookmaker);
        debug!("Reading {} snapshot from {}", bookmaker, path.display());

        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(bookmaker.to_string()),
            _ => StoreError::Io {
                bookmaker: bookmaker.to_string(),
                source: e,
            },
        })?;

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
            bookmaker: bookmaker.to_string(),
            source: e,
        })
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    snapshots: HashMap<String, Vec<RawRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bookmaker: impl Into<String>, records: Vec<RawRecord>) {
        self.snapshots.insert(bookmaker.into(), records);
    }
}

impl SnapshotStore for InMemoryStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn fetch(&self, bookmaker: &str) -> Result<Vec<RawRecord>, StoreError> {
        self.snapshots
            .get(bookmaker)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(bookmaker.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("surebet_store_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn create_test_store(dir: &PathBuf) -> JsonFileStore {
        JsonFileStore::new(SnapshotConfig {
            base_path: dir.to_string_lossy().to_string(),
            files: HashMap::new(),
        })
    }

    #[test]
    fn test_fetch_reads_json_array() {
        let dir = temp_dir();
        std::fs::write(
            dir.join("pregame_fonbet.json"),
            json!([{"home_team": "AEK", "fonbet_odds": 1.8}]).to_string(),
        )
        .unwrap();

        let records = create_test_store(&dir).fetch("fonbet").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["home_team"], json!("AEK"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_fetch_missing_file_is_not_found() {
        let dir = temp_dir();
        let err = create_test_store(&dir).fetch("novibet").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref b) if b == "novibet"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_fetch_rejects_non_array_payload() {
        let dir = temp_dir();
        std::fs::write(dir.join("pregame_novibet.json"), r#"{"not": "a list"}"#).unwrap();

        let err = create_test_store(&dir).fetch("novibet").unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_in_memory_store() {
        let mut store = InMemoryStore::new();
        store.insert("stoiximan", vec![]);

        assert!(store.fetch("stoiximan").unwrap().is_empty());
        assert!(matches!(store.fetch("fonbet"), Err(StoreError::NotFound(_))));
    }
}
