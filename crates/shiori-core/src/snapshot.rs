//! Durable snapshot storage for the favorites collection.
//!
//! The whole collection is written as one JSON document under a fixed
//! file name in the platform data directory, wrapped in a versioned
//! envelope. Reading a missing or malformed snapshot yields an empty
//! collection rather than an error.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ShioriError;
use crate::models::FavoriteItem;

const FILE_NAME: &str = "favorites.json";

/// Current snapshot schema version. Bump when the envelope layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Versioned on-disk envelope around the favorites array.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    favorites: Vec<FavoriteItem>,
}

/// Destination for favorites snapshots.
///
/// `load` is infallible by contract: any failure to read or decode must
/// degrade to an empty collection on the implementor's side.
pub trait SnapshotSink {
    fn load(&self) -> Vec<FavoriteItem>;
    fn save(&self, items: &[FavoriteItem]) -> Result<(), ShioriError>;
}

/// File-backed snapshot in the platform data directory.
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Snapshot at the default platform location
    /// (`~/.local/share/shiori/favorites.json` or equivalent).
    pub fn default_location() -> Self {
        let path = crate::config::data_dir()
            .map(|dir| dir.join(FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FILE_NAME));
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotSink for JsonSnapshot {
    fn load(&self) -> Vec<FavoriteItem> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            // A missing snapshot is the normal first-run case.
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<SnapshotEnvelope>(&content) {
            Ok(envelope) if envelope.version == SNAPSHOT_VERSION => envelope.favorites,
            Ok(envelope) => {
                tracing::warn!(
                    version = envelope.version,
                    "Unknown favorites snapshot version, starting empty"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Malformed favorites snapshot, starting empty: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[FavoriteItem]) -> Result<(), ShioriError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            favorites: items.to_vec(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory sink for session-only stores and tests.
#[derive(Default)]
pub struct MemorySnapshot {
    items: Mutex<Vec<FavoriteItem>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotSink for MemorySnapshot {
    fn load(&self) -> Vec<FavoriteItem> {
        self.items.lock().expect("snapshot lock poisoned").clone()
    }

    fn save(&self, items: &[FavoriteItem]) -> Result<(), ShioriError> {
        *self.items.lock().expect("snapshot lock poisoned") = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(mal_id: u64, title: &str, added_at: i64) -> FavoriteItem {
        FavoriteItem {
            mal_id,
            title: title.into(),
            image_url: None,
            score: Some(8.5),
            episodes: Some(24),
            kind: Some("TV".into()),
            added_at,
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSnapshot::new(dir.path().join("favorites.json"));

        let items = vec![favorite(5, "Cowboy Bebop", 100), favorite(1, "Test", 200)];
        sink.save(&items).unwrap();

        let loaded = sink.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].mal_id, 5);
        assert_eq!(loaded[0].added_at, 100);
        assert_eq!(loaded[1].title, "Test");
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSnapshot::new(dir.path().join("does-not-exist.json"));
        assert!(sink.load().is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "{ not json").unwrap();

        let sink = JsonSnapshot::new(path);
        assert!(sink.load().is_empty());
    }

    #[test]
    fn test_unknown_version_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, r#"{ "version": 99, "favorites": [] }"#).unwrap();

        let sink = JsonSnapshot::new(path);
        assert!(sink.load().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSnapshot::new(dir.path().join("nested/data/favorites.json"));
        sink.save(&[favorite(1, "A", 1)]).unwrap();
        assert_eq!(sink.load().len(), 1);
    }
}
