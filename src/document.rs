//! Stored outline documents
//!
//! An [`OutlineDocument`] is what the persistence side keeps for an outline:
//! a title and the storage markup produced by
//! [`to_storage_format`](crate::storage::to_storage_format). The
//! [`OutlineStore`] trait is the boundary to whatever keeps them;
//! [`JsonFileStore`] keeps one JSON file per outline in a directory.

use crate::error::{Error, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Title given to outlines that were never named.
pub const DEFAULT_TITLE: &str = "Untitled Outline";

/// Application directory name under the platform data directory.
const APP_NAME: &str = "outliner";

/// Subdirectory holding stored outlines.
const OUTLINES_DIR: &str = "outlines";

// ─────────────────────────────────────────────────────────────────────────────
// Outline Document
// ─────────────────────────────────────────────────────────────────────────────

/// A stored outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineDocument {
    /// Store-assigned id, `None` until first saved
    pub id: Option<u64>,
    /// Display title
    pub title: String,
    /// Outline content in storage markup
    pub content: String,
    /// Creation time, seconds since the UNIX epoch
    pub created_at: u64,
    /// Last update time, seconds since the UNIX epoch
    pub updated_at: u64,
}

impl Default for OutlineDocument {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl OutlineDocument {
    /// Create an unsaved document.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: if title.trim().is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title
            },
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Current time in seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Persistence collaborator for outlines.
///
/// Implementations must be shareable across threads: saves run off the
/// editing thread.
pub trait OutlineStore: Send + Sync {
    /// All stored outlines, most recently updated first.
    fn list(&self) -> Result<Vec<OutlineDocument>>;

    /// Load one outline.
    fn load(&self, id: u64) -> Result<OutlineDocument>;

    /// Create or update an outline, returning its id.
    fn save(&self, document: &OutlineDocument) -> Result<u64>;

    /// Delete an outline.
    fn delete(&self, id: u64) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON File Store
// ─────────────────────────────────────────────────────────────────────────────

/// Stores each outline as `<id>.json` in a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes id allocation and writes
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The platform default store directory.
    ///
    /// - **Linux**: `~/.local/share/outliner/outlines/`
    /// - **macOS**: `~/Library/Application Support/outliner/outlines/`
    /// - **Windows**: `%APPDATA%\outliner\outlines\`
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|base| base.join(APP_NAME).join(OUTLINES_DIR))
            .ok_or(Error::ConfigDirNotFound)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn stored_ids(&self) -> Result<Vec<u64>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| Error::FileRead {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn read_document(&self, id: u64) -> Result<OutlineDocument> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::DocumentNotFound(id)
            } else {
                Error::FileRead {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        let mut document: OutlineDocument = serde_json::from_str(&contents)?;
        document.id = Some(id);
        Ok(document)
    }
}

impl OutlineStore for JsonFileStore {
    fn list(&self) -> Result<Vec<OutlineDocument>> {
        let mut documents = Vec::new();
        for id in self.stored_ids()? {
            match self.read_document(id) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping unreadable outline {}: {}", id, e),
            }
        }
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    fn load(&self, id: u64) -> Result<OutlineDocument> {
        debug!("Loading outline {} from {}", id, self.dir.display());
        self.read_document(id)
    }

    fn save(&self, document: &OutlineDocument) -> Result<u64> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Save("store lock poisoned".to_string()))?;

        fs::create_dir_all(&self.dir).map_err(|e| Error::FileWrite {
            path: self.dir.clone(),
            source: e,
        })?;

        let id = match document.id {
            Some(id) => id,
            None => self.stored_ids()?.into_iter().max().unwrap_or(0) + 1,
        };

        let now = now_secs();
        let mut stored = document.clone();
        stored.id = Some(id);
        if stored.created_at == 0 {
            stored.created_at = match document.id {
                Some(id) => self
                    .read_document(id)
                    .map(|existing| existing.created_at)
                    .unwrap_or(now),
                None => now,
            };
        }
        stored.updated_at = now;

        let json = serde_json::to_string_pretty(&stored).map_err(|e| Error::Save(e.to_string()))?;

        // Write next to the target first, then rename over it
        let path = self.path_for(id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json).map_err(|e| Error::FileWrite {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;

        info!("Saved outline '{}' as {}", stored.title, path.display());
        Ok(id)
    }

    fn delete(&self, id: u64) -> Result<()> {
        let path = self.path_for(id);
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::DocumentNotFound(id)
            } else {
                Error::FileWrite {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        info!("Deleted outline {}", id);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(dir.path().join("outlines"));
        (dir, store)
    }

    #[test]
    fn test_blank_title_gets_default() {
        assert_eq!(OutlineDocument::new("  ", "").title, DEFAULT_TITLE);
        assert_eq!(OutlineDocument::new("Plans", "").title, "Plans");
    }

    #[test]
    fn test_save_assigns_ids() {
        let (_dir, store) = store();
        let first = store.save(&OutlineDocument::new("One", "<div>a</div>")).unwrap();
        let second = store.save(&OutlineDocument::new("Two", "<div>b</div>")).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = store();
        let id = store.save(&OutlineDocument::new("Trip", "<div>Pack</div>")).unwrap();
        let loaded = store.load(id).unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.title, "Trip");
        assert_eq!(loaded.content, "<div>Pack</div>");
        assert!(loaded.created_at > 0);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let (_dir, store) = store();
        let id = store.save(&OutlineDocument::new("Trip", "v1")).unwrap();
        let mut doc = store.load(id).unwrap();
        let created = doc.created_at;
        doc.content = "v2".to_string();
        assert_eq!(store.save(&doc).unwrap(), id);

        let loaded = store.load(id).unwrap();
        assert_eq!(loaded.content, "v2");
        assert_eq!(loaded.created_at, created);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_update_without_created_at_keeps_original() {
        let (_dir, store) = store();
        let id = store.save(&OutlineDocument::new("Trip", "v1")).unwrap();
        let created = store.load(id).unwrap().created_at;

        let mut doc = OutlineDocument::new("Trip", "v2");
        doc.id = Some(id);
        store.save(&doc).unwrap();
        assert_eq!(store.load(id).unwrap().created_at, created);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = store();
        assert!(matches!(store.load(42), Err(Error::DocumentNotFound(42))));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        let id = store.save(&OutlineDocument::new("Gone", "")).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(store.load(id), Err(Error::DocumentNotFound(_))));
        assert!(matches!(store.delete(id), Err(Error::DocumentNotFound(_))));
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let (_dir, store) = store();
        store.save(&OutlineDocument::new("Good", "")).unwrap();
        fs::write(store.dir().join("9.json"), "{ not json").unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Good");
    }

    #[test]
    fn test_list_empty_when_dir_missing() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }
}
