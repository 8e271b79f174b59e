use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ProcessConfig;
use crate::pipeline::stats::Statistics;

/// Metadata record for one completed run. Written to the history once the
/// artifacts are uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub settings: ProcessConfig,
    pub beats_url: String,
    pub markers_url: String,
    pub beats_count: usize,
    pub duration_seconds: f32,
    pub avg_spacing: f32,
    pub created_at: String,
}

impl ProcessRecord {
    pub fn new(
        user_id: &str,
        file_name: &str,
        settings: ProcessConfig,
        stats: &Statistics,
        duration_seconds: f32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            file_name: file_name.to_string(),
            settings,
            beats_url: String::new(),
            markers_url: String::new(),
            beats_count: stats.count,
            duration_seconds,
            avg_spacing: stats.avg_spacing,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn beats_key(&self) -> String {
        format!("{}/{}_beats.txt", self.user_id, self.id)
    }

    pub fn markers_key(&self) -> String {
        format!("{}/{}_markers.edl", self.user_id, self.id)
    }
}

/// Persistence collaborator for artifacts and history. Injected into the
/// application instead of living as ambient global state.
pub trait Store {
    /// Write artifact bytes under `key`, returning a URL/path to them.
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<String>;
    /// Append a record to the history.
    fn insert(&self, record: &ProcessRecord) -> Result<()>;
    /// All records for one user, newest first.
    fn query(&self, user_id: &str) -> Result<Vec<ProcessRecord>>;
    /// Remove artifacts by key. Missing keys are not an error.
    fn delete(&self, keys: &[String]) -> Result<()>;
    /// Remove one user's record by id. Returns whether a record matched.
    fn remove_record(&self, user_id: &str, id: &str) -> Result<bool>;
}

/// Local filesystem store: artifacts under `<root>/files/`, history as a JSON
/// document at `<root>/history.json`.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root.join("files"))
            .with_context(|| format!("Failed to create store at {}", root.display()))?;
        Ok(Self { root: root.to_path_buf() })
    }

    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("beatmark"))
            .unwrap_or_else(|| PathBuf::from(".beatmark"))
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("history.json")
    }

    fn read_history(&self) -> Result<Vec<ProcessRecord>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).context("Corrupt history file")
    }

    fn write_history(&self, records: &[ProcessRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(self.history_path(), content)
            .with_context(|| format!("Failed to write {}", self.history_path().display()))
    }
}

impl Store for FsStore {
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let path = self.root.join("files").join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write artifact {}", path.display()))?;
        Ok(path.display().to_string())
    }

    fn insert(&self, record: &ProcessRecord) -> Result<()> {
        let mut records = self.read_history()?;
        records.push(record.clone());
        self.write_history(&records)
    }

    fn query(&self, user_id: &str) -> Result<Vec<ProcessRecord>> {
        let mut records: Vec<ProcessRecord> = self
            .read_history()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn delete(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            let path = self.root.join("files").join(key);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    // record deletion still proceeds when a file is stuck
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                }
            }
        }
        Ok(())
    }

    fn remove_record(&self, user_id: &str, id: &str) -> Result<bool> {
        let mut records = self.read_history()?;
        let before = records.len();
        records.retain(|r| !(r.user_id == user_id && r.id == id));
        if records.len() == before {
            return Ok(false);
        }
        self.write_history(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str) -> ProcessRecord {
        ProcessRecord::new(
            user,
            "song.mp3",
            ProcessConfig::default(),
            &Statistics {
                count: 3,
                avg_spacing: 1.5,
                min_spacing: 1.0,
                max_spacing: 2.0,
            },
            180.0,
        )
    }

    #[test]
    fn upload_writes_under_files_and_returns_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path()).unwrap();
        let url = store.upload("alice/run_beats.txt", b"00:00:000").unwrap();
        assert!(url.contains("files"));
        assert_eq!(std::fs::read_to_string(&url).unwrap(), "00:00:000");
    }

    #[test]
    fn insert_then_query_round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path()).unwrap();

        let rec = record("alice");
        store.insert(&rec).unwrap();
        store.insert(&record("bob")).unwrap();

        let mine = store.query("alice").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, rec.id);
        assert_eq!(mine[0].beats_count, 3);
        assert_eq!(mine[0].settings.fps, 30);
    }

    #[test]
    fn query_returns_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path()).unwrap();

        let mut old = record("alice");
        old.created_at = "2026-01-01T00:00:00+00:00".into();
        let mut new = record("alice");
        new.created_at = "2026-06-01T00:00:00+00:00".into();
        store.insert(&old).unwrap();
        store.insert(&new).unwrap();

        let records = store.query("alice").unwrap();
        assert_eq!(records[0].id, new.id);
        assert_eq!(records[1].id, old.id);
    }

    #[test]
    fn delete_ignores_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path()).unwrap();
        store.delete(&["nobody/nothing.txt".to_string()]).unwrap();
    }

    #[test]
    fn remove_record_checks_ownership() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path()).unwrap();
        let rec = record("alice");
        store.insert(&rec).unwrap();

        assert!(!store.remove_record("mallory", &rec.id).unwrap());
        assert_eq!(store.query("alice").unwrap().len(), 1);

        assert!(store.remove_record("alice", &rec.id).unwrap());
        assert!(store.query("alice").unwrap().is_empty());
    }

    #[test]
    fn artifact_keys_follow_the_user_id_layout() {
        let rec = record("alice");
        assert_eq!(rec.beats_key(), format!("alice/{}_beats.txt", rec.id));
        assert_eq!(rec.markers_key(), format!("alice/{}_markers.edl", rec.id));
    }
}
