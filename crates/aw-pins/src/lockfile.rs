//! The `actions-lock.json` persisted state (spec §6): mapping
//! `"{owner/repo}@{ref}"` → `{ sha, repo, version }`.

use std::fs;
use std::path::Path;

use aw_core::OrderedMap;
use serde::{Deserialize, Serialize};

use crate::error::PinError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinEntry {
    pub sha: String,
    pub repo: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionsLock {
    #[serde(flatten)]
    entries: OrderedMap<String, PinEntry>,
}

impl ActionsLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, PinError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path).map_err(|e| PinError::LockFileRead(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| PinError::LockFileRead(path.display().to_string(), e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), PinError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PinError::LockFileWrite(path.display().to_string(), e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| PinError::LockFileWrite(path.display().to_string(), e.to_string()))?;
        fs::write(path, content).map_err(|e| PinError::LockFileWrite(path.display().to_string(), e.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&PinEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, entry: PinEntry) {
        self.entries.insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions-lock.json");
        let lock = ActionsLock::load(&path).unwrap();
        assert!(lock.get("actions/checkout@v4").is_none());
    }

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actions-lock.json");
        let mut lock = ActionsLock::new();
        lock.insert(
            "actions/checkout@v4".to_string(),
            PinEntry {
                sha: "f".repeat(40),
                repo: "actions/checkout".to_string(),
                version: "v4".to_string(),
            },
        );
        lock.save(&path).unwrap();
        let loaded = ActionsLock::load(&path).unwrap();
        assert_eq!(loaded.get("actions/checkout@v4").unwrap().sha, "f".repeat(40));
    }
}
