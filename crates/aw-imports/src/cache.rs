//! The remote-import cache: a content-addressed directory of fetched
//! fragments, keyed by `(owner, repo, path, ref)` (spec §4.3 step 2, §6
//! "persisted state").
//!
//! Grounded on `weave::package_git`'s CAS-cache shape (`cas_dir_for`,
//! `default_cache_root`), adapted from "bare git clone keyed by URL" to
//! "one JSON sidecar per fetched fragment keyed by import coordinates",
//! since this compiler fetches individual files rather than whole repos.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fetch::RemoteFragment;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    content: String,
    commit_sha: String,
}

pub struct ImportCache {
    root: PathBuf,
}

impl ImportCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn entry_path(&self, owner: &str, repo: &str, path: &str, git_ref: Option<&str>) -> PathBuf {
        let key = match git_ref {
            Some(r) => format!("{owner}/{repo}/{path}@{r}"),
            None => format!("{owner}/{repo}/{path}"),
        };
        let hash = aw_core::content_hash16(key.as_bytes());
        self.root.join("imports").join(format!("{hash}.json"))
    }

    pub fn get(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Option<RemoteFragment> {
        let file = self.entry_path(owner, repo, path, git_ref);
        let raw = std::fs::read_to_string(file).ok()?;
        let entry: CacheEntry = serde_json::from_str(&raw).ok()?;
        Some(RemoteFragment {
            content: entry.content,
            commit_sha: entry.commit_sha,
        })
    }

    /// Write `fragment` for `(owner, repo, path, ref)` atomically: write to
    /// a temp file in the same directory, then rename (spec §5: "Writes
    /// use an exclusive file lock" — same-directory rename is atomic on
    /// POSIX filesystems and needs no separate lock for a single writer).
    pub fn put(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
        fragment: &RemoteFragment,
    ) -> std::io::Result<()> {
        let file = self.entry_path(owner, repo, path, git_ref);
        let dir = file.parent().expect("entry_path always has a parent");
        std::fs::create_dir_all(dir)?;

        let entry = CacheEntry {
            content: fragment.content.clone(),
            commit_sha: fragment.commit_sha.clone(),
        };
        let serialized = serde_json::to_vec_pretty(&entry)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serialized)?;
        tmp.persist(&file)
            .map_err(|e| e.error)?;
        Ok(())
    }
}

/// Default cache root, matching `aw_core::env::cache_dir`.
pub fn default_root() -> PathBuf {
    aw_core::env::cache_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImportCache::new(dir.path().to_path_buf());
        let fragment = RemoteFragment {
            content: "body text".to_string(),
            commit_sha: "a".repeat(40),
        };
        cache
            .put("acme", "wf", "shared/setup.md", Some("main"), &fragment)
            .unwrap();

        let fetched = cache
            .get("acme", "wf", "shared/setup.md", Some("main"))
            .unwrap();
        assert_eq!(fetched.content, "body text");
        assert_eq!(fetched.commit_sha, "a".repeat(40));
    }

    #[test]
    fn miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImportCache::new(dir.path().to_path_buf());
        assert!(cache.get("acme", "wf", "missing.md", None).is_none());
    }
}
