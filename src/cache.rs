use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::config::config_directory;
use crate::domain::change::{ChangeSummary, HandoffDraft};
use crate::error::{AppError, AppResult};

const CACHE_FILE_NAME: &str = "draft_cache.json";
const CACHE_LIMIT: usize = 32;

#[derive(Default, Serialize, Deserialize)]
struct CacheFile {
    entries: Vec<CacheEntry>,
}

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    key: String,
    draft: HandoffDraft,
}

/// Language-model drafts keyed by the change they describe.
pub struct HandoffDraftCache {
    file_path: PathBuf,
    file: CacheFile,
}

impl HandoffDraftCache {
    pub fn load() -> AppResult<Self> {
        Self::load_from(config_directory()?.join(CACHE_FILE_NAME))
    }

    pub fn load_from(path: PathBuf) -> AppResult<Self> {
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<CacheFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid cache file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn get(&self, key: &str) -> Option<HandoffDraft> {
        self.file
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.draft.clone())
    }

    pub fn insert(&mut self, key: String, draft: &HandoffDraft) {
        self.file.entries.retain(|entry| entry.key != key);
        self.file.entries.push(CacheEntry {
            key,
            draft: draft.clone(),
        });

        if self.file.entries.len() > CACHE_LIMIT {
            let overflow = self.file.entries.len() - CACHE_LIMIT;
            self.file.entries.drain(0..overflow);
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write cache: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    pub fn compute_key(changes: &ChangeSummary, ticket: Option<&str>) -> String {
        let mut hasher = Hasher::new();
        hasher.update(changes.diff.as_bytes());
        hasher.update(changes.files_changed.to_string().as_bytes());
        if let Some(ticket) = ticket {
            hasher.update(ticket.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn draft(n: usize) -> HandoffDraft {
        HandoffDraft {
            commit_message: format!("chore: bump {n}"),
            branch_summary: format!("bump {n}"),
            pr_summary: String::new(),
        }
    }

    fn changes(diff: &str) -> ChangeSummary {
        ChangeSummary {
            files_changed: 1,
            summary: String::new(),
            diff: diff.to_string(),
        }
    }

    #[test]
    fn key_depends_on_diff_and_ticket() {
        let a = HandoffDraftCache::compute_key(&changes("+a"), Some("HG-1"));
        assert_eq!(a, HandoffDraftCache::compute_key(&changes("+a"), Some("HG-1")));
        assert_ne!(a, HandoffDraftCache::compute_key(&changes("+b"), Some("HG-1")));
        assert_ne!(a, HandoffDraftCache::compute_key(&changes("+a"), None));
    }

    #[test]
    fn persists_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);

        let mut cache = HandoffDraftCache::load_from(path.clone()).unwrap();
        assert!(cache.get("k").is_none());
        cache.insert("k".to_string(), &draft(1));
        cache.save().unwrap();

        let reloaded = HandoffDraftCache::load_from(path).unwrap();
        assert_eq!(reloaded.get("k"), Some(draft(1)));
    }

    #[test]
    fn evicts_oldest_entries() {
        let dir = TempDir::new().unwrap();
        let mut cache = HandoffDraftCache::load_from(dir.path().join(CACHE_FILE_NAME)).unwrap();
        for n in 0..CACHE_LIMIT + 2 {
            cache.insert(format!("k{n}"), &draft(n));
        }
        assert!(cache.get("k0").is_none());
        assert!(cache.get("k1").is_none());
        assert_eq!(cache.get("k2"), Some(draft(2)));
        assert_eq!(cache.file.entries.len(), CACHE_LIMIT);
    }
}
