// cafe-client/src/storage.rs
// 本地存储 - JSON 文件键值对 (浏览器 localStorage 语义: 字符串值)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Default storage file name
pub const STORAGE_FILE: &str = "local_storage.json";

/// Persistent string key/value store
///
/// Every write is flushed to disk before the in-memory map changes, so a
/// failed write leaves both untouched. Clones share the same map.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl LocalStorage {
    /// 打开存储 (文件不存在或损坏时从空开始)
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(STORAGE_FILE);
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self {
            path: Some(path),
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// 仅内存存储 (不落盘)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> std::io::Result<()> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.into());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> std::io::Result<()> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// 获取路径
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path());
        storage.set("isDarkTheme", "true").unwrap();
        storage.set("loginTime", "1700000000000").unwrap();
        storage.remove("loginTime").unwrap();

        let reopened = LocalStorage::open(dir.path());
        assert_eq!(reopened.get("isDarkTheme").as_deref(), Some("true"));
        assert!(!reopened.contains("loginTime"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORAGE_FILE), "{not json").unwrap();
        let storage = LocalStorage::open(dir.path());
        assert!(storage.get("isAdminLoggedIn").is_none());
    }

    #[test]
    fn test_failed_flush_keeps_old_value() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the storage directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let storage = LocalStorage::open(&blocker);

        assert!(storage.set("isDarkTheme", "true").is_err());
        assert!(storage.get("isDarkTheme").is_none());
    }
}
