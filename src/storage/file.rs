//! File-backed slot storage
//!
//! Each slot lives in `{dir}/{key}.json`. Reads take a shared lock. Writers
//! hold `{key}.lock` exclusively and fill a temp file of their own before
//! renaming it over the slot, so nobody sees a half-written list.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;

use super::slot::{check_quota, PersistenceError, SlotStore};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Slot store writing one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    max_bytes: Option<usize>,
}

impl FileStore {
    /// Creates a store rooted at `dir` with no quota
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: None,
        }
    }

    /// Limits every slot file to `max_bytes`
    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Returns the directory holding the slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn validate_key(key: &str) -> Result<(), String> {
        if key.is_empty() {
            return Err("slot key is empty".to_string());
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err("slot key must be a plain file name".to_string());
        }
        Ok(())
    }

    fn write_atomic(&self, key: &str, path: &Path, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Writers queue on a lock file that is never renamed
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(format!("{}.lock", key)))?;
        lock.lock_exclusive()?;

        // Each writer fills its own temp file
        let temp_path = self.dir.join(format!(
            "{}.{}.{}.tmp",
            key,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let written = write_temp(&temp_path, value).and_then(|()| fs::rename(&temp_path, path));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        // Lock is released when `lock` is dropped
        written
    }
}

fn write_temp(path: &Path, value: &str) -> std::io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;

    let mut writer = BufWriter::new(&file);
    writer.write_all(value.as_bytes())?;
    writer.flush()?;
    drop(writer);

    file.sync_all()
}

impl SlotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::validate_key(key).map_err(|e| PersistenceError::read(key, e))?;

        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path).map_err(|e| {
            PersistenceError::read(key, format!("failed to open {}: {}", path.display(), e))
        })?;

        file.lock_shared()
            .map_err(|e| PersistenceError::read(key, format!("failed to acquire read lock: {}", e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|e| {
            PersistenceError::read(key, format!("failed to read {}: {}", path.display(), e))
        })?;

        // Lock is released when file is dropped
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::validate_key(key).map_err(|e| PersistenceError::write(key, e))?;
        check_quota(key, value, self.max_bytes)?;

        let path = self.path_for(key);
        self.write_atomic(key, &path, value).map_err(|e| {
            PersistenceError::write(key, format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::STORAGE_KEY;
    use tempfile::TempDir;

    #[test]
    fn read_missing_slot() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn write_and_read_slot() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());

        store.write(STORAGE_KEY, r#"[{"id":1}]"#).unwrap();

        assert_eq!(
            store.read(STORAGE_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(dir.path().join("todos_v1.json").is_file());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("dir"));

        store.write(STORAGE_KEY, "[]").unwrap();

        assert!(store.path_for(STORAGE_KEY).exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());

        store.write(STORAGE_KEY, "[]").unwrap();

        // No temp files are left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn concurrent_writers_never_leave_a_partial_slot() {
        let dir = TempDir::new().unwrap();
        let payloads: Vec<String> = (0..8)
            .map(|i| format!("[{}]", vec![i.to_string(); 20_000].join(",")))
            .collect();

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let mut store = FileStore::new(dir.path());
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        store.write(STORAGE_KEY, &payload).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = FileStore::new(dir.path()).read(STORAGE_KEY).unwrap().unwrap();
        assert!(payloads.contains(&stored));
    }

    #[test]
    fn quota_exceeded_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path()).with_quota(8);

        store.write(STORAGE_KEY, "[]").unwrap();
        let err = store.write(STORAGE_KEY, "[1,2,3,4,5]").unwrap_err();

        assert!(err.is_write());
        assert_eq!(store.read(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());

        assert!(store.write("../escape", "[]").unwrap_err().is_write());
        assert!(store.read("a/b").unwrap_err().is_read());
        assert!(store.read("").unwrap_err().is_read());
    }

    #[test]
    fn unwritable_directory_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a dir").unwrap();

        let mut store = FileStore::new(&blocker);
        assert!(store.write(STORAGE_KEY, "[]").unwrap_err().is_write());
    }
}
