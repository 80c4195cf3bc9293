//! One JSON array file per record collection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::Mutex;

use jarvis_core::json_file;

/// A `Vec<T>` persisted at `path`. A missing or corrupt file reads as empty.
///
/// Reads and writes go through one async lock, so a `modify` never loses a
/// concurrent `push`.
pub struct JsonStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub async fn load(&self) -> Vec<T> {
        let _guard = self.lock.lock().await;
        json_file::load_or_default(&self.path)
    }

    pub async fn push(&self, record: T) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;
        let mut records: Vec<T> = json_file::load_or_default(&self.path);
        records.push(record);
        json_file::write_atomic(&self.path, &records)
    }

    /// Run `f` over the records and persist them if it succeeds.
    pub async fn modify<R, E>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<std::io::Error>,
    {
        let _guard = self.lock.lock().await;
        let mut records: Vec<T> = json_file::load_or_default(&self.path);
        let out = f(&mut records)?;
        json_file::write_atomic(&self.path, &records)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn concurrent_pushes_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::<u32>::new(dir.path().join("n.json")));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.push(i).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let mut all = store.load().await;
        all.sort();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failed_modify_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<String>::new(dir.path().join("s.json"));
        store.push("kept".into()).await.unwrap();

        let result: Result<(), std::io::Error> = store
            .modify(|records| {
                records.clear();
                Err(std::io::Error::other("nope"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.load().await, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonStore::<String>::new(&path);
        assert!(store.load().await.is_empty());

        store.push("fresh".into()).await.unwrap();
        assert_eq!(store.load().await.len(), 1);
    }
}
