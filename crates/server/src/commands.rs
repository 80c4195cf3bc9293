//! Pending-command queue (`comandos-pendentes.json`).
//!
//! An external worker picks commands up from the file; this side only appends
//! and lists. Every read-modify-write happens under one async lock.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use jarvis_api::PendingCommand;
use jarvis_core::json_file;

#[derive(Clone)]
pub struct CommandQueue {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl CommandQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn pending(&self) -> Vec<PendingCommand> {
        let _guard = self.lock.lock().await;
        json_file::load_or_default(&self.path)
    }

    pub async fn push(&self, command: PendingCommand) -> std::io::Result<usize> {
        let _guard = self.lock.lock().await;
        let mut queue: Vec<PendingCommand> = json_file::load_or_default(&self.path);
        queue.push(command);
        json_file::write_atomic(&self.path, &queue)?;
        Ok(queue.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str) -> PendingCommand {
        PendingCommand {
            id: uuid::Uuid::new_v4().to_string(),
            command: name.to_string(),
            args: serde_json::json!({}),
            created_at: "2026-10-19T10:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn concurrent_pushes_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let queue = CommandQueue::new(dir.path().join("comandos-pendentes.json"));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let q = queue.clone();
                tokio::spawn(async move { q.push(command(&format!("cmd-{i}"))).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let pending = queue.pending().await;
        assert_eq!(pending.len(), 16);
    }

    #[tokio::test]
    async fn corrupt_queue_file_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, "not json").unwrap();
        let queue = CommandQueue::new(&path);

        assert!(queue.pending().await.is_empty());
        assert_eq!(queue.push(command("reiniciar")).await.unwrap(), 1);
    }
}
