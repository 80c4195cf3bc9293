//! Assistant memory: scored recall over a JSON-backed list of entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::json_file;
use crate::text::fold;

pub const DEFAULT_RECALL_LIMIT: usize = 10;
pub const MAX_RECALL_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("memory file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("memory content must not be empty")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Conversation,
    Fact,
    Preference,
    Task,
}

impl MemoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conversation" => Some(Self::Conversation),
            "fact" => Some(Self::Fact),
            "preference" => Some(Self::Preference),
            "task" => Some(Self::Task),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    pub id: String,
    pub kind: MemoryKind,
    pub content: String,
    pub importance: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl MemoryEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Input for [`MemoryStore::add`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewMemory {
    pub kind: MemoryKind,
    pub content: String,
    #[serde(default = "default_importance")]
    pub importance: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_importance() -> f32 {
    0.5
}

#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub kind: Option<MemoryKind>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredMemory {
    #[serde(flatten)]
    pub entry: MemoryEntry,
    pub score: f32,
}

/// Memory entries persisted as a JSON array.
pub struct MemoryStore {
    path: PathBuf,
    entries: Vec<MemoryEntry>,
}

impl MemoryStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = json_file::load_or_default(&path);
        Self { path, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn list(&self) -> &[MemoryEntry] {
        &self.entries
    }

    pub fn add(&mut self, new: NewMemory, now: DateTime<Utc>) -> Result<MemoryEntry, MemoryError> {
        let content = new.content.trim();
        if content.is_empty() {
            return Err(MemoryError::EmptyContent);
        }
        let entry = MemoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            kind: new.kind,
            content: content.to_string(),
            importance: new.importance.clamp(0.0, 1.0),
            tags: normalize_tags(&new.tags),
            created_at: now,
            expires_at: new.expires_at,
        };
        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        self.save(&entries)?;
        self.entries = entries;
        Ok(entry)
    }

    /// Best-scoring live entries for `query`, highest score first.
    pub fn recall(&self, query: &MemoryQuery, now: DateTime<Utc>) -> Vec<ScoredMemory> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_RECALL_LIMIT)
            .clamp(1, MAX_RECALL_LIMIT);
        let tags = normalize_tags(&query.tags);
        let text = query
            .text
            .as_deref()
            .map(fold)
            .filter(|t| !t.trim().is_empty());

        let mut scored: Vec<ScoredMemory> = self
            .entries
            .iter()
            .filter(|e| !e.is_expired(now))
            .filter(|e| query.kind.is_none_or(|k| e.kind == k))
            .map(|e| ScoredMemory {
                score: score(e, &tags, text.as_deref(), now),
                entry: e.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.entry.created_at.cmp(&a.entry.created_at))
        });
        scored.truncate(limit);
        scored
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn clear_expired(&mut self, now: DateTime<Utc>) -> Result<usize, MemoryError> {
        let live: Vec<MemoryEntry> = self
            .entries
            .iter()
            .filter(|e| !e.is_expired(now))
            .cloned()
            .collect();
        let removed = self.entries.len() - live.len();
        if removed > 0 {
            self.save(&live)?;
            self.entries = live;
        }
        Ok(removed)
    }

    /// Entries only replace the in-memory list once they are on disk.
    fn save(&self, entries: &[MemoryEntry]) -> Result<(), MemoryError> {
        json_file::write_atomic(&self.path, entries)?;
        Ok(())
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

fn score(entry: &MemoryEntry, tags: &[String], text: Option<&str>, now: DateTime<Utc>) -> f32 {
    let age_days = (now - entry.created_at).num_seconds().max(0) as f32 / 86_400.0;
    let recency = 1.0 / (1.0 + age_days);

    let tag_overlap = if tags.is_empty() {
        0.0
    } else {
        let shared = tags.iter().filter(|t| entry.tags.contains(t)).count();
        shared as f32 / tags.len() as f32
    };

    let text_match = match text {
        Some(t) if fold(&entry.content).contains(t) => 1.0,
        _ => 0.0,
    };

    0.35 * recency + 0.35 * entry.importance + 0.2 * tag_overlap + 0.1 * text_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fact;
    use chrono::Duration;

    #[test]
    fn add_normalizes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let now = Utc::now();

        let mut store = MemoryStore::open(&path);
        let entry = store
            .add(fact("  Frota tem 12 caminhões ", 3.0, &["Frota", "frota ", ""]), now)
            .unwrap();
        assert_eq!(entry.content, "Frota tem 12 caminhões");
        assert_eq!(entry.importance, 1.0);
        assert_eq!(entry.tags, vec!["frota".to_string()]);

        let reopened = MemoryStore::open(&path);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.list()[0], entry);
    }

    #[test]
    fn add_rejects_blank_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::open(dir.path().join("memory.json"));
        let err = store.add(fact("   ", 0.5, &[]), Utc::now()).unwrap_err();
        assert!(matches!(err, MemoryError::EmptyContent));
    }

    #[test]
    fn failed_save_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file.txt");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut store = MemoryStore::open(blocker.join("memory.json"));
        let err = store.add(fact("Frota tem 12 caminhões", 0.5, &[]), Utc::now()).unwrap_err();
        assert!(matches!(err, MemoryError::Io(_)), "{err:?}");
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(MemoryStore::open(&path).is_empty());
    }

    #[test]
    fn recall_prefers_tag_overlap_and_importance() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let mut store = MemoryStore::open(dir.path().join("memory.json"));
        store.add(fact("preço da soja", 0.2, &["fazenda"]), now).unwrap();
        store.add(fact("revisão dos caminhões", 0.7, &["frota"]), now).unwrap();
        store.add(fact("seguro da frota vence", 0.5, &["frota", "seguro"]), now).unwrap();

        let hits = store.recall(
            &MemoryQuery {
                tags: vec!["frota".into(), "seguro".into()],
                limit: Some(2),
                ..Default::default()
            },
            now,
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.content, "seguro da frota vence");
        assert_eq!(hits[1].entry.content, "revisão dos caminhões");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn recall_rewards_recency_and_text_match() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let mut store = MemoryStore::open(dir.path().join("memory.json"));
        store.add(fact("antigo", 0.5, &[]), now - Duration::days(30)).unwrap();
        store.add(fact("recente", 0.5, &[]), now).unwrap();
        store
            .add(fact("Licitação aberta", 0.5, &[]), now - Duration::hours(1))
            .unwrap();

        let by_recency = store.recall(&MemoryQuery::default(), now);
        assert_eq!(by_recency[0].entry.content, "recente");

        let by_text = store.recall(
            &MemoryQuery {
                text: Some("licitacao".into()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(by_text[0].entry.content, "Licitação aberta");
    }

    #[test]
    fn expired_entries_are_hidden_then_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let mut store = MemoryStore::open(dir.path().join("memory.json"));
        let mut expiring = fact("lembrete de ontem", 0.9, &[]);
        expiring.expires_at = Some(now - Duration::hours(1));
        store.add(expiring, now - Duration::days(1)).unwrap();
        store.add(fact("permanente", 0.1, &[]), now).unwrap();

        let hits = store.recall(&MemoryQuery::default(), now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.content, "permanente");

        assert_eq!(store.clear_expired(now).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.clear_expired(now).unwrap(), 0);
    }

    #[test]
    fn recall_filters_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let mut store = MemoryStore::open(dir.path().join("memory.json"));
        store.add(fact("um fato", 0.5, &[]), now).unwrap();
        let mut pref = fact("prefere respostas curtas", 0.5, &[]);
        pref.kind = MemoryKind::Preference;
        store.add(pref, now).unwrap();

        let hits = store.recall(
            &MemoryQuery {
                kind: Some(MemoryKind::Preference),
                ..Default::default()
            },
            now,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.kind, MemoryKind::Preference);
    }
}
