use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::summary::SummaryResult;

/// Storage key holding the serialized list
pub const HISTORY_KEY: &str = "text-summaries";

/// Most recent entries kept
pub const HISTORY_CAPACITY: usize = 10;

/// A recorded summary. Never modified once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(flatten)]
    pub result: SummaryResult,
    pub created_date: DateTime<Utc>,
}

/// Where the history list lives between runs.
#[async_trait::async_trait]
pub trait HistoryPort: Send + Sync {
    /// Read the persisted list, newest first. Missing state is an empty list.
    async fn load(&self) -> Result<Vec<HistoryEntry>>;
    async fn save(&self, entries: &[HistoryEntry]) -> Result<()>;
    /// Remove persisted state entirely.
    async fn clear(&self) -> Result<()>;
}

fn decode(raw: &str) -> Result<Vec<HistoryEntry>> {
    serde_json::from_str(raw).context("failed to decode history list")
}

fn encode(entries: &[HistoryEntry]) -> Result<String> {
    serde_json::to_string(entries).context("failed to encode history list")
}

/// Bounded, newest-first log of past summaries.
pub struct HistoryStore {
    port: Arc<dyn HistoryPort>,
}

impl HistoryStore {
    pub fn new(port: Arc<dyn HistoryPort>) -> Self {
        Self { port }
    }

    /// Current entries, newest first. Unreadable state reads as empty.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        match self.port.load().await {
            Ok(mut entries) => {
                entries.truncate(HISTORY_CAPACITY);
                entries
            }
            Err(e) => {
                warn!("history: persisted state unreadable, starting empty: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Prepend `result`, keep the newest `HISTORY_CAPACITY`, persist, return the new entry.
    pub async fn record(&self, result: SummaryResult) -> Result<HistoryEntry> {
        let mut entries = self.list().await;
        let created_date = Utc::now();
        let entry = HistoryEntry {
            id: next_id(created_date, &entries),
            result,
            created_date,
        };

        entries.insert(0, entry.clone());
        if entries.len() > HISTORY_CAPACITY {
            debug!("history: evicting {} oldest entries", entries.len() - HISTORY_CAPACITY);
            entries.truncate(HISTORY_CAPACITY);
        }

        self.port
            .save(&entries)
            .await
            .context("failed to persist history")?;
        info!("history: recorded entry {}", entry.id);
        Ok(entry)
    }

    /// Drop every entry. Irreversible; callers confirm with the user first.
    pub async fn clear(&self) -> Result<()> {
        self.port.clear().await.context("failed to clear history")?;
        info!("history: cleared");
        Ok(())
    }
}

/// Millisecond timestamp id, bumped past the newest existing id on collision.
fn next_id(now: DateTime<Utc>, entries: &[HistoryEntry]) -> String {
    let candidate = now.timestamp_millis();
    let newest = entries.iter().filter_map(|e| e.id.parse::<i64>().ok()).max();
    match newest {
        Some(n) if n >= candidate => (n + 1).to_string(),
        _ => candidate.to_string(),
    }
}

/// In-memory port. Keeps the serialized text so corrupt state can be staged.
#[derive(Default)]
pub struct MemoryHistoryPort {
    raw: Mutex<Option<String>>,
}

impl MemoryHistoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl HistoryPort for MemoryHistoryPort {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let encoded = encode(entries)?;
        let mut guard = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        *guard = Some(encoded);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut guard = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// SQLite-backed key-value port: one row under `HISTORY_KEY`.
pub struct SqliteHistoryPort {
    pool: SqlitePool,
}

impl SqliteHistoryPort {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the key-value table if missing. Idempotent.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to create kv_store table")?;
        Ok(())
    }

    /// Overwrite the stored value verbatim.
    pub async fn put_raw(&self, raw: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)")
            .bind(HISTORY_KEY)
            .bind(raw)
            .execute(&self.pool)
            .await
            .context("failed to write history")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl HistoryPort for SqliteHistoryPort {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let raw = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(HISTORY_KEY)
            .fetch_optional(&self.pool)
            .await
            .context("failed to read history")?;

        match raw {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let encoded = encode(entries)?;
        self.put_raw(&encoded).await
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(HISTORY_KEY)
            .execute(&self.pool)
            .await
            .context("failed to delete history")?;
        Ok(())
    }
}
