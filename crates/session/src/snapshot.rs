//! Durable cross-visit session snapshot
//!
//! A single JSON document stored under a fixed key, mirroring the browser
//! local-storage slot it replaces. Snapshots older than the retention window
//! are discarded on load.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;

use leadbot_agent::ConversationState;
use leadbot_core::SessionSnapshot;

use crate::SessionError;

/// Fixed key the snapshot document is stored under
pub const SNAPSHOT_KEY: &str = "leadbot_chat_session";

/// Pluggable snapshot storage backend
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the current snapshot, applying the retention window
    async fn load(&self) -> Result<Option<SessionSnapshot>, SessionError>;

    /// Persist a snapshot
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError>;

    /// Remove any stored snapshot
    async fn clear(&self) -> Result<(), SessionError>;
}

/// File-backed snapshot store
pub struct FileSnapshotStore {
    path: PathBuf,
    retention: Duration,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            path: path.into(),
            retention: Duration::days(i64::from(retention_days)),
        }
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document: serde_json::Value = serde_json::from_str(&raw)?;
        let Some(entry) = document.get(SNAPSHOT_KEY) else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = serde_json::from_value(entry.clone())?;

        if Utc::now() - snapshot.last_visit > self.retention {
            tracing::debug!(
                last_visit = %snapshot.last_visit,
                "discarding stale session snapshot"
            );
            self.clear().await?;
            return Ok(None);
        }

        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let document = json!({ SNAPSHOT_KEY: snapshot });
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&document)?).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Project a conversation state into its durable snapshot
pub fn snapshot_of(state: &ConversationState, visit_count: u32) -> SessionSnapshot {
    SessionSnapshot {
        contact_info: state.contact_info.clone(),
        services_discussed: state.services_discussed.clone(),
        pain_points: state.pain_points.clone(),
        stage: state.stage,
        last_visit: Utc::now(),
        visit_count,
    }
}

/// Load the snapshot for a returning visitor, bumping the visit counter.
///
/// Best-effort: storage failures are logged and yield None.
pub async fn record_visit(store: &dyn SnapshotStore) -> Option<SessionSnapshot> {
    let snapshot = match store.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "snapshot load failed");
            return None;
        }
    };

    let mut snapshot = snapshot?;
    snapshot.visit_count += 1;
    snapshot.last_visit = Utc::now();
    if let Err(e) = store.save(&snapshot).await {
        tracing::warn!(error = %e, "snapshot save failed");
    }
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir, retention_days: u32) -> FileSnapshotStore {
        FileSnapshotStore::new(dir.path().join("session.json"), retention_days)
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir, 30).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 30);

        let snapshot = SessionSnapshot::new(Utc::now());
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.visit_count, 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 30);

        let snapshot = SessionSnapshot::new(Utc::now() - Duration::days(45));
        store.save(&snapshot).await.unwrap();

        assert!(store.load().await.unwrap().is_none());
        // The stale document was removed, not just skipped
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_visit_bumps_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 30);

        store.save(&SessionSnapshot::new(Utc::now())).await.unwrap();

        let snapshot = record_visit(&store).await.unwrap();
        assert_eq!(snapshot.visit_count, 2);

        let snapshot = record_visit(&store).await.unwrap();
        assert_eq!(snapshot.visit_count, 3);
    }

    #[tokio::test]
    async fn test_record_visit_with_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        assert!(record_visit(&store(&dir, 30)).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 30);
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
