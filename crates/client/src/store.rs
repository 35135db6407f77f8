//! Credential persistence abstraction.
//!
//! The client reads the access credential on every outgoing request and
//! writes both credentials back after login, refresh, and logout. The store
//! is injected so tests can substitute an in-memory fake without touching
//! any durable storage.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which of the two persisted credential slots to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Short-lived bearer token attached to API calls.
    Access,
    /// Longer-lived token exchangeable for a new access credential.
    Refresh,
}

/// Process-wide holder of the two credential strings.
///
/// A pure key-value surface: no error conditions. Concurrent writers
/// resolve by last-write-wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, kind: CredentialKind) -> Option<String>;
    async fn set(&self, kind: CredentialKind, value: &str);
    async fn clear(&self, kind: CredentialKind);
}

#[derive(Debug, Default, Clone)]
struct Slots {
    access: Option<String>,
    refresh: Option<String>,
}

impl Slots {
    fn slot(&self, kind: CredentialKind) -> &Option<String> {
        match kind {
            CredentialKind::Access => &self.access,
            CredentialKind::Refresh => &self.refresh,
        }
    }

    fn slot_mut(&mut self, kind: CredentialKind) -> &mut Option<String> {
        match kind {
            CredentialKind::Access => &mut self.access,
            CredentialKind::Refresh => &mut self.refresh,
        }
    }
}

/// In-memory store for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<Slots>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, kind: CredentialKind) -> Option<String> {
        self.slots.read().slot(kind).clone()
    }

    async fn set(&self, kind: CredentialKind, value: &str) {
        *self.slots.write().slot_mut(kind) = Some(value.to_string());
    }

    async fn clear(&self, kind: CredentialKind) {
        *self.slots.write().slot_mut(kind) = None;
    }
}

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

/// File-backed store: a single JSON document, loaded once at construction
/// and rewritten on every credential change.
///
/// The in-memory view stays authoritative; a persistence failure is logged
/// and the session keeps working for the lifetime of the process.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    slots: RwLock<Slots>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PersistedCredentials>(&raw) {
                Ok(doc) => Slots {
                    access: doc.access,
                    refresh: doc.refresh,
                },
                Err(err) => {
                    warn!(path = %path.display(), %err, "ignoring unreadable credential file");
                    Slots::default()
                }
            },
            Err(_) => Slots::default(),
        };
        Self {
            path,
            slots: RwLock::new(slots),
        }
    }

    async fn persist(&self, doc: PersistedCredentials) {
        let raw = match serde_json::to_string_pretty(&doc) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to serialize credentials");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        if let Err(err) = tokio::fs::write(&self.path, raw).await {
            warn!(path = %self.path.display(), %err, "failed to persist credentials");
        }
    }

    fn snapshot(&self) -> PersistedCredentials {
        let slots = self.slots.read();
        PersistedCredentials {
            access: slots.access.clone(),
            refresh: slots.refresh.clone(),
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, kind: CredentialKind) -> Option<String> {
        self.slots.read().slot(kind).clone()
    }

    async fn set(&self, kind: CredentialKind, value: &str) {
        *self.slots.write().slot_mut(kind) = Some(value.to_string());
        self.persist(self.snapshot()).await;
    }

    async fn clear(&self, kind: CredentialKind) {
        *self.slots.write().slot_mut(kind) = None;
        self.persist(self.snapshot()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(CredentialKind::Access).await, None);

        store.set(CredentialKind::Access, "A1").await;
        store.set(CredentialKind::Refresh, "R1").await;
        assert_eq!(store.get(CredentialKind::Access).await.as_deref(), Some("A1"));
        assert_eq!(store.get(CredentialKind::Refresh).await.as_deref(), Some("R1"));

        store.set(CredentialKind::Access, "A2").await;
        assert_eq!(store.get(CredentialKind::Access).await.as_deref(), Some("A2"));

        store.clear(CredentialKind::Access).await;
        assert_eq!(store.get(CredentialKind::Access).await, None);
        // The other slot is untouched.
        assert_eq!(store.get(CredentialKind::Refresh).await.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::new(&path);
        store.set(CredentialKind::Access, "A1").await;
        store.set(CredentialKind::Refresh, "R1").await;
        drop(store);

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(
            reopened.get(CredentialKind::Access).await.as_deref(),
            Some("A1")
        );
        assert_eq!(
            reopened.get(CredentialKind::Refresh).await.as_deref(),
            Some("R1")
        );

        reopened.clear(CredentialKind::Refresh).await;
        drop(reopened);

        let again = FileCredentialStore::new(&path);
        assert_eq!(again.get(CredentialKind::Access).await.as_deref(), Some("A1"));
        assert_eq!(again.get(CredentialKind::Refresh).await, None);
    }

    #[tokio::test]
    async fn corrupt_credential_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.get(CredentialKind::Access).await, None);
        assert_eq!(store.get(CredentialKind::Refresh).await, None);
    }
}
