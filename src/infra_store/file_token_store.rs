use crate::domain_model::*;
use crate::domain_port::TokenStore;
use crate::infra_store::slots::{DEFAULT_SLOT_TTL_DAYS, TokenSlots};
use chrono::{Duration, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

/// Token store persisted as a small JSON document, surviving process
/// restarts the way session cookies survive page reloads.
pub struct FileTokenStore {
    path: PathBuf,
    ttl: Duration,
    io_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            io_lock: Mutex::new(()),
        }
    }

    pub fn with_default_ttl(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Duration::days(DEFAULT_SLOT_TTL_DAYS))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> TokenSlots {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return TokenSlots::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "token file unreadable");
                return TokenSlots::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "token file corrupt, ignoring");
            TokenSlots::default()
        })
    }

    async fn save(&self, slots: &TokenSlots) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(slots)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }

    async fn read_slots(&self) -> TokenSlots {
        let _guard = self.io_lock.lock().await;
        self.load().await
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Option<TokenPair> {
        self.read_slots().await.pair(Utc::now())
    }

    async fn set(&self, pair: &TokenPair) {
        let _guard = self.io_lock.lock().await;
        let slots = TokenSlots::filled(pair, self.ttl, Utc::now());
        if let Err(e) = self.save(&slots).await {
            warn!(path = %self.path.display(), error = %e, "failed to persist tokens");
        }
    }

    async fn clear(&self) {
        let _guard = self.io_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove token file");
                // fall back to overwriting so stale credentials are not read back
                if let Err(e) = self.save(&TokenSlots::default()).await {
                    warn!(path = %self.path.display(), error = %e, "failed to blank token file");
                }
            }
        }
    }

    async fn access_token(&self) -> Option<AccessToken> {
        self.read_slots().await.access_token(Utc::now())
    }

    async fn refresh_token(&self) -> Option<RefreshToken> {
        self.read_slots().await.refresh_token(Utc::now())
    }

    async fn user_id(&self) -> Option<UserId> {
        self.read_slots().await.user_id(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let pair = TokenPair::new("access", "refresh", "user-1");

        FileTokenStore::with_default_ttl(&path).set(&pair).await;

        let reopened = FileTokenStore::with_default_ttl(&path);
        assert_eq!(reopened.get().await, Some(pair));
    }

    #[tokio::test]
    async fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_default_ttl(dir.path().join("session.json"));
        store.set(&TokenPair::new("a", "r", "u")).await;
        assert!(store.path().exists());

        store.clear().await;

        assert!(!store.path().exists());
        assert_eq!(store.get().await, None);
        // clearing twice is harmless
        store.clear().await;
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FileTokenStore::with_default_ttl(&path);

        assert_eq!(store.get().await, None);
        assert_eq!(store.refresh_token().await, None);
    }

    #[tokio::test]
    async fn missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_default_ttl(dir.path().join("absent.json"));
        assert_eq!(store.get().await, None);
        assert_eq!(store.user_id().await, None);
    }

    #[tokio::test]
    async fn expired_slots_are_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"), Duration::zero());
        store.set(&TokenPair::new("a", "r", "u")).await;
        assert_eq!(store.get().await, None);
    }
}
