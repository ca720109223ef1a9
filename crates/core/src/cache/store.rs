//! Degradable cache front over the key-value store.
//!
//! `CacheStore` is the surface the rest of the system talks to. It never
//! raises: a missing store configuration, a failing store, or an undecodable
//! value all degrade to a miss (reads) or a `false` success flag (writes),
//! so callers always have a defined cold-cache behavior.

use super::db::KvDb;
use crate::Error;
use crate::config::AppConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Cache front with an optional backing store.
#[derive(Clone, Debug)]
pub struct CacheStore {
    db: Option<KvDb>,
}

impl CacheStore {
    /// Wrap an open key-value store.
    pub fn new(db: KvDb) -> Self {
        Self { db: Some(db) }
    }

    /// A front with no backing store; every operation is a silent no-op.
    pub fn disabled() -> Self {
        Self { db: None }
    }

    /// Open the store named by the configuration.
    ///
    /// No configured path, or a store that fails to open, yields a disabled
    /// front rather than an error; the system then runs in always-live-fetch
    /// mode.
    pub async fn open(config: &AppConfig) -> Self {
        let Some(path) = &config.db_path else {
            tracing::debug!("cache: no db path configured, running without a store");
            return Self::disabled();
        };

        match KvDb::open(path).await {
            Ok(db) => {
                tracing::debug!("cache: connected");
                Self::new(db)
            }
            Err(e) => {
                tracing::error!("cache: failed to open store: {e}");
                Self::disabled()
            }
        }
    }

    /// Whether a backing store is present.
    pub fn is_enabled(&self) -> bool {
        self.db.is_some()
    }

    /// Read a typed value. Any failure is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let db = self.db.as_ref()?;

        match db.get_raw(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!("cache: hit {key}");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("cache: undecodable value for {key}: {e}");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("cache: miss {key}");
                None
            }
            Err(e) => {
                tracing::warn!("cache: read error for {key}: {e}");
                None
            }
        }
    }

    /// Write a typed value through to the store.
    ///
    /// A ttl sets a store-side expiry in seconds; None means no expiry.
    /// Returns whether the write succeeded; failures are logged.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: Option<i64>) -> bool {
        let Some(db) = self.db.as_ref() else {
            return false;
        };

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("cache: failed to encode {key}: {e}");
                return false;
            }
        };

        match db.put_raw(key, &json, ttl_seconds).await {
            Ok(()) => {
                match ttl_seconds {
                    Some(ttl) => tracing::debug!("cache: stored {key} (expires in {ttl}s)"),
                    None => tracing::debug!("cache: stored {key} (no expiry)"),
                }
                true
            }
            Err(e) => {
                tracing::warn!("cache: write error for {key}: {e}");
                false
            }
        }
    }

    /// Remove an entry. Returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        let Some(db) = self.db.as_ref() else {
            return false;
        };

        match db.delete_entry(key).await {
            Ok(removed) => {
                if removed {
                    tracing::debug!("cache: deleted {key}");
                }
                removed
            }
            Err(e) => {
                tracing::warn!("cache: delete error for {key}: {e}");
                false
            }
        }
    }

    /// Access the backing store, if any.
    pub(crate) fn db(&self) -> Option<&KvDb> {
        self.db.as_ref()
    }
}

impl CacheStore {
    /// Convenience for tests and embedded use: an in-memory backed front.
    pub async fn open_in_memory() -> Result<Self, Error> {
        Ok(Self::new(KvDb::open_in_memory().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_roundtrip() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let value = Payload { name: "portal".into(), count: 2 };

        assert!(store.put("folio_test", &value, None).await);
        let back: Payload = store.get("folio_test").await.unwrap();
        assert_eq!(back, value);
    }

    #[tokio::test]
    async fn test_disabled_store_is_all_misses() {
        let store = CacheStore::disabled();
        let value = Payload { name: "portal".into(), count: 2 };

        assert!(!store.is_enabled());
        assert!(!store.put("folio_test", &value, None).await);
        assert!(store.get::<Payload>("folio_test").await.is_none());
        assert!(!store.delete("folio_test").await);
    }

    #[tokio::test]
    async fn test_undecodable_value_is_a_miss() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store
            .db()
            .unwrap()
            .put_raw("folio_test", "not json", None)
            .await
            .unwrap();

        assert!(store.get::<Payload>("folio_test").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("folio_test", &1u32, None).await;

        assert!(store.delete("folio_test").await);
        assert!(!store.delete("folio_test").await);
    }

    #[tokio::test]
    async fn test_unconfigured_open_is_disabled() {
        let config = AppConfig::default();
        let store = CacheStore::open(&config).await;
        assert!(!store.is_enabled());
    }
}
