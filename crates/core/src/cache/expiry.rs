//! Time-boxed local validity for cached entries.
//!
//! A `TimedCache` stores values wrapped in a write-timestamped envelope and
//! judges staleness against its own clock, independent of any store-side
//! TTL. An entry older than the validity window is treated as absent and
//! proactively deleted, even though the backing store may still hold it.

use super::store::CacheStore;
use crate::config::AppConfig;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A cached value together with the time it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timestamped<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct TimestampedRef<'a, T> {
    data: &'a T,
    timestamp: DateTime<Utc>,
}

/// Whether an entry written at `written` has outlived the validity window.
pub fn is_expired(written: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now - written > max_age
}

/// Cache front whose entries are only valid for a fixed window after write.
#[derive(Clone, Debug)]
pub struct TimedCache {
    store: CacheStore,
    max_age: Duration,
}

impl TimedCache {
    /// Wrap a cache front with the given validity window.
    pub fn new(store: CacheStore, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    /// Wrap a cache front with the default one-day window.
    pub fn one_day(store: CacheStore) -> Self {
        Self::new(store, Duration::hours(24))
    }

    /// Wrap a cache front with the window named by the configuration.
    pub fn from_app(store: CacheStore, config: &AppConfig) -> Self {
        Self::new(store, Duration::hours(config.local_max_age_hours))
    }

    /// Read a value written less than the validity window ago.
    ///
    /// An expired entry is deleted and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry: Timestamped<T> = self.store.get(key).await?;

        if is_expired(entry.timestamp, Utc::now(), self.max_age) {
            tracing::debug!("cache: {key} outlived its validity window, dropping");
            self.store.delete(key).await;
            return None;
        }

        Some(entry.data)
    }

    /// Write a value stamped with the current time.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let envelope = TimestampedRef { data: value, timestamp: Utc::now() };
        self.store.put(key, &envelope, None).await
    }
}
