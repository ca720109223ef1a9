//! Stale-while-revalidate read policy.
//!
//! On a cache hit the caller gets the cached value immediately while a
//! detached task refreshes the entry from the live source. The refresh
//! outcome is observed only through the cache side-effect and logs; it is
//! never awaited by the original caller. On a miss the caller blocks on the
//! live fetch and the result is cached before returning.

use super::store::CacheStore;
use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// What a background refresh did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh value differed from the cached one and replaced it wholesale.
    Updated,
    /// Fresh value was field-wise identical; no write was performed.
    Unchanged,
}

/// Compare a fresh value against the cached one and update the store
/// only when they differ.
pub async fn apply_refresh<T>(store: &CacheStore, key: &str, cached: &T, fresh: T) -> RefreshOutcome
where
    T: Serialize + PartialEq,
{
    if fresh == *cached {
        tracing::debug!("cache: fresh value for {key} matches, no update needed");
        RefreshOutcome::Unchanged
    } else {
        tracing::debug!("cache: fresh value for {key} differs, updating");
        store.put(key, &fresh, None).await;
        RefreshOutcome::Updated
    }
}

/// Serve a cached value immediately and refresh it in the background.
///
/// With a cached value present, `fetch` runs in a detached task whose
/// failure is logged and otherwise ignored (last-write-wins; the refresh
/// always replaces the entry wholesale, so no read-modify-write race
/// exists). Without one, `fetch` runs inline and its failure propagates.
pub async fn serve_stale_while_revalidate<T, F>(store: &CacheStore, key: &str, fetch: F) -> Result<T, Error>
where
    T: Serialize + DeserializeOwned + PartialEq + Clone + Send + Sync + 'static,
    F: Future<Output = Result<T, Error>> + Send + 'static,
{
    if let Some(cached) = store.get::<T>(key).await {
        tracing::debug!("cache: serving cached {key}, refreshing in background");

        let store = store.clone();
        let key = key.to_string();
        let stale = cached.clone();
        tokio::spawn(async move {
            match fetch.await {
                Ok(fresh) => {
                    apply_refresh(&store, &key, &stale, fresh).await;
                }
                Err(e) => tracing::error!("cache: background refresh for {key} failed: {e}"),
            }
        });

        return Ok(cached);
    }

    tracing::debug!("cache: no cached {key}, waiting for live fetch");
    let fresh = fetch.await?;
    store.put(key, &fresh, None).await;
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        title: String,
        stars: Option<String>,
    }

    fn record(title: &str) -> Record {
        Record { title: title.into(), stars: Some("★★★★".into()) }
    }

    #[tokio::test]
    async fn test_apply_refresh_unchanged_leaves_entry_untouched() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("k", &record("Heat"), None).await;
        let before = store.db().unwrap().get_entry("k").await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let outcome = apply_refresh(&store, "k", &record("Heat"), record("Heat")).await;

        assert_eq!(outcome, RefreshOutcome::Unchanged);
        let after = store.db().unwrap().get_entry("k").await.unwrap().unwrap();
        assert_eq!(after.written_at, before.written_at);
    }

    #[tokio::test]
    async fn test_apply_refresh_updated_overwrites() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("k", &record("Heat"), None).await;

        let outcome = apply_refresh(&store, "k", &record("Heat"), record("Ran")).await;

        assert_eq!(outcome, RefreshOutcome::Updated);
        let value: Record = store.get("k").await.unwrap();
        assert_eq!(value.title, "Ran");
    }

    #[tokio::test]
    async fn test_miss_blocks_on_fetch_and_caches() {
        let store = CacheStore::open_in_memory().await.unwrap();

        let value = serve_stale_while_revalidate(&store, "k", async { Ok(record("Heat")) })
            .await
            .unwrap();

        assert_eq!(value.title, "Heat");
        let cached: Record = store.get("k").await.unwrap();
        assert_eq!(cached, value);
    }

    #[tokio::test]
    async fn test_hit_serves_stale_then_refreshes() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("k", &record("Heat"), None).await;

        let value = serve_stale_while_revalidate(&store, "k", async { Ok(record("Ran")) })
            .await
            .unwrap();
        assert_eq!(value.title, "Heat");

        // let the detached refresh settle
        tokio::time::sleep(Duration::from_millis(100)).await;
        let cached: Record = store.get("k").await.unwrap();
        assert_eq!(cached.title, "Ran");
    }

    #[tokio::test]
    async fn test_hit_survives_failed_refresh() {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put("k", &record("Heat"), None).await;

        let value = serve_stale_while_revalidate(&store, "k", async {
            Err::<Record, _>(Error::Fetch("connection reset".into()))
        })
        .await
        .unwrap();
        assert_eq!(value.title, "Heat");

        tokio::time::sleep(Duration::from_millis(100)).await;
        let cached: Record = store.get("k").await.unwrap();
        assert_eq!(cached.title, "Heat");
    }

    #[tokio::test]
    async fn test_miss_propagates_fetch_failure() {
        let store = CacheStore::open_in_memory().await.unwrap();

        let result = serve_stale_while_revalidate::<Record, _>(&store, "k", async {
            Err(Error::Fetch("connection reset".into()))
        })
        .await;

        assert!(result.is_err());
        assert!(store.get::<Record>("k").await.is_none());
    }
}
