//! Recently-watched film from the diary scrape.
//!
//! The diary page is slow and rate-limited, so reads go through the
//! stale-while-revalidate cache: visitors get the cached entry instantly
//! while a detached scrape keeps it current. A cold cache with a failing
//! scrape is the one user-visible error state, paired with a retry
//! affordance in the UI.

pub mod scrape;

pub use scrape::{DiaryScraper, parse_diary, upscale_poster_url};

use serde::{Deserialize, Serialize};

use folio_core::Error;
use folio_core::cache::{CacheStore, serve_stale_while_revalidate, source_key};

/// Longest title shown untruncated.
const TITLE_DISPLAY_LIMIT: usize = 18;

/// The latest film-diary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmDetails {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub stars: Option<String>,
}

impl FilmDetails {
    /// Title trimmed for the card: sequels keep only the part before the
    /// colon, and overlong titles are ellipsized.
    pub fn short_title(&self) -> Option<String> {
        let title = self.title.as_deref()?;

        if let Some((prefix, _)) = title.split_once(':') {
            return Some(prefix.to_string());
        }

        if title.chars().count() > TITLE_DISPLAY_LIMIT {
            let cut: String = title.chars().take(TITLE_DISPLAY_LIMIT).collect();
            return Some(format!("{cut}..."));
        }

        Some(title.to_string())
    }
}

/// Cache-fronted view of the film diary.
pub struct FilmDiary {
    scraper: DiaryScraper,
    store: CacheStore,
}

impl FilmDiary {
    pub fn new(scraper: DiaryScraper, store: CacheStore) -> Self {
        Self { scraper, store }
    }

    /// Cache key for this diary's snapshot; changing the configured URL
    /// invalidates the old entry.
    pub fn cache_key(&self) -> String {
        source_key("film", self.scraper.url())
    }

    /// The latest diary entry, cached-first.
    ///
    /// A cached entry is returned immediately while a detached scrape
    /// refreshes it; with a cold cache the caller waits on the scrape.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceExhausted` when the scrape fails and nothing
    /// is cached; callers surface this as an explicit error state with a
    /// retry action.
    pub async fn latest(&self) -> Result<FilmDetails, Error> {
        let key = self.cache_key();
        let scraper = self.scraper.clone();

        serve_stale_while_revalidate(&self.store, &key, async move { scraper.scrape().await })
            .await
            .map_err(|e| Error::SourceExhausted(format!("film diary: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchClient, FetchConfig};
    use std::time::Duration;

    fn details(title: &str) -> FilmDetails {
        FilmDetails { title: Some(title.into()), image_url: None, stars: Some("★★★★".into()) }
    }

    fn dead_scraper() -> DiaryScraper {
        let config = FetchConfig { timeout: Duration::from_millis(200), ..Default::default() };
        let fetch = FetchClient::new(config).unwrap();
        // nothing listens on this port; the scrape fails fast
        DiaryScraper::new(fetch, "http://127.0.0.1:9/diary/")
    }

    #[test]
    fn test_short_title_keeps_plain_titles() {
        assert_eq!(details("Heat").short_title().as_deref(), Some("Heat"));
    }

    #[test]
    fn test_short_title_cuts_sequels_at_colon() {
        let film = details("Dune: Part Two");
        assert_eq!(film.short_title().as_deref(), Some("Dune"));
    }

    #[test]
    fn test_short_title_ellipsizes_overlong_titles() {
        let film = details("The Assassination of Jesse James");
        assert_eq!(film.short_title().as_deref(), Some("The Assassination ..."));
    }

    #[test]
    fn test_short_title_absent_without_title() {
        let film = FilmDetails { title: None, image_url: None, stars: None };
        assert!(film.short_title().is_none());
    }

    #[tokio::test]
    async fn test_cache_key_varies_with_diary_url() {
        let store = CacheStore::disabled();
        let a = FilmDiary::new(dead_scraper(), store.clone());
        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let b = FilmDiary::new(DiaryScraper::new(fetch, "http://127.0.0.1:9/other/"), store);

        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[tokio::test]
    async fn test_warm_cache_survives_dead_scraper() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let diary = FilmDiary::new(dead_scraper(), store.clone());
        store.put(&diary.cache_key(), &details("Heat"), None).await;

        let film = diary.latest().await.unwrap();
        assert_eq!(film.title.as_deref(), Some("Heat"));
    }

    #[tokio::test]
    async fn test_cold_cache_with_dead_scraper_is_exhausted() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let diary = FilmDiary::new(dead_scraper(), store);

        let result = diary.latest().await;
        assert!(matches!(result, Err(Error::SourceExhausted(_))));
    }
}
