//! Shelf assembly with live-first reads and cache fallback.
//!
//! The shelf reads the live API first and falls back to the last cached
//! payload when the source misbehaves (the reverse of the film diary's
//! stale-while-revalidate policy: game stats go stale within hours, so a
//! successful live read always wins). Every stage degrades to fewer games
//! rather than an error.

use super::select::{DEFAULT_FAVORITES, filter_denylisted, select_favorites};
use super::{Game, GameSource};
use folio_core::cache::CacheStore;
use rand::thread_rng;

/// Cached recently-played payload.
pub const RECENT_GAMES_KEY: &str = "folio_recent_games";
/// Cached owned-library payload.
pub const ALL_GAMES_KEY: &str = "folio_all_games";
/// Cached favorite titles, seeded from the built-in defaults.
pub const FAVORITE_GAMES_KEY: &str = "folio_favorite_games";
/// Cached title denylist applied to recently played games.
pub const FILTERED_GAMES_KEY: &str = "folio_filtered_games";
/// Flag gating the recently-played fetch.
pub const FETCH_RECENT_KEY: &str = "folio_fetch_recent";

/// The shelf of games shown on the about page.
pub struct GameShelf<S> {
    source: S,
    store: CacheStore,
    slots: usize,
}

impl<S: GameSource> GameShelf<S> {
    pub fn new(source: S, store: CacheStore, slots: usize) -> Self {
        Self { source, store, slots }
    }

    /// Assemble the shelf.
    ///
    /// Recently played games lead (when the fetch-recent flag is cached as
    /// set), filtered against the cached title denylist; favorites from the
    /// owned library fill the remaining slots. Any source failure degrades
    /// to fewer games, never an error.
    pub async fn shelf(&self) -> Vec<Game> {
        let mut games = Vec::new();

        let fetch_recent = self.store.get::<bool>(FETCH_RECENT_KEY).await.unwrap_or(false);
        if fetch_recent {
            let denylist = self.store.get::<Vec<String>>(FILTERED_GAMES_KEY).await.unwrap_or_default();
            games = filter_denylisted(self.recent_games().await, &denylist);
        }

        if games.len() < self.slots {
            let owned = self.owned_games().await;
            if !owned.is_empty() {
                let needed = self.slots - games.len();
                let favorites = self.favorite_titles().await;
                let picks = select_favorites(&owned, &games, &favorites, needed, &mut thread_rng());
                games.extend(picks);
            }
        }

        games
    }

    /// Live recently-played games, cached on success; cache fallback on
    /// failure. An empty live answer is returned as-is without touching
    /// the cache.
    async fn recent_games(&self) -> Vec<Game> {
        match self.source.recently_played(self.slots).await {
            Ok(games) if !games.is_empty() => {
                self.store.put(RECENT_GAMES_KEY, &games, None).await;
                games
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::error!("games: recently-played fetch failed, using cache: {e}");
                self.store.get(RECENT_GAMES_KEY).await.unwrap_or_default()
            }
        }
    }

    /// Live owned library, cached on success; cache fallback on failure.
    async fn owned_games(&self) -> Vec<Game> {
        match self.source.owned_games().await {
            Ok(games) => {
                self.store.put(ALL_GAMES_KEY, &games, None).await;
                games
            }
            Err(e) => {
                tracing::error!("games: owned-library fetch failed, using cache: {e}");
                self.store.get(ALL_GAMES_KEY).await.unwrap_or_default()
            }
        }
    }

    /// Cached favorite titles, seeded from the defaults on first use.
    async fn favorite_titles(&self) -> Vec<String> {
        if let Some(titles) = self.store.get::<Vec<String>>(FAVORITE_GAMES_KEY).await {
            return titles;
        }

        let defaults: Vec<String> = DEFAULT_FAVORITES.iter().map(|s| s.to_string()).collect();
        self.store.put(FAVORITE_GAMES_KEY, &defaults, None).await;
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use folio_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        recent: Result<Vec<Game>, String>,
        owned: Result<Vec<Game>, String>,
        recent_calls: AtomicUsize,
    }

    impl StubSource {
        fn new(recent: Result<Vec<Game>, String>, owned: Result<Vec<Game>, String>) -> Self {
            Self { recent, owned, recent_calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl GameSource for StubSource {
        async fn recently_played(&self, _count: usize) -> Result<Vec<Game>, Error> {
            self.recent_calls.fetch_add(1, Ordering::SeqCst);
            self.recent.clone().map_err(Error::Fetch)
        }

        async fn owned_games(&self) -> Result<Vec<Game>, Error> {
            self.owned.clone().map_err(Error::Fetch)
        }
    }

    fn game(appid: u64, name: &str) -> Game {
        Game {
            appid,
            name: name.into(),
            playtime_2weeks: 0,
            playtime_forever: 0,
            img_icon_url: String::new(),
            img_logo_url: String::new(),
        }
    }

    async fn store_with_flag() -> CacheStore {
        let store = CacheStore::open_in_memory().await.unwrap();
        store.put(FETCH_RECENT_KEY, &true, None).await;
        store
    }

    #[tokio::test]
    async fn test_recent_games_fill_the_shelf() {
        let recent = vec![game(1, "A"), game(2, "B"), game(3, "C"), game(4, "D")];
        let source = StubSource::new(Ok(recent.clone()), Ok(vec![]));
        let shelf = GameShelf::new(source, store_with_flag().await, 4);

        let games = shelf.shelf().await;
        assert_eq!(games, recent);

        // live answer was cached for the next failure
        let cached: Vec<Game> = shelf.store.get(RECENT_GAMES_KEY).await.unwrap();
        assert_eq!(cached, recent);
    }

    #[tokio::test]
    async fn test_recent_skipped_without_flag() {
        let owned = vec![game(620, "Portal 2")];
        let source = StubSource::new(Ok(vec![game(1, "A")]), Ok(owned));
        let store = CacheStore::open_in_memory().await.unwrap();
        let shelf = GameShelf::new(source, store, 4);

        let games = shelf.shelf().await;
        assert_eq!(shelf.source.recent_calls.load(Ordering::SeqCst), 0);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Portal 2");
    }

    #[tokio::test]
    async fn test_recent_failure_falls_back_to_cache() {
        let cached = vec![game(9, "Cached"), game(10, "Also Cached")];
        let store = store_with_flag().await;
        store.put(RECENT_GAMES_KEY, &cached, None).await;

        let source = StubSource::new(Err("api down".into()), Ok(vec![]));
        let shelf = GameShelf::new(source, store, 2);

        let games = shelf.shelf().await;
        assert_eq!(games, cached);
    }

    #[tokio::test]
    async fn test_denylist_filters_recent_games() {
        let store = store_with_flag().await;
        store
            .put(FILTERED_GAMES_KEY, &vec!["Wallpaper Engine".to_string()], None)
            .await;

        let recent = vec![game(1, "Wallpaper Engine"), game(2, "Hades")];
        let source = StubSource::new(Ok(recent), Ok(vec![]));
        let shelf = GameShelf::new(source, store, 2);

        let games = shelf.shelf().await;
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert!(!names.contains(&"Wallpaper Engine"));
    }

    #[tokio::test]
    async fn test_favorites_fill_remaining_slots() {
        let store = store_with_flag().await;
        let recent = vec![game(1, "Recent Game")];
        let owned = vec![game(620, "Portal 2"), game(220, "Half-Life 2"), game(7, "Obscure")];
        let source = StubSource::new(Ok(recent), Ok(owned));
        let shelf = GameShelf::new(source, store, 3);

        let games = shelf.shelf().await;
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].name, "Recent Game");

        let mut fill: Vec<&str> = games[1..].iter().map(|g| g.name.as_str()).collect();
        fill.sort_unstable();
        assert_eq!(fill, vec!["Half-Life 2", "Portal 2"]);
    }

    #[tokio::test]
    async fn test_everything_down_yields_empty_shelf() {
        let source = StubSource::new(Err("api down".into()), Err("api down".into()));
        let shelf = GameShelf::new(source, store_with_flag().await, 4);

        let games = shelf.shelf().await;
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn test_favorites_seeded_on_first_use() {
        let store = CacheStore::open_in_memory().await.unwrap();
        let source = StubSource::new(Ok(vec![]), Ok(vec![game(620, "Portal 2")]));
        let shelf = GameShelf::new(source, store, 4);

        shelf.shelf().await;
        let titles: Vec<String> = shelf.store.get(FAVORITE_GAMES_KEY).await.unwrap();
        assert_eq!(titles.len(), DEFAULT_FAVORITES.len());
    }
}
