//! Live data sources for folio.
//!
//! This crate provides the HTTP fetch pipeline and the two external data
//! sources shown on the site: the game-library shelf and the film-diary
//! scrape. Both are fronted by the cache in `folio-core` and degrade to
//! cached or empty data when the live source misbehaves.

pub mod fetch;
pub mod films;
pub mod games;

pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use films::{DiaryScraper, FilmDetails, FilmDiary};
pub use games::{Game, GameShelf, GameSource, SteamClient};
