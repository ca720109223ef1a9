//! SQLite-backed key-value cache fronting unreliable live data sources.
//!
//! This module provides a persistent cache using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Typed JSON values under string keys, with optional store-side TTL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - A degradable front that treats a missing or failing store as a miss
//! - Stale-while-revalidate reads with detached background refresh
//! - A time-boxed validity wrapper for locally persisted entries

pub mod db;
pub mod entries;
pub mod expiry;
pub mod keys;
pub mod migrations;
pub mod store;
pub mod swr;

pub use crate::Error;

pub use db::KvDb;
pub use entries::KvEntry;
pub use expiry::{TimedCache, Timestamped};
pub use keys::source_key;
pub use store::CacheStore;
pub use swr::{RefreshOutcome, serve_stale_while_revalidate};
