//! Key-value entry CRUD operations.
//!
//! Raw string values under string keys, with an optional store-side TTL.
//! Reads treat expired rows as absent; a separate purge removes them.

use super::db::KvDb;
use crate::Error;
use chrono::{Duration, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A raw cache row, including its bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct KvEntry {
    pub key: String,
    pub value_json: String,
    pub written_at: String,
    pub expires_at: Option<String>,
}

impl KvDb {
    /// Get a raw value by key.
    ///
    /// Returns None if the key doesn't exist or the row has expired.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get_entry(key).await?.map(|e| e.value_json))
    }

    /// Get a full entry by key, including timestamps.
    ///
    /// Returns None if the key doesn't exist or the row has expired.
    pub async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<Option<KvEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, value_json, written_at, expires_at FROM kv_entries
                     WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                )?;

                let result = stmt.query_row(params![key, now], |row| {
                    Ok(KvEntry {
                        key: row.get(0)?,
                        value_json: row.get(1)?,
                        written_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                });

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a raw value.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, updates all
    /// fields if it does. A ttl sets a store-side expiry; None means the
    /// entry never expires on the store side.
    pub async fn put_raw(&self, key: &str, value_json: &str, ttl_seconds: Option<i64>) -> Result<(), Error> {
        let key = key.to_string();
        let value_json = value_json.to_string();

        let written_at = Utc::now().to_rfc3339();
        let expires_at = ttl_seconds.map(|ttl| (Utc::now() + Duration::seconds(ttl)).to_rfc3339());

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_entries (key, value_json, written_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value_json = excluded.value_json,
                        written_at = excluded.written_at,
                        expires_at = excluded.expires_at",
                    params![key, value_json, written_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete an entry by key.
    ///
    /// Returns whether a row was removed.
    pub async fn delete_entry(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted rows.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM kv_entries WHERE expires_at IS NOT NULL AND expires_at < ?1",
                    params![now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
