//! Cache key derivation.

use sha2::{Digest, Sha256};

/// Key prefix shared by every folio cache entry.
pub const KEY_PREFIX: &str = "folio";

/// Derive the cache key for a scraped source snapshot.
///
/// The key embeds a digest of the source URL so that pointing the
/// configuration at a different page invalidates prior snapshots.
pub fn source_key(name: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{KEY_PREFIX}_{name}_{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let a = source_key("film", "https://letterboxd.com/da_ni/films/diary/");
        let b = source_key("film", "https://letterboxd.com/da_ni/films/diary/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_varies_with_url() {
        let a = source_key("film", "https://letterboxd.com/da_ni/films/diary/");
        let b = source_key("film", "https://letterboxd.com/other/films/diary/");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_format() {
        let key = source_key("film", "https://example.com");
        assert!(key.starts_with("folio_film_"));
        let digest = key.rsplit('_').next().unwrap();
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
