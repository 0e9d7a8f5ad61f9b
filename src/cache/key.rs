use sha2::{Digest, Sha256};

/// Cache key generator for fully resolved request URLs
pub struct CacheKeyGenerator;

impl CacheKeyGenerator {
    /// Generate a cache key for a request URL
    ///
    /// The key is the hex SHA256 of the complete URL, query string included,
    /// so it doubles as a file name and distinct queries never share an entry.
    pub fn generate_key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());

        let result = hasher.finalize();
        format!("{:x}", result)
    }

    /// Validate cache key format
    pub fn is_valid_key(key: &str) -> bool {
        key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit())
    }
}
