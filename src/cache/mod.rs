use log::debug;
use std::path::{Path, PathBuf};
use crate::error::Result;

pub mod key;
pub mod storage;

use key::CacheKeyGenerator;
use storage::FileStorage;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false, `get` always misses and `put` does nothing
    pub enabled: bool,
    /// Directory holding one file per cached response
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("cache"),
        }
    }
}

/// Read-through / write-through store of raw response bodies keyed by request URL.
///
/// Entries never expire: historical registrar data does not change, and
/// clearing stale entries (`clear`) is left to the caller.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    storage: FileStorage,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            storage: FileStorage::new(&config.dir),
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir(&self) -> &Path {
        self.storage.dir()
    }

    /// Where the entry for `url` lives on disk
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.storage.entry_path(&CacheKeyGenerator::generate_key(url))
    }

    /// Get the cached body for `url`
    pub fn get(&self, url: &str) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let key = CacheKeyGenerator::generate_key(url);
        let body = self.storage.get(&key)?;
        match body {
            Some(_) => debug!("Cache hit for {} ({})", url, key),
            None => debug!("Cache miss for {} ({})", url, key),
        }
        Ok(body)
    }

    /// Store the raw body fetched from `url`
    pub fn put(&self, url: &str, body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let key = CacheKeyGenerator::generate_key(url);
        debug!("Setting cache for {} ({})", url, key);
        self.storage.put(&key, body)
    }

    /// Drop the entry for `url`; true when one existed
    pub fn remove(&self, url: &str) -> Result<bool> {
        let key = CacheKeyGenerator::generate_key(url);
        debug!("Removing cache entry for {} ({})", url, key);
        self.storage.remove(&key)
    }

    /// Clear all cache entries
    pub fn clear(&self) -> Result<u64> {
        self.storage.clear()
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            total_entries: self.storage.count_entries()?,
            total_size: self.storage.get_total_size()?,
        })
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_size: u64,
}

impl CacheStats {
    pub fn average_entry_size(&self) -> u64 {
        if self.total_entries == 0 {
            0
        } else {
            self.total_size / self.total_entries
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache(enabled: bool) -> (ResponseCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(CacheConfig {
            enabled,
            dir: temp_dir.path().join("cache"),
        });
        (cache, temp_dir)
    }

    #[test]
    fn test_cache_put_and_get() {
        let (cache, _temp_dir) = create_test_cache(true);
        let url = "https://host/student/v5/public/campus.json";

        assert_eq!(cache.get(url).unwrap(), None);
        cache.put(url, r#"{"Campuses":["A"]}"#).unwrap();
        assert_eq!(cache.get(url).unwrap().as_deref(), Some(r#"{"Campuses":["A"]}"#));
        assert!(cache.path_for(url).exists());
    }

    #[test]
    fn test_disabled_cache_is_noop() {
        let (cache, _temp_dir) = create_test_cache(false);
        let url = "https://host/student/v5/public/campus.json";

        cache.put(url, "{}").unwrap();
        assert_eq!(cache.get(url).unwrap(), None);
        assert!(!cache.path_for(url).exists());
        assert!(!cache.dir().exists());
    }

    #[test]
    fn test_remove() {
        let (cache, _temp_dir) = create_test_cache(true);
        let url = "https://host/student/v5/public/campus.json";

        cache.put(url, "{").unwrap();
        assert!(cache.remove(url).unwrap());
        assert!(!cache.remove(url).unwrap());
        assert_eq!(cache.get(url).unwrap(), None);
    }

    #[test]
    fn test_stats() {
        let (cache, _temp_dir) = create_test_cache(true);
        cache.put("https://host/a.json", "1234").unwrap();
        cache.put("https://host/b.json", "12").unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_size, 6);
        assert_eq!(stats.average_entry_size(), 3);

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }
}
