//! Cache manager for GIDEON API responses
//!
//! Provides a `ResponseCache` that keeps every response in a key -> entry map,
//! counts unsaved writes, and rewrites the whole map to disk once enough of
//! them accumulate.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the persisted store inside the cache directory
const CACHE_FILE_NAME: &str = "responses.json";

/// Default freshness window for cached responses, in hours
const DEFAULT_EXPIRATION_HOURS: u64 = 24;

/// Number of unsaved writes that triggers a flush
const DEFAULT_FLUSH_THRESHOLD: usize = 1;

/// A single cached response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was last written or refreshed
    pub timestamp: DateTime<Utc>,
    /// The decoded response payload
    pub response: Value,
}

impl CacheEntry {
    /// An entry is expired once its age reaches `max_age`
    fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.timestamp >= max_age
    }
}

/// Settings for constructing a `ResponseCache`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Expiration applied when a lookup or sweep gives no explicit window
    pub default_expiration_hours: Option<u64>,
    /// Unsaved writes allowed before the store is rewritten to disk
    pub flush_threshold: usize,
    /// File mirroring the store; `None` keeps the cache in memory only
    pub persistence: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_expiration_hours: Some(DEFAULT_EXPIRATION_HOURS),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            persistence: default_cache_file(),
        }
    }
}

impl CacheConfig {
    /// A cache that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            persistence: None,
            ..Self::default()
        }
    }

    /// A cache persisted to the given file
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            persistence: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Returns the XDG-compliant location of the persisted store
///
/// Uses `~/.cache/gideon/responses.json` on Linux. Returns `None` when no home
/// directory can be determined.
pub fn default_cache_file() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "gideon")?;
    Some(project_dirs.cache_dir().join(CACHE_FILE_NAME))
}

/// Converts a window in hours into a duration, saturating on overflow
pub fn hours(hours: u64) -> Duration {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}

/// In-memory response store with buffered, best-effort persistence
///
/// Holds at most one entry per key. Writes bump a dirty counter; once the
/// counter reaches the flush threshold the entire map is serialized to the
/// persistence file through a temporary sibling and a rename, so a torn write
/// never replaces a good file.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    default_expiration: Option<Duration>,
    flush_threshold: usize,
    dirty_count: usize,
    path: Option<PathBuf>,
}

impl ResponseCache {
    /// Creates a cache, loading the persisted store if one is present and readable
    pub fn new(config: CacheConfig) -> Self {
        let entries = match &config.persistence {
            Some(path) => load_entries(path),
            None => HashMap::new(),
        };

        Self {
            entries,
            default_expiration: config.default_expiration_hours.map(hours),
            flush_threshold: config.flush_threshold.max(1),
            dirty_count: 0,
            path: config.persistence,
        }
    }

    /// Creates an in-memory cache with the given default expiration
    pub fn in_memory(default_expiration_hours: Option<u64>) -> Self {
        Self::new(CacheConfig {
            default_expiration_hours,
            ..CacheConfig::in_memory()
        })
    }

    /// Path of the persisted store, if persistence is enabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of writes since the last successful flush
    pub fn dirty_count(&self) -> usize {
        self.dirty_count
    }

    /// Returns the raw entry for a key regardless of its age
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the cached response if it is fresh enough
    ///
    /// With `max_age` unset the store's default expiration applies; when there
    /// is no default either, any cached entry is returned.
    pub fn lookup(&self, key: &str, max_age: Option<Duration>) -> Option<Value> {
        let entry = self.entries.get(key)?;
        match max_age.or(self.default_expiration) {
            Some(max_age) if entry.is_expired(Utc::now(), max_age) => None,
            _ => Some(entry.response.clone()),
        }
    }

    /// Same as `lookup`, but deletes the entry when it is present and expired
    pub fn lookup_or_evict(&mut self, key: &str, max_age: Option<Duration>) -> Option<Value> {
        let found = self.lookup(key, max_age);
        if found.is_none() && self.entries.remove(key).is_some() {
            debug!(key, "evicted expired cache entry");
        }
        found
    }

    /// Upserts the response for `key`, stamped with the current time
    ///
    /// The timestamp never moves backwards for an existing key. Rewriting an
    /// identical response refreshes the timestamp without forcing a flush.
    pub fn write(&mut self, key: &str, response: Value) {
        let now = Utc::now();
        let changed = match self.entries.get_mut(key) {
            Some(entry) => {
                entry.timestamp = entry.timestamp.max(now);
                if entry.response == response {
                    false
                } else {
                    entry.response = response;
                    true
                }
            }
            None => {
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        timestamp: now,
                        response,
                    },
                );
                true
            }
        };

        self.dirty_count += 1;
        if changed {
            self.flush(false);
        }
    }

    /// Writes the whole store to disk when forced or when enough writes are pending
    ///
    /// Returns whether the store was persisted. Failures are logged and leave the
    /// in-memory entries untouched.
    pub fn flush(&mut self, force: bool) -> bool {
        let Some(path) = self.path.as_deref() else {
            return false;
        };
        if !force && self.dirty_count < self.flush_threshold {
            return false;
        }

        match persist_entries(path, &self.entries) {
            Ok(()) => {
                debug!(path = %path.display(), entries = self.entries.len(), "flushed response cache");
                self.dirty_count = 0;
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to persist response cache");
                false
            }
        }
    }

    /// Removes every entry whose age has reached `max_age`
    ///
    /// Falls back to the default expiration; does nothing when neither is set.
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, max_age: Option<Duration>) -> usize {
        let Some(max_age) = max_age.or(self.default_expiration) else {
            return 0;
        };

        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, max_age));
        let removed = before - self.entries.len();

        if removed > 0 {
            info!(removed, remaining = self.entries.len(), "swept expired cache entries");
            self.dirty_count += 1;
        }
        removed
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.dirty_count += 1;
        }
    }
}

impl Drop for ResponseCache {
    fn drop(&mut self) {
        if self.dirty_count > 0 {
            self.flush(true);
        }
    }
}

/// Reads the persisted store, starting empty if it is missing or unreadable
fn load_entries(path: &Path) -> HashMap<String, CacheEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read response cache");
            return HashMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "discarding corrupt response cache");
            HashMap::new()
        }
    }
}

/// Serializes the store next to `path` and renames it into place
fn persist_entries(path: &Path, entries: &HashMap<String, CacheEntry>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec(entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    fn create_test_cache(threshold: usize) -> (ResponseCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = ResponseCache::new(CacheConfig {
            default_expiration_hours: Some(24),
            flush_threshold: threshold,
            persistence: Some(temp_dir.path().join("responses.json")),
        });
        (cache, temp_dir)
    }

    fn backdate(cache: &mut ResponseCache, key: &str, age: Duration) {
        let entry = cache.entries.get_mut(key).expect("entry should exist");
        entry.timestamp = Utc::now() - age;
    }

    #[test]
    fn test_write_then_lookup_returns_value() {
        let mut cache = ResponseCache::in_memory(None);
        let value = json!({"data": [{"disease_code": 10100, "disease": "Anthrax"}]});

        cache.write("/diseases", value.clone());

        assert_eq!(cache.lookup("/diseases", None), Some(value));
    }

    #[test]
    fn test_lookup_missing_key_returns_none() {
        let cache = ResponseCache::in_memory(Some(24));
        assert!(cache.lookup("/drugs", None).is_none());
    }

    #[test]
    fn test_zero_max_age_is_always_expired() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("/vaccines", json!({"data": []}));

        thread::sleep(StdDuration::from_millis(5));

        assert!(cache.lookup("/vaccines", Some(Duration::zero())).is_none());
        // Entry stays unless eviction was requested
        assert!(cache.entry("/vaccines").is_some());
    }

    #[test]
    fn test_age_equal_to_threshold_counts_as_expired() {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            response: Value::Null,
        };
        let now = entry.timestamp + hours(2);

        assert!(entry.is_expired(now, hours(2)));
        assert!(!entry.is_expired(now, hours(3)));
    }

    #[test]
    fn test_default_expiration_applies_without_explicit_window() {
        let mut cache = ResponseCache::in_memory(Some(1));
        cache.write("/countries", json!({"data": []}));
        backdate(&mut cache, "/countries", hours(2));

        assert!(cache.lookup("/countries", None).is_none());
        assert!(cache.lookup("/countries", Some(hours(3))).is_some());
    }

    #[test]
    fn test_lookup_or_evict_deletes_expired_entry() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("/drugs", json!({"data": []}));
        backdate(&mut cache, "/drugs", hours(5));

        assert!(cache.lookup_or_evict("/drugs", Some(hours(4))).is_none());
        assert!(cache.entry("/drugs").is_none());
    }

    #[test]
    fn test_lookup_or_evict_keeps_fresh_entry() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("/drugs", json!({"data": [1]}));

        assert_eq!(
            cache.lookup_or_evict("/drugs", Some(hours(4))),
            Some(json!({"data": [1]}))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_timestamp_never_regresses() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("/regions", json!(1));
        let future = Utc::now() + hours(1);
        cache.entries.get_mut("/regions").unwrap().timestamp = future;

        cache.write("/regions", json!(2));

        assert_eq!(cache.entry("/regions").unwrap().timestamp, future);
        assert_eq!(cache.lookup("/regions", None), Some(json!(2)));
    }

    #[test]
    fn test_rewrite_refreshes_timestamp() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("/regions", json!({"data": []}));
        backdate(&mut cache, "/regions", hours(10));

        cache.write("/regions", json!({"data": []}));

        assert!(cache.lookup("/regions", Some(hours(1))).is_some());
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("old", json!("old"));
        cache.write("fresh", json!("fresh"));
        backdate(&mut cache, "old", hours(48));
        backdate(&mut cache, "fresh", hours(1));
        let fresh_before = cache.entry("fresh").cloned();

        let removed = cache.sweep(Some(hours(24)));

        assert_eq!(removed, 1);
        assert!(cache.entry("old").is_none());
        assert_eq!(cache.entry("fresh").cloned(), fresh_before);
    }

    #[test]
    fn test_sweep_without_any_window_is_noop() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("old", json!("old"));
        backdate(&mut cache, "old", hours(10_000));

        assert_eq!(cache.sweep(None), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_uses_default_expiration() {
        let mut cache = ResponseCache::in_memory(Some(24));
        cache.write("old", json!("old"));
        backdate(&mut cache, "old", hours(30));

        assert_eq!(cache.sweep(None), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_write_flushes_at_threshold() {
        let (mut cache, temp_dir) = create_test_cache(2);
        let file = temp_dir.path().join("responses.json");

        cache.write("a", json!(1));
        assert!(!file.exists(), "One write should stay buffered");
        assert_eq!(cache.dirty_count(), 1);

        cache.write("b", json!(2));
        assert!(file.exists(), "Second write should flush");
        assert_eq!(cache.dirty_count(), 0);
    }

    #[test]
    fn test_unchanged_write_does_not_force_flush() {
        let (mut cache, temp_dir) = create_test_cache(2);
        let file = temp_dir.path().join("responses.json");

        cache.write("a", json!(1));
        cache.write("a", json!(1));

        assert!(!file.exists());
        assert_eq!(cache.dirty_count(), 2);
    }

    #[test]
    fn test_store_survives_reload() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("nested").join("responses.json");
        let value = json!({"data": [{"country_code": "G140", "country": "China"}]});

        {
            let mut cache = ResponseCache::new(CacheConfig::with_file(&file));
            cache.write("/countries", value.clone());
        }

        let cache = ResponseCache::new(CacheConfig::with_file(&file));
        assert_eq!(cache.lookup("/countries", None), Some(value));
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("responses.json");

        {
            let mut cache = ResponseCache::new(CacheConfig {
                flush_threshold: 100,
                ..CacheConfig::with_file(&file)
            });
            cache.write("/drugs", json!({"data": []}));
            assert!(!file.exists());
        }

        assert!(file.exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("responses.json");
        fs::write(&file, "{not json").unwrap();

        let cache = ResponseCache::new(CacheConfig::with_file(&file));

        assert!(cache.is_empty());
    }

    #[test]
    fn test_flush_failure_keeps_memory_intact() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A regular file where the parent directory should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut cache = ResponseCache::new(CacheConfig::with_file(blocker.join("responses.json")));

        cache.write("/diseases", json!({"data": [1, 2]}));

        assert!(!cache.flush(true));
        assert_eq!(cache.lookup("/diseases", None), Some(json!({"data": [1, 2]})));
        assert_eq!(cache.dirty_count(), 1);
    }

    #[test]
    fn test_in_memory_flush_is_noop() {
        let mut cache = ResponseCache::in_memory(None);
        cache.write("a", json!(1));
        assert!(!cache.flush(true));
        assert!(cache.path().is_none());
    }

    #[test]
    fn test_hours_saturates() {
        assert_eq!(hours(2), Duration::seconds(7200));
        assert_eq!(hours(u64::MAX), Duration::MAX);
    }

    #[test]
    fn test_default_cache_file_is_xdg_compliant() {
        if let Some(path) = default_cache_file() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("gideon"), "Cache path should contain project name");
            assert!(path_str.ends_with(CACHE_FILE_NAME));
        }
        // Test passes if no home directory is available (e.g., in CI)
    }
}
