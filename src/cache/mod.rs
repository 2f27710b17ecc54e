//! Response cache for GIDEON API queries
//!
//! This module provides an in-memory store of decoded API responses keyed by the
//! canonical form of each query. The store is optionally mirrored to a single JSON
//! file so that responses survive process restarts. Persistence is best-effort:
//! a failed load or flush is logged and the in-memory store keeps working.

mod manager;

pub use manager::{default_cache_file, hours, CacheConfig, CacheEntry, ResponseCache};
