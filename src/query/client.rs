//! GIDEON API client
//!
//! `Gideon` owns the response cache, the pacer, the credentials and the
//! transport, and routes every query through them.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::{
    cache_key, Authorization, HttpTransport, Pacer, Params, QueryError, RawResponse, Transport,
    TransportError,
};
use crate::cache::{hours, ResponseCache};
use crate::config::ClientConfig;
use crate::table::Tabular;

/// Default freshness window for cached queries, in hours
const DEFAULT_CACHE_EXPIRATION_HOURS: u64 = 24;

/// Per-call options for `Gideon::query`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Skip the cache read; the fresh response is still written back
    pub force_online: bool,
    /// Maximum age of an acceptable cached response; `None` defers to the
    /// cache's default expiration
    pub cache_expiration_hours: Option<u64>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            force_online: false,
            cache_expiration_hours: Some(DEFAULT_CACHE_EXPIRATION_HOURS),
        }
    }
}

impl QueryOptions {
    /// Options that always go to the network
    pub fn online() -> Self {
        Self {
            force_online: true,
            ..Self::default()
        }
    }

    pub fn force_online(mut self, force_online: bool) -> Self {
        self.force_online = force_online;
        self
    }

    pub fn max_age_hours(mut self, hours: Option<u64>) -> Self {
        self.cache_expiration_hours = hours;
        self
    }
}

/// Cached, paced and authorized access to the GIDEON API
pub struct Gideon {
    auth: Authorization,
    cache: Mutex<ResponseCache>,
    pacer: Pacer,
    transport: Arc<dyn Transport>,
}

impl Gideon {
    /// Creates a client that talks to the configured origin over HTTP
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.base_url.clone(), config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of any transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            auth: Authorization::new(config.api_key),
            cache: Mutex::new(ResponseCache::new(config.cache)),
            pacer: Pacer::new(config.pacing_interval),
            transport,
        }
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.auth.set_api_key(api_key);
    }

    fn cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queries the API online, bypassing the cache read
    ///
    /// The response is still written to the cache.
    pub async fn query_online(&self, path: &str, params: &Params) -> Result<Value, QueryError> {
        self.resolve(path, params, QueryOptions::online()).await
    }

    /// Queries the API online and returns the response without interpreting it
    ///
    /// No cache interaction happens and any status is returned as-is.
    pub async fn query_online_raw(
        &self,
        path: &str,
        params: &Params,
    ) -> Result<RawResponse, QueryError> {
        self.fetch(path, params).await
    }

    /// Queries the API, serving from the cache when a fresh enough entry exists
    pub async fn query(
        &self,
        path: &str,
        params: &Params,
        options: QueryOptions,
    ) -> Result<Value, QueryError> {
        self.resolve(path, params, options).await
    }

    /// Same as `query`, converting list responses into a table
    pub async fn query_table(
        &self,
        path: &str,
        params: &Params,
        options: QueryOptions,
    ) -> Result<Tabular, QueryError> {
        self.resolve(path, params, options).await.map(Tabular::from)
    }

    async fn resolve(
        &self,
        path: &str,
        params: &Params,
        options: QueryOptions,
    ) -> Result<Value, QueryError> {
        let key = cache_key(path, params);

        if !options.force_online {
            let max_age = options.cache_expiration_hours.map(hours);
            let cached = self.cache().lookup(&key, max_age);
            if let Some(response) = cached {
                debug!(key = %key, "cache hit");
                return Ok(response);
            }
            debug!(key = %key, "cache miss");
        }

        let raw = self.fetch(path, params).await?;
        let response = interpret(path, raw)?;
        self.cache().write(&key, response.clone());
        Ok(response)
    }

    async fn fetch(&self, path: &str, params: &Params) -> Result<RawResponse, QueryError> {
        let authorization = self.auth.header_value()?;
        self.pacer.wait_if_needed().await;

        let response = self.transport.get(path, params, &authorization).await?;
        debug!(path, status = response.status, "GIDEON API responded");
        Ok(response)
    }

    /// Removes cached responses older than `hours` (or the default expiration)
    pub fn sweep_cache(&self, hours_old: Option<u64>) -> usize {
        self.cache().sweep(hours_old.map(hours))
    }

    /// Persists the cache now; returns whether it was written
    pub fn flush_cache(&self) -> bool {
        self.cache().flush(true)
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }

    /// File mirroring the cache, if persistence is enabled
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache().path().map(Path::to_path_buf)
    }

    /// Final flush of the cache before the client goes away
    pub fn shutdown(&self) {
        let mut cache = self.cache();
        if cache.dirty_count() > 0 && cache.flush(true) {
            info!(entries = cache.len(), "response cache saved");
        }
    }
}

/// Maps a completed request onto the query outcome
fn interpret(path: &str, raw: RawResponse) -> Result<Value, QueryError> {
    match raw.status {
        200 => Ok(raw.json()?),
        404 => Err(QueryError::BadPath(path.to_string())),
        status => Err(QueryError::UnexpectedStatus(status)),
    }
}
