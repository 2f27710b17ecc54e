//! Query layer for the GIDEON API
//!
//! Decides for every logical request whether it can be answered from the
//! response cache or has to go to the network, and classifies network
//! outcomes into typed errors.

mod auth;
mod client;
mod pacer;
mod transport;

pub use auth::Authorization;
pub use client::{Gideon, QueryOptions};
pub use pacer::Pacer;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};

#[cfg(test)]
pub(crate) use transport::mock;

use thiserror::Error;

/// Errors that can occur when querying the GIDEON API
#[derive(Debug, Error)]
pub enum QueryError {
    /// No API key was configured, or it was empty
    #[error("GIDEON API key not provided")]
    MissingApiKey,

    /// The remote service does not recognize the endpoint
    #[error("Bad GIDEON API path: \"{0}\" - Refer to https://api-doc.gideononline.com")]
    BadPath(String),

    /// The remote service answered with a status other than 200 or 404
    #[error("Could not connect to GIDEON API: unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The request never produced a response
    #[error("Could not connect to GIDEON API: {0}")]
    Transport(#[from] TransportError),

    /// A successful response carried a body that is not JSON
    #[error("Failed to parse GIDEON API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    /// Whether the failure is a connection problem the caller may retry
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::UnexpectedStatus(_) | Self::Transport(_))
    }
}

/// URL parameters attached to a query
///
/// Keeps insertion order for the outgoing request; the cache key is built from
/// a sorted copy so that ordering never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any earlier value for the same key
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a parameter, replacing any earlier value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Sorted, URL-encoded query string
    pub fn canonical(&self) -> String {
        let mut sorted: Vec<_> = self.0.iter().collect();
        sorted.sort();
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Builds the cache key for a path and its parameters
///
/// A query without parameters is keyed by its bare path.
pub fn cache_key(path: &str, params: &Params) -> String {
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.canonical())
    }
}
