//! Name to code lookup
//!
//! Fetches a category listing through the cached query path and scans it for
//! an item name. Exact (case-insensitive) matches win; when there are none,
//! names containing the search text are reported instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::categories::{endpoint_for, id_and_name_fields, CategoryError};
use crate::query::{Gideon, Params, QueryError, QueryOptions};

/// Errors that can occur during an item lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The listing did not have the expected shape
    #[error("Unexpected listing from {0}")]
    Malformed(String),
}

/// A GIDEON item code; diseases and drugs use numbers, countries use strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemCode {
    Number(i64),
    Text(String),
}

impl ItemCode {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ItemCode::Number),
            Value::String(s) => Some(ItemCode::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCode::Number(n) => write!(f, "{}", n),
            ItemCode::Text(s) => f.write_str(s),
        }
    }
}

/// One item that matched a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub code: ItemCode,
    pub name: String,
}

/// Outcome of a name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    NotFound,
    Unique(ItemCode),
    Ambiguous(Vec<Candidate>),
}

/// Looks up the GIDEON code of an item by name within a category
pub async fn lookup_item(
    client: &Gideon,
    category: &str,
    name: &str,
) -> Result<LookupResult, LookupError> {
    let endpoint = endpoint_for(category)?;
    let listing = client
        .query(endpoint, &Params::new(), QueryOptions::default())
        .await?;
    match_items(endpoint, &listing, name)
}

/// Scans an endpoint listing for `name`
pub fn match_items(endpoint: &str, listing: &Value, name: &str) -> Result<LookupResult, LookupError> {
    let malformed = || LookupError::Malformed(endpoint.to_string());
    let (id_key, name_key) = id_and_name_fields(endpoint).ok_or_else(malformed)?;
    let items = listing
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(malformed)?;

    let mut candidates = Vec::with_capacity(items.len());
    for item in items {
        let code = item.get(id_key).and_then(ItemCode::from_value);
        let item_name = item.get(name_key).and_then(Value::as_str);
        match (code, item_name) {
            (Some(code), Some(item_name)) => candidates.push(Candidate {
                code,
                name: item_name.to_string(),
            }),
            _ => return Err(malformed()),
        }
    }

    let search = name.trim().to_lowercase();
    let normalized = |c: &Candidate| c.name.trim().to_lowercase();

    let mut matches: Vec<Candidate> = candidates
        .iter()
        .filter(|c| normalized(*c) == search)
        .cloned()
        .collect();
    if matches.is_empty() && !search.is_empty() {
        matches = candidates
            .into_iter()
            .filter(|c| normalized(c).contains(&search))
            .collect();
    }

    debug!(endpoint, name, matches = matches.len(), "item lookup");

    Ok(match matches.len() {
        0 => LookupResult::NotFound,
        1 => LookupResult::Unique(matches.remove(0).code),
        _ => LookupResult::Ambiguous(matches),
    })
}
