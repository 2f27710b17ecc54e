//! GIDEON API client library
//!
//! Authenticated, paced and cached access to the GIDEON infectious disease
//! REST API, plus helpers for resolving item names to GIDEON codes.

pub mod cache;
pub mod cli;
pub mod codes;
pub mod config;
pub mod diseases;
pub mod query;
pub mod table;

pub use config::ClientConfig;
pub use query::{Gideon, Params, QueryError, QueryOptions};
