//! Item codes used by the GIDEON API
//!
//! Maps human-friendly category names to API endpoints and resolves item
//! names (diseases, drugs, countries, ...) to their GIDEON codes.

pub mod categories;
pub mod lookup;

pub use categories::{endpoint_for, id_and_name_fields, CategoryError, CATEGORIES};
pub use lookup::{lookup_item, match_items, Candidate, ItemCode, LookupError, LookupResult};
