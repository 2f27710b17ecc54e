//! Disease-level queries
//!
//! Thin wrappers that turn disease and outbreak questions into GIDEON API
//! paths and parameters, answered through the cached query path.

pub mod filter;
pub mod outbreaks;

pub use filter::{filter_diseases, DiseaseFilter};
pub use outbreaks::{
    endemic_countries_by_disease, endemic_diseases_by_country, latest_outbreaks_by_country,
    outbreaks_by_country_year, outbreaks_by_disease, outbreaks_by_year,
};
