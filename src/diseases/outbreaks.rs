//! Outbreak and endemicity queries
//!
//! API reference: https://api-doc.gideononline.com

use crate::query::{Gideon, Params, QueryError, QueryOptions};
use crate::table::Tabular;

/// All outbreaks reported in `year`, for every country
pub async fn outbreaks_by_year(client: &Gideon, year: i32) -> Result<Tabular, QueryError> {
    let params = Params::new().with("year", year);
    client
        .query_table("/diseases/outbreaks", &params, QueryOptions::default())
        .await
}

/// All outbreaks reported in one country during `year`
pub async fn outbreaks_by_country_year(
    client: &Gideon,
    country_code: &str,
    year: i32,
) -> Result<Tabular, QueryError> {
    let path = format!("/diseases/outbreaks/distribution/{}", country_code);
    let params = Params::new().with("year", year);
    client.query_table(&path, &params, QueryOptions::default()).await
}

/// The latest outbreak of every disease in a country
pub async fn latest_outbreaks_by_country(
    client: &Gideon,
    country_code: &str,
) -> Result<Tabular, QueryError> {
    let path = format!("/diseases/countries/{}/latest-outbreaks", country_code);
    client.query_table(&path, &Params::new(), QueryOptions::default()).await
}

/// Countries that have reported outbreaks of a disease
pub async fn outbreaks_by_disease(client: &Gideon, disease_code: i64) -> Result<Tabular, QueryError> {
    let path = format!("/diseases/{}/outbreaks", disease_code);
    client.query_table(&path, &Params::new(), QueryOptions::default()).await
}

/// Countries where a disease is endemic
pub async fn endemic_countries_by_disease(
    client: &Gideon,
    disease_code: i64,
) -> Result<Tabular, QueryError> {
    let path = format!("/diseases/{}/countries", disease_code);
    client.query_table(&path, &Params::new(), QueryOptions::default()).await
}

/// Diseases endemic to a country
pub async fn endemic_diseases_by_country(
    client: &Gideon,
    country_code: &str,
) -> Result<Tabular, QueryError> {
    let path = format!("/diseases/countries/{}", country_code);
    client.query_table(&path, &Params::new(), QueryOptions::default()).await
}
