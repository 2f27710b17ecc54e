//! Category name to endpoint mapping

use thiserror::Error;

/// Category names accepted by `endpoint_for`
pub const CATEGORIES: [&str; 12] = [
    "diseases",
    "drugs",
    "vaccines",
    "agents",
    "vectors",
    "vehicles",
    "reservoirs",
    "bacteria",
    "mycobacteria",
    "yeasts",
    "countries",
    "regions",
];

/// Errors that can occur when resolving a category
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// The category name is not recognized
    #[error("Unknown category: '{0}'. Valid categories: diseases, drugs, vaccines, agents, vectors, vehicles, reservoirs, bacteria, mycobacteria, yeasts, countries, regions")]
    Unknown(String),
}

/// Returns the API endpoint listing every item of a category
///
/// Matching ignores case and surrounding whitespace, and accepts singular
/// spellings (`disease`, `bacterium`, `region`, ...).
pub fn endpoint_for(category: &str) -> Result<&'static str, CategoryError> {
    let endpoint = match category.trim().to_lowercase().as_str() {
        "disease" | "diseases" => "/diseases",
        "drug" | "drugs" => "/drugs",
        "vaccine" | "vaccines" => "/vaccines",
        "agents" => "/diseases/fingerprint/agents",
        "vectors" => "/diseases/fingerprint/vectors",
        "vehicles" => "/diseases/fingerprint/vehicles",
        "reservoirs" => "/diseases/fingerprint/reservoirs",
        "bacterium" | "bacteria" => "/microbiology/bacteria",
        "mycobacterium" | "mycobacteria" => "/microbiology/mycobacteria",
        "yeast" | "yeasts" => "/microbiology/yeasts",
        "country" | "countries" => "/countries",
        "region" | "regions" => "/travel/regions",
        _ => return Err(CategoryError::Unknown(category.to_string())),
    };
    Ok(endpoint)
}

/// JSON fields holding an item's code and name in an endpoint's listing
pub fn id_and_name_fields(endpoint: &str) -> Option<(&'static str, &'static str)> {
    let fields = match endpoint {
        "/diseases" => ("disease_code", "disease"),
        "/diseases/fingerprint/agents" => ("agent_code", "agent"),
        "/diseases/fingerprint/vectors" => ("vector_code", "vector"),
        "/diseases/fingerprint/vehicles" => ("vehicle_code", "vehicle"),
        "/diseases/fingerprint/reservoirs" => ("reservoir_code", "reservoir"),
        "/diseases/fingerprint/countries" => ("country_code", "country"),
        "/drugs" => ("drug_code", "drug"),
        "/vaccines" => ("vaccine_code", "vaccine"),
        "/microbiology/bacteria" => ("bacteria_code", "bacteria"),
        "/microbiology/mycobacteria" => ("mycobacteria_code", "mycobacteria"),
        "/microbiology/yeasts" => ("yeast_code", "yeast"),
        "/countries" => ("country_code", "country"),
        "/travel/regions" => ("region_code", "region"),
        _ => return None,
    };
    Some(fields)
}
