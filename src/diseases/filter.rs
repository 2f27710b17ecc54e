//! Disease filtering by fingerprint attributes

use crate::query::{Gideon, Params, QueryError, QueryOptions};
use crate::table::Tabular;

/// Attributes a disease must match; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseFilter {
    pub agent: Option<i64>,
    pub vector: Option<String>,
    pub vehicle: Option<String>,
    pub reservoir: Option<String>,
    pub country: Option<String>,
}

impl DiseaseFilter {
    /// URL parameters for the set fields
    pub fn params(&self) -> Params {
        let mut params = Params::new();
        if let Some(agent) = self.agent {
            params.insert("agent", agent);
        }
        let text_fields = [
            ("vector", &self.vector),
            ("vehicle", &self.vehicle),
            ("reservoir", &self.reservoir),
            ("country", &self.country),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                params.insert(key, value);
            }
        }
        params
    }
}

/// Diseases matching every set attribute of `filter`
pub async fn filter_diseases(client: &Gideon, filter: &DiseaseFilter) -> Result<Tabular, QueryError> {
    client
        .query_table("/diseases/filter", &filter.params(), QueryOptions::default())
        .await
}
