//! API key handling for GIDEON requests

use super::QueryError;

/// Holds the API key used to authorize every request
#[derive(Debug, Clone, Default)]
pub struct Authorization {
    api_key: Option<String>,
}

impl Authorization {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// Value of the `Authorization` header
    ///
    /// Fails with `QueryError::MissingApiKey` when no key is set or it is blank.
    pub fn header_value(&self) -> Result<String, QueryError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(format!("api_key {}", key)),
            _ => Err(QueryError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_formats_key() {
        let auth = Authorization::new(Some("secret".to_string()));
        assert_eq!(auth.header_value().unwrap(), "api_key secret");
    }

    #[test]
    fn test_missing_key_is_error() {
        let auth = Authorization::new(None);
        assert!(matches!(auth.header_value(), Err(QueryError::MissingApiKey)));
    }

    #[test]
    fn test_empty_key_is_error() {
        let auth = Authorization::new(Some("  ".to_string()));
        assert!(matches!(auth.header_value(), Err(QueryError::MissingApiKey)));
    }

    #[test]
    fn test_set_api_key_after_construction() {
        let mut auth = Authorization::default();
        auth.set_api_key("later");
        assert_eq!(auth.header_value().unwrap(), "api_key later");
    }
}
