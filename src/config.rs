//! Provider endpoint and credential configuration
//!
//! Credentials are handed to client constructors explicitly; the
//! reconcilers themselves never read the environment.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Connection settings for one provider API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub endpoint: String,

    /// API token sent with every request
    pub api_token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Check that the config can authenticate a client
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::ConfigError(
                "provider endpoint is empty".to_string(),
            ));
        }
        if self.api_token.trim().is_empty() {
            return Err(Error::AuthError("API token is empty".to_string()));
        }
        Ok(())
    }

    /// Endpoint without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> String {
        self.endpoint.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = ProviderConfig::new("https://api.example.com", "token-1");
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let config = ProviderConfig::new("https://api.example.com", "  ");
        assert!(matches!(config.validate(), Err(Error::AuthError(_))));
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let config = ProviderConfig::new("", "token-1");
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = ProviderConfig::new("https://api.example.com/", "token-1");
        assert_eq!(config.base_url(), "https://api.example.com");
    }
}
