//! CDN service specification
//!
//! A CDN service is a composite resource: a named service plus ordered
//! domains and backends. Domains and backends are applied to a draft
//! version of the service and go live only when that version is activated.

use serde::{Deserialize, Serialize};

use super::types::{DesiredState, SpecValidationError};

/// Desired state of a CDN service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnServiceSpec {
    /// Service name; the identity the provider is queried by
    pub name: String,

    /// Domains the service serves, in application order
    #[serde(default)]
    pub domains: Vec<String>,

    /// Origin backends, in application order
    #[serde(default)]
    pub backends: Vec<BackendSpec>,
}

impl CdnServiceSpec {
    /// Validate the spec against the requested state
    pub fn validate(&self, desired: DesiredState) -> Result<(), SpecValidationError> {
        if self.name.trim().is_empty() {
            return Err(SpecValidationError::new(
                "name",
                "must not be empty",
                "set name to the service to manage",
            ));
        }

        if desired == DesiredState::Present {
            for domain in &self.domains {
                if domain.trim().is_empty() {
                    return Err(SpecValidationError::new(
                        "domains",
                        "entries must not be empty",
                        "remove the empty domain entry",
                    ));
                }
            }
            for backend in &self.backends {
                backend.validate()?;
            }
        }

        Ok(())
    }
}

/// Origin backend for a CDN service version
///
/// Only `name` and `address` are required; tuning fields left unset are
/// omitted from the provider payload and defaulted server-side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSpec {
    pub name: String,

    /// Origin host the backend forwards to
    pub address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ssl: Option<bool>,

    /// Connection establishment timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u32>,

    /// Time allowed until the first response byte, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_byte_timeout_ms: Option<u32>,

    /// Maximum gap between response bytes, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub between_bytes_timeout_ms: Option<u32>,

    /// Consecutive errors before the backend is marked unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_threshold: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,

    /// Load-balancing weight relative to the service's other backends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_loadbalance: Option<bool>,

    /// Shield POP the backend is fronted by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield: Option<String>,

    /// Named request condition gating traffic to this backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_condition: Option<String>,

    /// Named health check attached to this backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl BackendSpec {
    fn validate(&self) -> Result<(), SpecValidationError> {
        if self.name.trim().is_empty() {
            return Err(SpecValidationError::new(
                "backends.name",
                "must not be empty",
                "give every backend a name",
            ));
        }
        if self.address.trim().is_empty() {
            return Err(SpecValidationError::new(
                "backends.address",
                "must not be empty",
                "set the backend's origin address",
            ));
        }
        Ok(())
    }

    /// Short identification used when a backend fails to apply
    pub fn describe(&self) -> String {
        match self.port {
            Some(port) => format!("backend {} ({}:{})", self.name, self.address, port),
            None => format!("backend {} ({})", self.name, self.address),
        }
    }
}
