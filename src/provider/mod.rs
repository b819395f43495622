//! Provider capability consumed by the reconcilers
//!
//! The traits here are the only provider surface the reconcilers see.
//! HTTP implementations live in the sibling modules; tests substitute
//! in-memory fakes.

mod cdn;
mod filestore;

pub use cdn::CdnApiClient;
pub use filestore::FilestoreApiClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spec::BackendSpec;

/// Current attributes of a mount target as last observed from the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountTargetHandle {
    pub id: String,
    pub filesystem_id: String,
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    /// Provider-side lifecycle phase (e.g. "creating", "available")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<String>,
}

/// Creation attributes for a mount target
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMountTarget {
    pub filesystem_id: String,
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
}

/// A CDN service as observed from the provider
///
/// Domains and backends reflect the active version's configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHandle {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backends: Vec<BackendSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Account owning newly created services
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHandle {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A draft configuration version of a CDN service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHandle {
    pub number: u32,
    #[serde(default)]
    pub active: bool,
}

/// Provider capability for filesystem mount targets
#[async_trait]
pub trait MountTargetProvider {
    /// Create a fresh mount target from creation attributes
    async fn create_mount_target(&self, params: &CreateMountTarget) -> Result<MountTargetHandle>;

    /// Delete a mount target by id; `Error::NotFound` when it is already gone
    async fn delete_mount_target(&self, mount_target_id: &str) -> Result<()>;
}

/// Provider capability for CDN services
#[async_trait]
pub trait CdnProvider {
    /// Resolve a service by name; `Ok(None)` when it does not exist
    async fn find_service_by_name(&self, name: &str) -> Result<Option<ServiceHandle>>;

    /// Account the authenticated credentials belong to
    async fn current_account(&self) -> Result<AccountHandle>;

    async fn create_service(&self, account_id: &str, name: &str) -> Result<ServiceHandle>;

    async fn delete_service(&self, service_id: &str) -> Result<()>;

    /// Open a new mutable version of the service
    async fn create_version(&self, service_id: &str) -> Result<VersionHandle>;

    async fn create_domain(&self, service_id: &str, version: u32, domain: &str) -> Result<()>;

    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        backend: &BackendSpec,
    ) -> Result<()>;

    /// Make the given version the live configuration
    async fn activate_version(&self, service_id: &str, version: u32) -> Result<()>;
}
