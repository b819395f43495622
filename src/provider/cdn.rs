//! HTTP client for the CDN provider API
//!
//! Version numbers in the URL address draft configuration; nothing a
//! client writes is visible to traffic until the version is activated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::spec::BackendSpec;

use super::{AccountHandle, CdnProvider, ServiceHandle, VersionHandle};

/// Header carrying the API token on every request
const API_TOKEN_HEADER: &str = "x-api-token";

/// REST client for the CDN provider
#[derive(Clone)]
pub struct CdnApiClient {
    client: Client,
    base_url: String,
}

impl CdnApiClient {
    /// Build an authenticated client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.api_token)
            .map_err(|_| Error::AuthError("API token contains invalid characters".to_string()))?;
        headers.insert(API_TOKEN_HEADER, token);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!("driftsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpError)?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CdnProvider for CdnApiClient {
    #[instrument(skip(self))]
    async fn find_service_by_name(&self, name: &str) -> Result<Option<ServiceHandle>> {
        let resp = self
            .client
            .get(self.url("/service/search"))
            .query(&[("name", name)])
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!("Service {} not found on provider", name);
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let handle: ServiceHandle = resp.json().await?;
        Ok(Some(handle))
    }

    async fn current_account(&self) -> Result<AccountHandle> {
        let resp = self.client.get(self.url("/current_account")).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(resp.json().await?)
    }

    #[instrument(skip(self))]
    async fn create_service(&self, account_id: &str, name: &str) -> Result<ServiceHandle> {
        let resp = self
            .client
            .post(self.url("/service"))
            .json(&json!({ "accountId": account_id, "name": name }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let handle: ServiceHandle = resp.json().await?;
        debug!("Provider created service {}", handle.id);
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn delete_service(&self, service_id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/service/{service_id}")))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_version(&self, service_id: &str) -> Result<VersionHandle> {
        let resp = self
            .client
            .post(self.url(&format!("/service/{service_id}/version")))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let version: VersionHandle = resp.json().await?;
        debug!("Opened draft version {} of {}", version.number, service_id);
        Ok(version)
    }

    async fn create_domain(&self, service_id: &str, version: u32, domain: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("/service/{service_id}/version/{version}/domain")))
            .json(&json!({ "name": domain }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        backend: &BackendSpec,
    ) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("/service/{service_id}/version/{version}/backend")))
            .json(backend)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn activate_version(&self, service_id: &str, version: u32) -> Result<()> {
        let resp = self
            .client
            .put(self.url(&format!("/service/{service_id}/version/{version}/activate")))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        debug!("Activated version {} of {}", version, service_id);
        Ok(())
    }
}

/// Map a non-success response to an error, keeping the provider's message
async fn error_from_response(resp: reqwest::Response) -> Error {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Error::NotFound;
    }
    let message = resp
        .text()
        .await
        .unwrap_or_else(|_| "no response body".to_string());
    Error::ApiError {
        status: status.as_u16(),
        message,
    }
}
