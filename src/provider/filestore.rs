//! HTTP client for the managed filesystem provider API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};

use super::{CreateMountTarget, MountTargetHandle, MountTargetProvider};

/// REST client for the filesystem provider, authenticated with a bearer token
#[derive(Clone)]
pub struct FilestoreApiClient {
    client: Client,
    base_url: String,
}

impl FilestoreApiClient {
    /// Build an authenticated client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| Error::AuthError("API token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

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
impl MountTargetProvider for FilestoreApiClient {
    #[instrument(skip(self, params), fields(filesystem = %params.filesystem_id))]
    async fn create_mount_target(&self, params: &CreateMountTarget) -> Result<MountTargetHandle> {
        let resp = self
            .client
            .post(self.url("/v1/mount-targets"))
            .json(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let handle: MountTargetHandle = resp.json().await?;
        debug!("Provider created mount target {}", handle.id);
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn delete_mount_target(&self, mount_target_id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/v1/mount-targets/{mount_target_id}")))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        debug!("Provider deleted mount target {}", mount_target_id);
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
