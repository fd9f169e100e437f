//! Adapter HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, error};

use crate::errors::AgentError;
use crate::models::service::{ActualState, AdapterService};

/// Operations the agent needs from the adapter
#[async_trait]
pub trait AdapterClient: Send + Sync {
    /// Create one service per encoded image, returned in request order.
    async fn create_services(&self, payload: Vec<u8>) -> Result<Vec<AdapterService>, AgentError>;

    /// Look up a service. 404 and other unexpected statuses are reported in
    /// the returned state rather than as errors.
    async fn get_service(&self, id: &str) -> Result<AdapterService, AgentError>;

    async fn delete_service(&self, id: &str) -> Result<(), AgentError>;

    /// Raw adapter metadata.
    async fn fetch_metadata(&self) -> Result<serde_json::Value, AgentError>;
}

/// Adapter client over HTTP
pub struct HttpAdapterClient {
    client: Client,
    base_url: String,
}

impl HttpAdapterClient {
    /// Create a client for the adapter at `endpoint`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/v1", endpoint.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn services_url(&self) -> String {
        format!("{}/services", self.base_url)
    }

    fn service_url(&self, id: &str) -> String {
        format!("{}/services/{}", self.base_url, id)
    }
}

#[async_trait]
impl AdapterClient for HttpAdapterClient {
    async fn create_services(&self, payload: Vec<u8>) -> Result<Vec<AdapterService>, AgentError> {
        let url = self.services_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            error!("Adapter service creation failed: {} - {}", status, body);
            return Err(AgentError::AdapterError(format!(
                "Failed to create services, resp code: {}, body: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_service(&self, id: &str) -> Result<AdapterService, AgentError> {
        let url = self.service_url(id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Ok(AdapterService::new(id, ActualState::NotFound)),
            status => {
                debug!("Adapter returned {} for service {}", status, id);
                Ok(AdapterService::new(id, ActualState::Error))
            }
        }
    }

    async fn delete_service(&self, id: &str) -> Result<(), AgentError> {
        let url = self.service_url(id);
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Adapter service deletion failed: {} - {}", status, body);
            return Err(AgentError::AdapterError(format!(
                "Failed to delete service '{}', resp code: {}, body: {}",
                id,
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }

    async fn fetch_metadata(&self) -> Result<serde_json::Value, AgentError> {
        let url = format!("{}/metadata", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::AdapterError(format!(
                "Failed to fetch metadata, resp code: {}, body: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(response.json().await?)
    }
}
