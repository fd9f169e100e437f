//! Agent API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Certificate, Client, Method};
use serde::de::DeserializeOwned;
use tracing::debug;

use outpost_api::{
    routes, DeploymentBlueprint, DeploymentResponseFull, DeploymentResponseLite, Metadata,
};

use crate::errors::{ClientError, RequestError};
use crate::remote::Remote;

/// Everything the CLI can ask of an agent
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn list_deployments(&self) -> Result<Vec<DeploymentResponseLite>, ClientError>;

    async fn describe_deployment(&self, id: &str) -> Result<DeploymentResponseFull, ClientError>;

    async fn create_deployment(
        &self,
        blueprint: &DeploymentBlueprint,
    ) -> Result<DeploymentResponseLite, ClientError>;

    async fn redeploy_deployment(&self, id: &str) -> Result<DeploymentResponseLite, ClientError>;

    async fn delete_deployment(&self, id: &str) -> Result<(), ClientError>;

    async fn get_metadata(&self) -> Result<Metadata, ClientError>;
}

/// HTTP transport settings shared by every client a factory builds
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    /// Accept any server certificate
    pub skip_verify: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            skip_verify: false,
        }
    }
}

/// [`AgentClient`] over HTTP(S)
pub struct ApiClient {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl ApiClient {
    pub fn new(remote: &Remote, options: &TransportOptions) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.skip_verify);

        if !remote.ca_pem.trim().is_empty() {
            let cert = Certificate::from_pem(remote.ca_pem.as_bytes())
                .map_err(|e| ClientError::Certificate(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: remote.endpoint.trim_end_matches('/').to_string(),
            username: remote.username.clone(),
            password: remote.password.clone(),
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<String, ClientError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(
            "Making request: {} {} {}",
            method,
            url,
            body.as_deref().map(String::from_utf8_lossy).unwrap_or_default()
        );

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Received response: {} {}", status.as_u16(), text);

        if status.as_u16() >= 400 {
            return Err(RequestError {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }
        Ok(text)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        let text = self.send(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl AgentClient for ApiClient {
    async fn list_deployments(&self) -> Result<Vec<DeploymentResponseLite>, ClientError> {
        self.request(Method::GET, routes::DEPLOYMENTS_PATH, None).await
    }

    async fn describe_deployment(&self, id: &str) -> Result<DeploymentResponseFull, ClientError> {
        self.request(Method::GET, &routes::deployment_path(id), None)
            .await
    }

    async fn create_deployment(
        &self,
        blueprint: &DeploymentBlueprint,
    ) -> Result<DeploymentResponseLite, ClientError> {
        let body = serde_json::to_vec(blueprint)?;
        self.request(Method::POST, routes::DEPLOYMENTS_PATH, Some(body))
            .await
    }

    async fn redeploy_deployment(&self, id: &str) -> Result<DeploymentResponseLite, ClientError> {
        self.request(Method::POST, &routes::redeploy_path(id), None)
            .await
    }

    async fn delete_deployment(&self, id: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, &routes::deployment_path(id), None)
            .await?;
        Ok(())
    }

    async fn get_metadata(&self) -> Result<Metadata, ClientError> {
        self.request(Method::GET, routes::METADATA_PATH, None).await
    }
}
