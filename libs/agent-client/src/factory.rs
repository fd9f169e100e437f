//! Client construction

use crate::client::{AgentClient, ApiClient, TransportOptions};
use crate::errors::ClientError;
use crate::remote::Remote;

/// Builds agent clients for remotes
pub trait ClientFactory: Send + Sync {
    fn new_client(&self, remote: &Remote) -> Result<Box<dyn AgentClient>, ClientError>;
}

/// Factory for [`ApiClient`]s sharing one set of transport options
#[derive(Debug, Clone, Default)]
pub struct ApiClientFactory {
    pub options: TransportOptions,
}

impl ApiClientFactory {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }
}

impl ClientFactory for ApiClientFactory {
    fn new_client(&self, remote: &Remote) -> Result<Box<dyn AgentClient>, ClientError> {
        Ok(Box::new(ApiClient::new(remote, &self.options)?))
    }
}
