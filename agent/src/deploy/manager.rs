//! Deployment manager
//!
//! Drives the blueprint pipeline: merge the override into the template,
//! ask the adapter for services, then record which services belong to the
//! deployment. Nothing is rolled back when a later step fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use outpost_api::{
    AgentMetadata, DeploymentBlueprint, DeploymentResponseFull, DeploymentResponseLite, Metadata,
    Status,
};

use crate::adapter::{encode_images, AdapterClient};
use crate::errors::AgentError;
use crate::models::deployment::Deployment;
use crate::storage::deployments::DeploymentStore;

/// Deployment operations exposed over the API
#[async_trait]
pub trait Manager: Send + Sync {
    async fn list_deployments(&self) -> Result<Vec<DeploymentResponseLite>, AgentError>;

    /// A deployment together with the live state of each of its services.
    async fn get_full_deployment(&self, id: i64) -> Result<DeploymentResponseFull, AgentError>;

    async fn get_deployment(&self, id: i64) -> Result<DeploymentResponseLite, AgentError>;

    /// Delete every service, then the record. Stops at the first failure.
    async fn delete_deployment(&self, id: i64) -> Result<(), AgentError>;

    async fn create_deployment(
        &self,
        blueprint: DeploymentBlueprint,
    ) -> Result<DeploymentResponseLite, AgentError>;

    /// Tear down a deployment and create it again from its stored template.
    async fn redeploy(&self, id: i64) -> Result<DeploymentResponseLite, AgentError>;

    /// Agent and adapter metadata. Adapter failures leave `adapter` empty.
    async fn fetch_metadata(&self) -> Metadata;
}

/// Manager backed by a deployment store and an adapter
pub struct DeploymentManager {
    store: Arc<dyn DeploymentStore>,
    adapter: Arc<dyn AdapterClient>,
    version: String,
}

impl DeploymentManager {
    pub fn new(
        store: Arc<dyn DeploymentStore>,
        adapter: Arc<dyn AdapterClient>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            adapter,
            version: version.into(),
        }
    }
}

#[async_trait]
impl Manager for DeploymentManager {
    async fn list_deployments(&self) -> Result<Vec<DeploymentResponseLite>, AgentError> {
        let deployments = self.store.all().await?;
        Ok(deployments.iter().map(Deployment::to_lite).collect())
    }

    async fn get_full_deployment(&self, id: i64) -> Result<DeploymentResponseFull, AgentError> {
        let deployment = self.store.find_by_id(id).await?;
        let lite = deployment.to_lite();

        let mut services = Vec::with_capacity(lite.service_ids.len());
        for service_id in &lite.service_ids {
            let service = self.adapter.get_service(service_id).await?;
            services.push(service.to_status());
        }

        Ok(DeploymentResponseFull {
            id: lite.id,
            name: lite.name,
            redeployable: lite.redeployable,
            status: Status { services },
        })
    }

    async fn get_deployment(&self, id: i64) -> Result<DeploymentResponseLite, AgentError> {
        let deployment = self.store.find_by_id(id).await?;
        Ok(deployment.to_lite())
    }

    async fn delete_deployment(&self, id: i64) -> Result<(), AgentError> {
        let deployment = self.store.find_by_id(id).await?;
        let service_ids = deployment.decode_service_ids()?;

        for service_id in &service_ids {
            debug!("Deleting service {} of deployment '{}'", service_id, id);
            self.adapter.delete_service(service_id).await?;
        }

        self.store.remove(id).await?;
        info!("Deleted deployment '{}'", id);
        Ok(())
    }

    async fn create_deployment(
        &self,
        blueprint: DeploymentBlueprint,
    ) -> Result<DeploymentResponseLite, AgentError> {
        let images = blueprint.merged_images();
        let payload = encode_images(&images)?;

        let services = self.adapter.create_services(payload).await?;

        let mut deployment = Deployment::new(&blueprint.template.name, images, &services)?;
        self.store.save(&mut deployment).await?;

        info!(
            "Created deployment '{}' ({}) with {} services",
            deployment.id,
            deployment.name,
            services.len()
        );
        Ok(deployment.to_lite())
    }

    async fn redeploy(&self, id: i64) -> Result<DeploymentResponseLite, AgentError> {
        let deployment = self.store.find_by_id(id).await?;
        let template = deployment.decode_template()?;

        self.delete_deployment(id).await?;
        self.create_deployment(DeploymentBlueprint::from_template(template))
            .await
    }

    async fn fetch_metadata(&self) -> Metadata {
        let adapter = match self.adapter.fetch_metadata().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Unable to fetch adapter metadata: {}", e);
                None
            }
        };

        Metadata {
            agent: AgentMetadata {
                version: self.version.clone(),
            },
            adapter,
        }
    }
}
