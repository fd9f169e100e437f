//! Persisted deployment records

use outpost_api::{DeploymentResponseLite, Image, Template};

use crate::errors::AgentError;
use crate::models::service::AdapterService;

/// A deployment row as stored by the agent.
///
/// `template` and `service_ids` are JSON documents kept as text. Rows are only
/// ever inserted or removed, never updated.
///
/// The template snapshot is written in the snake_case template format
/// (`host_port`, `volumes_from`), not the camelCase adapter payload. Rows from
/// agents that stored the adapter payload are not byte-compatible and their
/// ports and volumes will not decode for redeploy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployment {
    /// Assigned by the store on save
    pub id: i64,
    pub name: String,
    /// JSON array of adapter service IDs, in adapter order
    pub service_ids: String,
    /// JSON snapshot of the merged template, empty when unknown
    pub template: String,
}

impl Deployment {
    /// Build an unsaved record for freshly created services.
    pub fn new(
        name: &str,
        images: Vec<Image>,
        services: &[AdapterService],
    ) -> Result<Self, AgentError> {
        let snapshot = Template {
            name: name.to_string(),
            images,
        };
        let ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();

        Ok(Self {
            id: 0,
            name: name.to_string(),
            service_ids: serde_json::to_string(&ids)?,
            template: serde_json::to_string(&snapshot)?,
        })
    }

    pub fn is_redeployable(&self) -> bool {
        !self.template.is_empty()
    }

    /// Stored service IDs; an empty column means none.
    pub fn decode_service_ids(&self) -> Result<Vec<String>, AgentError> {
        if self.service_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&self.service_ids)?)
    }

    /// Stored template snapshot.
    pub fn decode_template(&self) -> Result<Template, AgentError> {
        if self.template.is_empty() {
            return Err(AgentError::ValidationError(format!(
                "deployment '{}' has no stored template",
                self.id
            )));
        }
        Ok(serde_json::from_str(&self.template)?)
    }

    /// Lite projection; unreadable service IDs show up as an empty list.
    pub fn to_lite(&self) -> DeploymentResponseLite {
        DeploymentResponseLite {
            id: self.id,
            name: self.name.clone(),
            redeployable: self.is_redeployable(),
            service_ids: self.decode_service_ids().unwrap_or_default(),
        }
    }
}
