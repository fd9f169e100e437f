//! Agent API response models

use serde::{Deserialize, Serialize};

/// Minimal representation of a deployment, used for listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResponseLite {
    pub id: i64,
    pub name: String,
    pub redeployable: bool,
    #[serde(default)]
    pub service_ids: Vec<String>,
}

/// A deployment together with the live state of its services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResponseFull {
    pub id: i64,
    pub name: String,
    pub redeployable: bool,
    pub status: Status,
}

/// Health of each service in a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
}

/// Service ID and the state the adapter reports for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub id: String,
    #[serde(rename = "actualState")]
    pub actual_state: String,
}

/// Metadata for both the agent and its adapter.
///
/// The adapter part is whatever the adapter returned, or null when it could
/// not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub agent: AgentMetadata,
    #[serde(default)]
    pub adapter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub version: String,
}

/// Error body returned by the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
