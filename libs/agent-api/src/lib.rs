//! Outpost agent API models
//!
//! Blueprint types shared by the agent, its client library and the CLI,
//! plus the JSON shapes the agent answers with.

pub mod blueprint;
pub mod int_or_string;
pub mod responses;
pub mod routes;

pub use blueprint::{
    merge, DeploymentBlueprint, DeploymentSettings, Environment, Image, Link, Port, Template,
    Volume,
};
pub use int_or_string::IntOrString;
pub use responses::{
    AgentMetadata, DeploymentResponseFull, DeploymentResponseLite, ErrorResponse, Metadata,
    ServiceStatus, Status,
};
