//! Agent API paths, shared by the server router and the client

pub const METADATA_PATH: &str = "/metadata";
pub const DEPLOYMENTS_PATH: &str = "/deployments";
pub const DEPLOYMENT_PATH: &str = "/deployments/{id}";
pub const REDEPLOY_PATH: &str = "/deployments/{id}/redeploy";

/// Path of a single deployment
pub fn deployment_path(id: &str) -> String {
    DEPLOYMENT_PATH.replacen("{id}", id, 1)
}

/// Path to redeploy a single deployment
pub fn redeploy_path(id: &str) -> String {
    REDEPLOY_PATH.replacen("{id}", id, 1)
}
