//! Connection details for a remote agent

use serde::{Deserialize, Serialize};

/// A configured agent: where it lives and how to authenticate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    /// The token the remote was added from
    #[serde(default)]
    pub token: String,
    pub endpoint: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// PEM certificate trusted when talking to the agent
    #[serde(default)]
    pub ca_pem: String,
}
