//! Server state

use std::sync::Arc;

use crate::deploy::Manager;
use crate::server::auth::Credentials;

/// Server state shared across handlers
pub struct ServerState {
    pub manager: Arc<dyn Manager>,
    /// Required basic auth credentials, `None` when serving insecurely
    pub credentials: Option<Credentials>,
}

impl ServerState {
    pub fn new(manager: Arc<dyn Manager>, credentials: Option<Credentials>) -> Self {
        Self {
            manager,
            credentials,
        }
    }
}
