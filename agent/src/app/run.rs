//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::adapter::HttpAdapterClient;
use crate::app::options::AppOptions;
use crate::deploy::DeploymentManager;
use crate::errors::AgentError;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::storage::deployments::SqliteStore;

/// Run the Outpost agent until `shutdown_signal` resolves
pub async fn run(
    agent_version: String,
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AgentError> {
    info!("Initializing Outpost Agent...");

    let store = SqliteStore::connect(&options.database_url).await?;
    let adapter = HttpAdapterClient::new(&options.adapter_endpoint, options.adapter_timeout)?;
    info!("Forwarding deployments to adapter at {}", adapter.base_url());

    let manager = DeploymentManager::new(Arc::new(store), Arc::new(adapter), agent_version);
    if options.credentials.is_none() {
        info!("Basic auth disabled, serving insecurely");
    }
    let state = Arc::new(ServerState::new(Arc::new(manager), options.credentials));

    let handle = serve(&options.server, state, shutdown_signal).await?;

    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!("Server task failed: {}", e);
            Err(AgentError::ServerError(e.to_string()))
        }
    }
}
