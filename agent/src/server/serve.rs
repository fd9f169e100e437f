//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use outpost_api::routes::{DEPLOYMENTS_PATH, DEPLOYMENT_PATH, METADATA_PATH, REDEPLOY_PATH};

use crate::app::options::ServerOptions;
use crate::errors::AgentError;
use crate::server::auth::require_basic_auth;
use crate::server::handlers::{
    create_deployment_handler, delete_deployment_handler, list_deployments_handler,
    metadata_handler, redeploy_deployment_handler, show_deployment_handler,
};
use crate::server::state::ServerState;

/// Build the API router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Deployments
        .route(
            DEPLOYMENTS_PATH,
            get(list_deployments_handler).post(create_deployment_handler),
        )
        .route(
            DEPLOYMENT_PATH,
            get(show_deployment_handler).delete(delete_deployment_handler),
        )
        .route(REDEPLOY_PATH, post(redeploy_deployment_handler))
        // Metadata
        .route(METADATA_PATH, get(metadata_handler))
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), AgentError>>, AgentError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| AgentError::ServerError(e.to_string()))
    });

    Ok(handle)
}
