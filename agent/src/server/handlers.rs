//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use outpost_api::DeploymentBlueprint;

use crate::server::error::ApiError;
use crate::server::state::ServerState;

/// GET /deployments
pub async fn list_deployments_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, ApiError> {
    let deployments = state.manager.list_deployments().await?;
    Ok(Json(deployments))
}

/// POST /deployments
pub async fn create_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Json(blueprint): Json<DeploymentBlueprint>,
) -> Result<impl IntoResponse, ApiError> {
    let deployment = state.manager.create_deployment(blueprint).await?;
    Ok((StatusCode::CREATED, Json(deployment)))
}

/// GET /deployments/{id}
pub async fn show_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deployment = state.manager.get_full_deployment(id).await?;
    Ok(Json(deployment))
}

/// DELETE /deployments/{id}
pub async fn delete_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.manager.delete_deployment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /deployments/{id}/redeploy
pub async fn redeploy_deployment_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deployment = state.manager.redeploy(id).await?;
    Ok((StatusCode::CREATED, Json(deployment)))
}

/// GET /metadata
pub async fn metadata_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.manager.fetch_metadata().await)
}
