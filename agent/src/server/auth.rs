//! Basic authentication middleware

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::debug;

use outpost_api::ErrorResponse;

use crate::server::state::ServerState;

const REALM: &str = "Basic realm=\"outpost-agent\"";

/// Username and password every request must present
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    digest: [u8; 32],
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        let username = username.into();
        let digest = credentials_digest(&username, password.expose_secret());
        Self {
            username,
            password,
            digest,
        }
    }

    /// Compares digests in constant time, whatever the input lengths.
    fn matches(&self, username: &str, password: &str) -> bool {
        let presented = credentials_digest(username, password);
        self.digest
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn credentials_digest(username: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Reject requests without matching basic auth when credentials are set.
pub async fn require_basic_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(credentials) = &state.credentials else {
        return next.run(request).await;
    };

    match basic_auth(request.headers()) {
        Some((username, password)) if credentials.matches(&username, &password) => {
            next.run(request).await
        }
        _ => {
            debug!("Rejected unauthenticated request to {}", request.uri());
            unauthorized()
        }
    }
}

fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM)],
        Json(ErrorResponse {
            error: "unauthorized".to_string(),
        }),
    )
        .into_response()
}
