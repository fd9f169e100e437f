//! Application configuration options

use std::time::Duration;

use crate::errors::AgentError;
use crate::server::auth::Credentials;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Server configuration
    pub server: ServerOptions,

    /// Adapter base URL
    pub adapter_endpoint: String,

    /// Timeout applied to each adapter request
    pub adapter_timeout: Duration,

    /// Deployment database URL
    pub database_url: String,

    /// Basic auth credentials; `None` only when running insecurely
    pub credentials: Option<Credentials>,
}

impl TryFrom<Settings> for AppOptions {
    type Error = AgentError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        let credentials = match (settings.auth, settings.insecure) {
            (_, true) => None,
            (Some(auth), false) if !auth.username.is_empty() => {
                Some(Credentials::new(auth.username, auth.password))
            }
            _ => {
                return Err(AgentError::ConfigError(
                    "basic auth credentials are required unless running with --insecure"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            server: ServerOptions {
                host: settings.server.host,
                port: settings.server.port,
            },
            adapter_endpoint: settings.adapter.endpoint,
            adapter_timeout: Duration::from_secs(settings.adapter.timeout_secs),
            database_url: settings.database.url,
            credentials,
        })
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
