//! Settings file management

use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

use crate::errors::AgentError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Agent settings
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,

    /// Serve without basic auth
    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub adapter: AdapterSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    /// Basic auth credentials required on every request
    #[serde(default)]
    pub auth: Option<AuthSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            insecure: false,
            server: ServerSettings::default(),
            adapter: AdapterSettings::default(),
            database: DatabaseSettings::default(),
            auth: None,
        }
    }
}

impl Settings {
    /// Load settings from `file`, falling back to defaults when it does not exist.
    pub async fn load(file: &File) -> Result<Self, AgentError> {
        if !file.exists().await {
            info!(
                "Settings file {} not found, using defaults",
                file.path().display()
            );
            return Ok(Settings::default());
        }
        file.read_json().await
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Downstream adapter settings
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterSettings {
    /// Base URL of the adapter, without the `/v1` suffix
    #[serde(default = "default_adapter_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_adapter_timeout")]
    pub timeout_secs: u64,
}

fn default_adapter_endpoint() -> String {
    "http://localhost:8001".to_string()
}

fn default_adapter_timeout() -> u64 {
    10
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            endpoint: default_adapter_endpoint(),
            timeout_secs: default_adapter_timeout(),
        }
    }
}

/// Deployment database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://outpost-agent.db".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub username: String,
    pub password: SecretString,
}
