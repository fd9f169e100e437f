//! Agent logging
//!
//! The configured level applies to the agent's own crates and to request
//! traces. Dependencies that log every query or connection are held at
//! `warn` unless `RUST_LOG` says otherwise.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::AgentError;

/// Crates that are too chatty at the agent's level
const QUIET_TARGETS: &[&str] = &["sqlx", "hyper", "hyper_util", "reqwest"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    ///
    /// Quiet targets never go below `warn`, but follow the agent to `error`.
    pub fn directives(self) -> String {
        let quiet = self.max(LogLevel::Warn).as_str();
        let mut directives = vec![self.as_str().to_string()];
        directives.extend(QUIET_TARGETS.iter().map(|t| format!("{}={}", t, quiet)));
        directives.join(",")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub log_level: LogLevel,

    /// One JSON object per event, for log shippers
    pub json_format: bool,
}

impl LogOptions {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.directives()))
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(options: LogOptions) -> Result<(), AgentError> {
    let registry = tracing_subscriber::registry().with(options.filter());

    let result = if options.json_format {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };
    result.map_err(|e| AgentError::ConfigError(format!("Unable to initialize logging: {}", e)))
}
