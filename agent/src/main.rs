//! Outpost Agent - Entry Point
//!
//! Remote deployment agent sitting in front of an orchestration adapter.

use std::process;

use clap::Parser;
use secrecy::SecretString;
use tracing::{error, info};

use outpost_agent::app::options::AppOptions;
use outpost_agent::app::run::run;
use outpost_agent::filesys::file::File;
use outpost_agent::logs::{init_logging, LogLevel, LogOptions};
use outpost_agent::storage::settings::{AuthSettings, Settings};
use outpost_agent::utils::version_info;

#[derive(Parser, Debug)]
#[command(name = "outpost-agent", version, about = "Outpost remote deployment agent")]
struct Args {
    /// Settings file
    #[arg(long, env = "OUTPOST_SETTINGS", default_value = "settings.json")]
    settings: String,

    /// Address to bind to
    #[arg(long, env = "OUTPOST_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "OUTPOST_PORT")]
    port: Option<u16>,

    /// Adapter base URL
    #[arg(long, env = "OUTPOST_ADAPTER_ENDPOINT")]
    adapter_endpoint: Option<String>,

    /// Deployment database URL
    #[arg(long, env = "OUTPOST_DATABASE_URL")]
    database_url: Option<String>,

    /// Basic auth username
    #[arg(long, env = "OUTPOST_USERNAME")]
    username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "OUTPOST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Serve without basic auth
    #[arg(long)]
    insecure: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "OUTPOST_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Print version information and exit
    #[arg(long)]
    version_info: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(endpoint) = self.adapter_endpoint {
            settings.adapter.endpoint = endpoint;
        }
        if let Some(url) = self.database_url {
            settings.database.url = url;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }
        if self.insecure {
            settings.insecure = true;
        }

        match (self.username, self.password) {
            (Some(username), Some(password)) => {
                settings.auth = Some(AuthSettings {
                    username,
                    password: SecretString::from(password),
                });
            }
            (Some(username), None) => {
                if let Some(auth) = settings.auth.as_mut() {
                    auth.username = username;
                }
            }
            (None, Some(password)) => {
                if let Some(auth) = settings.auth.as_mut() {
                    auth.password = SecretString::from(password);
                }
            }
            (None, None) => {}
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let version = version_info();
    if args.version_info {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    let settings_file = File::new(&args.settings);
    let mut settings = match Settings::load(&settings_file).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {}", e);
            process::exit(1);
        }
    };
    args.apply(&mut settings);

    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.json_logs,
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let options = match AppOptions::try_from(settings) {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    info!(
        "Running Outpost Agent {} ({}) with options: {:?}",
        version.version, version.git_hash, options
    );
    if let Err(e) = run(version.version, options, await_shutdown_signal()).await {
        error!("Failed to run the agent: {e}");
        process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Unable to install signal handlers: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
