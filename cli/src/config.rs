//! Remote configuration file
//!
//! Remotes are stored as JSON next to the token they were added from, so
//! `remote token` can hand the original back out.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use outpost_client::Remote;

use crate::errors::{CliError, CliResult};

/// On-disk layout of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub active: String,
    #[serde(default)]
    pub remotes: Vec<Remote>,
}

/// Remote configuration backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    store: Store,
}

impl FileConfig {
    /// Load the configuration at `path`. A missing file is an empty config.
    pub fn load(path: impl Into<PathBuf>) -> CliResult<Self> {
        let path = path.into();
        let store = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CliError::Config(format!("Error parsing configuration file: {}", e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Store::default(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} remotes from {}", store.remotes.len(), path.display());

        Ok(Self { path, store })
    }

    /// `~/.outpost/config.json`
    pub fn default_path() -> CliResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Cannot find home directory".to_string()))?;
        Ok(home.join(".outpost").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode `token` and add it as remote `name`.
    pub fn save(&mut self, name: &str, token: &str) -> CliResult<()> {
        let remote = decode_token(name, token)?;
        self.store.remotes.push(remote);
        self.write()
    }

    pub fn remove(&mut self, name: &str) -> CliResult<()> {
        self.get(name)?;

        if self.store.active == name {
            self.store.active.clear();
        }
        self.store.remotes.retain(|r| r.name != name);
        self.write()
    }

    pub fn get(&self, name: &str) -> CliResult<Remote> {
        self.store
            .remotes
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| CliError::Config(format!("remote '{}' does not exist", name)))
    }

    pub fn remotes(&self) -> &[Remote] {
        &self.store.remotes
    }

    pub fn set_active(&mut self, name: &str) -> CliResult<()> {
        let remote = self.get(name)?;
        self.store.active = remote.name;
        self.write()
    }

    /// The active remote, if one is set and still configured
    pub fn active(&self) -> Option<&Remote> {
        if self.store.active.is_empty() {
            return None;
        }
        self.store.remotes.iter().find(|r| r.name == self.store.active)
    }

    fn write(&self) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.store)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(contents.as_bytes())?;

        // `mode` only applies to newly created files
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

/// Decode a remote token: base64 of `endpoint|username|password|ca_pem`.
pub fn decode_token(name: &str, token: &str) -> CliResult<Remote> {
    if token.is_empty() {
        return Err(CliError::Validation("Missing token".to_string()));
    }

    let decoded = STANDARD
        .decode(token)
        .map_err(|e| token_problem(e.to_string()))?;
    let decoded = String::from_utf8(decoded).map_err(|e| token_problem(e.to_string()))?;

    let fields: Vec<&str> = decoded.split('|').collect();
    let [endpoint, username, password, ca_pem] = fields.as_slice() else {
        return Err(token_problem("incorrect number of fields"));
    };

    Ok(Remote {
        name: name.to_string(),
        token: token.to_string(),
        endpoint: endpoint.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        ca_pem: ca_pem.to_string(),
    })
}

fn token_problem(reason: impl std::fmt::Display) -> CliError {
    CliError::Validation(format!("There was a problem with your token: {}", reason))
}
