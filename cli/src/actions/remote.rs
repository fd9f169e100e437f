//! Remote agent management

use std::fs;
use std::path::Path;

use serde::Deserialize;

use outpost_client::ClientFactory;

use crate::actions::deployment::list_deployments;
use crate::config::FileConfig;
use crate::errors::{CliError, CliResult};
use crate::output::{DetailOutput, ListOutput, Output};

/// Add a remote from a token. The first remote added becomes active.
pub fn add_remote(config: &mut FileConfig, name: &str, token: &str) -> CliResult<Output> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CliError::Validation("Invalid name".to_string()));
    }
    if config.get(name).is_ok() {
        return Err(CliError::Validation("Name already exists".to_string()));
    }

    config.save(name, token.trim())?;
    if config.remotes().len() == 1 {
        config.set_active(name)?;
    }

    let mut message = "Successfully added!".to_string();
    if let Some(active) = config.active() {
        message.push_str(&format!(" '{}' is your active remote.", active.name));
    }
    Ok(Output::Plain(message))
}

/// Add a remote from a token stored in a file
pub fn add_remote_from_file(config: &mut FileConfig, name: &str, path: &Path) -> CliResult<Output> {
    let token = fs::read_to_string(path)?;
    add_remote(config, name, &token)
}

pub fn remove_remote(config: &mut FileConfig, name: &str) -> CliResult<Output> {
    config.remove(name)?;
    Ok(Output::plain(format!(
        "Successfully removed remote '{}' from configuration!",
        name
    )))
}

pub fn list_remotes(config: &FileConfig) -> Output {
    if config.remotes().is_empty() {
        return Output::plain("No remotes");
    }

    let active = config.active().map(|r| r.name.as_str());
    let mut list = ListOutput::new(&["Active", "Name", "Endpoint"]);
    for r in config.remotes() {
        let marker = if Some(r.name.as_str()) == active { "*" } else { "" };
        list.add_row(vec![marker.to_string(), r.name.clone(), r.endpoint.clone()]);
    }
    Output::List(list)
}

/// Fields the CLI shows from the otherwise opaque adapter metadata
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdapterSummary {
    #[serde(default)]
    version: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    is_healthy: bool,
}

/// Remote details, agent and adapter metadata, and its deployments
pub async fn describe_remote(
    config: &FileConfig,
    factory: &dyn ClientFactory,
    name: &str,
) -> CliResult<Output> {
    let remote = config.get(name)?;
    let is_active = config.active().is_some_and(|r| r.name == remote.name);

    let client = factory.new_client(&remote)?;
    let metadata = client.get_metadata().await?;
    let adapter: AdapterSummary = match metadata.adapter {
        Some(value) => serde_json::from_value(value)?,
        None => AdapterSummary::default(),
    };

    let mut detail = DetailOutput::default();
    detail.add("Name", remote.name.clone());
    detail.add("Active", is_active.to_string());
    detail.add("Endpoint", remote.endpoint.clone());
    detail.add("Agent Version", metadata.agent.version);
    detail.add("Adapter Version", adapter.version);
    detail.add("Adapter Type", adapter.kind);
    detail.add("Adapter Is Healthy", adapter.is_healthy.to_string());

    let deployments = list_deployments(factory, &remote).await?;

    Ok(Output::Combined(vec![
        (String::new(), Output::Detail(detail)),
        ("Deployments".to_string(), deployments),
    ]))
}

pub fn set_active_remote(config: &mut FileConfig, name: &str) -> CliResult<Output> {
    config.set_active(name)?;
    Ok(Output::plain(format!("'{}' is now your active remote!", name)))
}

pub fn remote_token(config: &FileConfig, name: &str) -> CliResult<Output> {
    let remote = config.get(name)?;
    Ok(Output::Plain(remote.token))
}
