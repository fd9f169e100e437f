//! Deployment commands against a remote agent

use std::fs;
use std::path::Path;

use tracing::debug;

use outpost_api::{DeploymentBlueprint, Template};
use outpost_client::{ClientFactory, Remote};

use crate::config::FileConfig;
use crate::errors::{CliError, CliResult};
use crate::output::{DetailOutput, ListOutput, Output};

/// The remote named on the command line, or the active one.
pub fn resolve_remote(config: &FileConfig, name: Option<&str>) -> CliResult<Remote> {
    match name {
        Some(name) => config.get(name),
        None => config.active().cloned().ok_or_else(|| {
            CliError::Config("No active remote, add one with 'outpost remote add'".to_string())
        }),
    }
}

pub async fn list_deployments(factory: &dyn ClientFactory, remote: &Remote) -> CliResult<Output> {
    let client = factory.new_client(remote)?;
    let deployments = client.list_deployments().await?;

    if deployments.is_empty() {
        return Ok(Output::plain("No Deployments"));
    }

    let mut list = ListOutput::new(&["ID", "Name", "Services"]);
    for d in deployments {
        list.add_row(vec![d.id.to_string(), d.name, d.service_ids.len().to_string()]);
    }
    Ok(Output::List(list))
}

pub async fn describe_deployment(
    factory: &dyn ClientFactory,
    remote: &Remote,
    id: &str,
) -> CliResult<Output> {
    let client = factory.new_client(remote)?;
    let desc = client.describe_deployment(id).await?;

    let mut detail = DetailOutput::default();
    detail.add("ID", desc.id.to_string());
    detail.add("Name", desc.name);
    detail.add("Redeployable", desc.redeployable.to_string());

    let mut services = ListOutput::new(&["ID", "State"]);
    for s in desc.status.services {
        services.add_row(vec![s.id, s.actual_state]);
    }

    Ok(Output::Combined(vec![
        (String::new(), Output::Detail(detail)),
        ("Services".to_string(), Output::List(services)),
    ]))
}

/// Deploy the template at `template_path`, optionally with an override file.
pub async fn create_deployment(
    factory: &dyn ClientFactory,
    remote: &Remote,
    template_path: &Path,
    override_path: Option<&Path>,
) -> CliResult<Output> {
    let template = read_template(template_path)?;
    let overrides = match override_path {
        Some(path) => read_template(path)?,
        None => Template::default(),
    };
    let blueprint = DeploymentBlueprint {
        template,
        overrides,
    };

    let client = factory.new_client(remote)?;
    let created = client.create_deployment(&blueprint).await?;

    Ok(Output::plain(format!(
        "Template successfully deployed as '{}'",
        created.id
    )))
}

pub async fn redeploy_deployment(
    factory: &dyn ClientFactory,
    remote: &Remote,
    id: &str,
) -> CliResult<Output> {
    let client = factory.new_client(remote)?;
    let deployment = client.redeploy_deployment(id).await?;

    Ok(Output::plain(format!(
        "Redeployed '{}' as Deployment ID {}",
        deployment.name, deployment.id
    )))
}

pub async fn delete_deployment(
    factory: &dyn ClientFactory,
    remote: &Remote,
    id: &str,
) -> CliResult<Output> {
    let client = factory.new_client(remote)?;
    client.delete_deployment(id).await?;

    Ok(Output::plain(format!(
        "Successfully deleted deployment '{}'",
        id
    )))
}

/// Read a YAML or JSON template
fn read_template(path: &Path) -> CliResult<Template> {
    debug!("Reading template {}", path.display());
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}
