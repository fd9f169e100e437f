//! Adapter payload encoding
//!
//! The adapter expects camelCase keys, link targets under `name`, and no
//! empty fields. Keys are written in sorted order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use outpost_api::{Environment, Image, IntOrString, Link, Port, Volume};

use crate::errors::AgentError;

/// Encode merged images as the body of a create-services request.
pub fn encode_images(images: &[Image]) -> Result<Vec<u8>, AgentError> {
    let payload: Vec<ImagePayload<'_>> = images.iter().map(ImagePayload).collect();
    Ok(serde_json::to_vec(&payload)?)
}

/// Adapter view of an image.
pub struct ImagePayload<'a>(pub &'a Image);

impl Serialize for ImagePayload<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let img = self.0;
        let mut map = serializer.serialize_map(None)?;

        if !img.command.is_empty() {
            map.serialize_entry("command", &img.command)?;
        }
        if !img.deployment.is_empty() {
            map.serialize_entry("deployment", &DeploymentPayload { count: img.deployment.count })?;
        }
        if !img.environment.is_empty() {
            let envs: Vec<EnvironmentPayload<'_>> =
                img.environment.iter().map(EnvironmentPayload::from).collect();
            map.serialize_entry("environment", &envs)?;
        }
        if !img.expose.is_empty() {
            map.serialize_entry("expose", &img.expose)?;
        }
        if !img.links.is_empty() {
            let links: Vec<LinkPayload<'_>> = img.links.iter().map(LinkPayload::from).collect();
            map.serialize_entry("links", &links)?;
        }
        if !img.name.is_empty() {
            map.serialize_entry("name", &img.name)?;
        }
        if !img.ports.is_empty() {
            let ports: Vec<PortPayload> = img.ports.iter().map(PortPayload::from).collect();
            map.serialize_entry("ports", &ports)?;
        }
        if !img.source.is_empty() {
            map.serialize_entry("source", &img.source)?;
        }
        if !img.volumes.is_empty() {
            let volumes: Vec<VolumePayload<'_>> =
                img.volumes.iter().map(VolumePayload::from).collect();
            map.serialize_entry("volumes", &volumes)?;
        }
        if !img.volumes_from.is_empty() {
            map.serialize_entry("volumesFrom", &img.volumes_from)?;
        }

        map.end()
    }
}

#[derive(Serialize)]
struct DeploymentPayload {
    count: IntOrString,
}

#[derive(Serialize)]
struct EnvironmentPayload<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    variable: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    value: &'a str,
}

impl<'a> From<&'a Environment> for EnvironmentPayload<'a> {
    fn from(env: &'a Environment) -> Self {
        Self {
            variable: &env.variable,
            value: &env.value,
        }
    }
}

#[derive(Serialize)]
struct LinkPayload<'a> {
    alias: &'a str,
    name: &'a str,
}

impl<'a> From<&'a Link> for LinkPayload<'a> {
    fn from(link: &'a Link) -> Self {
        Self {
            alias: &link.alias,
            name: &link.service,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortPayload {
    container_port: IntOrString,
    host_port: IntOrString,
}

impl From<&Port> for PortPayload {
    fn from(port: &Port) -> Self {
        Self {
            container_port: port.container_port,
            host_port: port.host_port,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VolumePayload<'a> {
    container_path: &'a str,
    host_path: &'a str,
}

impl<'a> From<&'a Volume> for VolumePayload<'a> {
    fn from(volume: &'a Volume) -> Self {
        Self {
            container_path: &volume.container_path,
            host_path: &volume.host_path,
        }
    }
}
