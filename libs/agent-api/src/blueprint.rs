//! Deployment blueprints: templates, images and the override merge
//!
//! These types use the input format: snake_case keys, numbers that may be
//! strings, empty fields left out on encode. The adapter payload is a separate
//! projection built by the agent.

use serde::{Deserialize, Serialize};

use crate::int_or_string::IntOrString;

/// Everything needed to kick off a deployment.
///
/// The override is a sparse template; only replica counts and environment
/// variables of same-named images are honored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentBlueprint {
    #[serde(default, skip_serializing_if = "Template::is_empty")]
    pub template: Template,

    #[serde(default, rename = "override", skip_serializing_if = "Template::is_empty")]
    pub overrides: Template,
}

impl DeploymentBlueprint {
    /// Blueprint for a bare template with nothing to override.
    pub fn from_template(template: Template) -> Self {
        Self {
            template,
            overrides: Template::default(),
        }
    }

    /// The template images with the override applied.
    pub fn merged_images(&self) -> Vec<Image> {
        merge(&self.template, &self.overrides)
    }
}

/// A named list of images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.images.is_empty()
    }
}

/// One container specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    #[serde(default, skip_serializing_if = "DeploymentSettings::is_empty")]
    pub deployment: DeploymentSettings,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<Environment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<IntOrString>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    #[serde(
        default,
        alias = "volumesFrom",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub volumes_from: Vec<String>,
}

impl Image {
    fn override_with(&mut self, o: &Image, env_pool: &mut Vec<Environment>) {
        self.override_environment(env_pool);
        self.override_deployment(o);
    }

    fn override_deployment(&mut self, o: &Image) {
        if !o.deployment.is_empty() {
            self.deployment = o.deployment.clone();
        }
    }

    // Every base variable is followed by whatever is still left in the pool.
    fn override_environment(&mut self, env_pool: &mut Vec<Environment>) {
        let base = std::mem::take(&mut self.environment);
        let mut merged = Vec::with_capacity(base.len() + env_pool.len());

        for env in base {
            let entry = match env_pool.iter().position(|o| o.variable == env.variable) {
                Some(i) => env_pool.remove(i),
                None => env,
            };
            merged.push(entry);
            merged.extend(env_pool.iter().cloned());
        }

        self.environment = merged;
    }
}

/// Orchestrator specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    #[serde(default)]
    pub count: IntOrString,
}

impl DeploymentSettings {
    pub fn is_empty(&self) -> bool {
        self.count.is_zero()
    }
}

/// A link to another image of the same template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

/// An environment variable passed to the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub variable: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Environment {
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

/// A host to container port mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default)]
    pub host_port: IntOrString,

    #[serde(default)]
    pub container_port: IntOrString,
}

/// A host to container path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub container_path: String,

    #[serde(default)]
    pub host_path: String,
}

/// Merge `overrides` on top of `template`.
///
/// The result always has one image per template image, in template order.
/// Override images without a same-named template image are dropped. Each
/// override image's environment list is consumed as a pool for the whole call,
/// so duplicate template names see what earlier matches left behind.
pub fn merge(template: &Template, overrides: &Template) -> Vec<Image> {
    let mut env_pools: Vec<Vec<Environment>> = overrides
        .images
        .iter()
        .map(|o| o.environment.clone())
        .collect();

    template
        .images
        .iter()
        .map(|base| {
            let mut merged = base.clone();
            for (o, pool) in overrides.images.iter().zip(env_pools.iter_mut()) {
                if o.name == base.name {
                    merged.override_with(o, pool);
                }
            }
            merged
        })
        .collect()
}
