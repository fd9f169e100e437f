//! Deployment module

pub mod manager;

pub use manager::{DeploymentManager, Manager};
