//! Persistent state: the settings file and the deployment store

pub mod deployments;
pub mod settings;
