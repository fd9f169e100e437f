//! Agent-side models

pub mod deployment;
pub mod service;
