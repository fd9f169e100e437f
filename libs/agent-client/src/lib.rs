//! Outpost agent client
//!
//! Talks to a remote agent over its JSON API with basic auth.

pub mod client;
pub mod errors;
pub mod factory;
pub mod remote;

pub use client::{AgentClient, ApiClient, TransportOptions};
pub use errors::{ClientError, RequestError};
pub use factory::{ApiClientFactory, ClientFactory};
pub use remote::Remote;
