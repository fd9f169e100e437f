//! Downstream adapter: HTTP client and payload encoding

pub mod client;
pub mod wire;

pub use client::{AdapterClient, HttpAdapterClient};
pub use wire::encode_images;
