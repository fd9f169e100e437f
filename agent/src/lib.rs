//! Outpost Agent Library
//!
//! Serves deployment CRUD over HTTP, records deployments in SQLite and
//! forwards container work to an adapter.

pub mod adapter;
pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod server;
pub mod storage;
pub mod utils;
