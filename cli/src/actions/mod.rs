//! CLI actions
//!
//! Each action returns the [`Output`](crate::output::Output) to print.

pub mod deployment;
pub mod remote;
