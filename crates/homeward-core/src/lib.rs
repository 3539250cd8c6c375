//! Core types and workflow logic for the Homeward shelter network.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod animal;
pub mod error;
pub mod lifecycle;
pub mod ops;
pub mod policy;
pub mod role;
pub mod shelter;
pub mod store;
pub mod user;
pub mod vet;
pub mod visit;
pub mod visitor;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
