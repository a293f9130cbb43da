//! Core types and the duty-chain engine for the Stargate career tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! duty-chain engine ([`orchestrator::record_duty`]) runs against the narrow
//! synchronous [`repository`] traits so a backend can execute it inside a
//! single transaction; everything else talks to the async [`store`] trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chain;
pub mod duty;
pub mod enrollment;
pub mod error;
pub mod orchestrator;
pub mod person;
pub mod projector;
pub mod repository;
pub mod store;

#[cfg(test)]
mod memory;

pub use error::{Classify, Error, FailureKind, Result};
