//! SQLite backend for the Stargate career store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Duty recording runs the core engine
//! inside one `BEGIN IMMEDIATE` transaction per call.

mod encode;
mod locks;
mod repository;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
