//! SQLite backend for the EMS employee store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on one dedicated
//! thread without blocking the async runtime. That single connection thread
//! also serialises every read and write, which preserves the roster's
//! single-writer discipline without explicit locking.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
