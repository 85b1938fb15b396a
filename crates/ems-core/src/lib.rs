//! Core types and trait definitions for the EMS employee roster.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing heavyweight.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod employee;
pub mod error;
pub mod insight;
pub mod review;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
