//! Error type for `ems-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ems_core::Error),

  /// The underlying persistence layer failed. Fatal for the attempted
  /// operation; the write must not be assumed to have committed.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored value could not be decoded back into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("employee not found: {0}")]
  NotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
