//! Error types for `ems-core`.

use thiserror::Error;

/// One failed validation check: the offending field plus a human-readable
/// reason. A single bad draft can produce several of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field:  &'static str,
  pub reason: String,
}

impl std::fmt::Display for FieldError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.field, self.reason)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// Caller-supplied fields failed validation. Carries every failing field,
  /// not just the first; no partial write occurs.
  #[error("validation failed: {}", join_fields(.0))]
  Validation(Vec<FieldError>),

  #[error("employee not found: {0}")]
  NotFound(i64),

  #[error("unknown department: {0:?}")]
  UnknownDepartment(String),

  #[error("unknown employment status: {0:?}")]
  UnknownStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

fn join_fields(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
