//! Cached insight snapshots.
//!
//! An opaque type tag plus a serialized payload. The store keeps at most one
//! snapshot per kind (overwrite-on-write); nothing depends on a snapshot for
//! correctness, it is purely a cache for the insights view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSnapshot {
  pub snapshot_id: i64,
  /// Type tag, e.g. `"workforce_report"`.
  pub kind:        String,
  pub payload:     serde_json::Value,
  pub created_at:  DateTime<Utc>,
}
