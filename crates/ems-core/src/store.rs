//! The `EmployeeStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `ems-store-sqlite`).
//! Higher layers (`ems-cli`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  employee::{Department, Employee, EmployeeDraft, EmploymentStatus},
  review::{NewReview, PerformanceReview},
  snapshot::InsightSnapshot,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`EmployeeStore::search`].
///
/// `None` on a filter means "All" (no restriction). Filters compose with
/// logical AND.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  /// Case-insensitive substring matched against name OR department OR
  /// position. Empty or whitespace-only text is treated as absent.
  pub text:       Option<String>,
  pub department: Option<Department>,
  pub status:     Option<EmploymentStatus>,
  /// Result ordering; ascending id when absent.
  pub sort:       Option<Sort>,
}

/// A sortable result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Name,
  Age,
  Department,
  Position,
  Salary,
  Status,
  PerformanceRating,
  JoiningDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      SortDirection::Ascending => SortDirection::Descending,
      SortDirection::Descending => SortDirection::Ascending,
    }
  }
}

/// A requested result ordering. Sorts are stable: ties always break by
/// ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
  pub key:       SortKey,
  pub direction: SortDirection,
}

/// The column-header toggle cycle: requesting the same key again flips the
/// direction, a different key starts over ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortState {
  current: Option<Sort>,
}

impl SortState {
  /// Register a sort request for `key` and return the ordering to apply.
  pub fn press(&mut self, key: SortKey) -> Sort {
    let next = match self.current {
      Some(s) if s.key == key => Sort {
        key,
        direction: s.direction.flipped(),
      },
      _ => Sort {
        key,
        direction: SortDirection::Ascending,
      },
    };
    self.current = Some(next);
    next
  }

  pub fn current(&self) -> Option<Sort> {
    self.current
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an employee roster backend.
///
/// Every mutating method commits durably before its future resolves; there is
/// no partial-write visibility across calls. All methods return `Send`
/// futures so the trait can be used from multi-threaded async runtimes.
pub trait EmployeeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Validate `draft`, assign a fresh id, stamp `created_at == updated_at`
  /// and persist. Returns the stored record.
  fn create(
    &self,
    draft: EmployeeDraft,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Rewrite every draft field of an existing record and stamp `updated_at`.
  /// `id` and `created_at` are immutable. Fails if `id` does not exist.
  fn update(
    &self,
    id: i64,
    draft: EmployeeDraft,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Hard delete. The record disappears from all subsequent reads.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  /// All records in ascending id (insertion) order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// Filtered search per [`SearchQuery`]. No pagination; the full result set
  /// is returned each call.
  fn search<'a>(
    &'a self,
    query: &'a SearchQuery,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + 'a;

  // ── Performance reviews ───────────────────────────────────────────────

  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<PerformanceReview, Self::Error>> + Send + '_;

  fn reviews_for(
    &self,
    employee_id: i64,
  ) -> impl Future<Output = Result<Vec<PerformanceReview>, Self::Error>> + Send + '_;

  // ── Insight snapshots ─────────────────────────────────────────────────

  /// Persist a snapshot, replacing any previous one of the same kind.
  fn save_snapshot<'a>(
    &'a self,
    kind: &'a str,
    payload: serde_json::Value,
  ) -> impl Future<Output = Result<InsightSnapshot, Self::Error>> + Send + 'a;

  fn latest_snapshot<'a>(
    &'a self,
    kind: &'a str,
  ) -> impl Future<Output = Result<Option<InsightSnapshot>, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sort_state_toggles_on_repeated_key() {
    let mut state = SortState::default();

    let first = state.press(SortKey::Salary);
    assert_eq!(first.direction, SortDirection::Ascending);

    let second = state.press(SortKey::Salary);
    assert_eq!(second.direction, SortDirection::Descending);

    let third = state.press(SortKey::Salary);
    assert_eq!(third.direction, SortDirection::Ascending);
  }

  #[test]
  fn sort_state_resets_on_new_key() {
    let mut state = SortState::default();
    state.press(SortKey::Salary);
    state.press(SortKey::Salary);

    let switched = state.press(SortKey::Name);
    assert_eq!(switched.key, SortKey::Name);
    assert_eq!(switched.direction, SortDirection::Ascending);
  }
}
