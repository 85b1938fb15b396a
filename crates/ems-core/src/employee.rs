//! Employee record types — the central entity of the roster.
//!
//! An [`Employee`] is the persisted form; callers mutate the store through an
//! [`EmployeeDraft`], which carries every rewritable field and validates
//! itself before any write happens.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldError};

/// Valid range for `performance_rating`, inclusive on both ends.
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

// ─── Department ──────────────────────────────────────────────────────────────

/// The fixed set of departments. Out-of-set text is rejected at the boundary
/// rather than accepted as free text.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Department {
  #[serde(rename = "HR")]
  Hr,
  #[serde(rename = "IT")]
  It,
  Finance,
  Marketing,
  Operations,
  Sales,
  Engineering,
  Design,
}

impl Department {
  pub const ALL: [Department; 8] = [
    Department::Hr,
    Department::It,
    Department::Finance,
    Department::Marketing,
    Department::Operations,
    Department::Sales,
    Department::Engineering,
    Department::Design,
  ];

  /// Display text; also the form stored in the `department` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Department::Hr => "HR",
      Department::It => "IT",
      Department::Finance => "Finance",
      Department::Marketing => "Marketing",
      Department::Operations => "Operations",
      Department::Sales => "Sales",
      Department::Engineering => "Engineering",
      Department::Design => "Design",
    }
  }
}

impl FromStr for Department {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "HR" => Ok(Department::Hr),
      "IT" => Ok(Department::It),
      "Finance" => Ok(Department::Finance),
      "Marketing" => Ok(Department::Marketing),
      "Operations" => Ok(Department::Operations),
      "Sales" => Ok(Department::Sales),
      "Engineering" => Ok(Department::Engineering),
      "Design" => Ok(Department::Design),
      other => Err(Error::UnknownDepartment(other.to_owned())),
    }
  }
}

impl std::fmt::Display for Department {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── EmploymentStatus ────────────────────────────────────────────────────────

/// Employment status of a record. New records default to `Active`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
)]
pub enum EmploymentStatus {
  #[default]
  Active,
  Inactive,
  #[serde(rename = "On Leave")]
  OnLeave,
  Terminated,
}

impl EmploymentStatus {
  pub const ALL: [EmploymentStatus; 4] = [
    EmploymentStatus::Active,
    EmploymentStatus::Inactive,
    EmploymentStatus::OnLeave,
    EmploymentStatus::Terminated,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      EmploymentStatus::Active => "Active",
      EmploymentStatus::Inactive => "Inactive",
      EmploymentStatus::OnLeave => "On Leave",
      EmploymentStatus::Terminated => "Terminated",
    }
  }
}

impl FromStr for EmploymentStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "Active" => Ok(EmploymentStatus::Active),
      "Inactive" => Ok(EmploymentStatus::Inactive),
      "On Leave" => Ok(EmploymentStatus::OnLeave),
      "Terminated" => Ok(EmploymentStatus::Terminated),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl std::fmt::Display for EmploymentStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Employee ────────────────────────────────────────────────────────────────

/// One employee's persisted record. `id`, `created_at` and `updated_at` are
/// assigned by the store and never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
  pub id:                 i64,
  pub name:               String,
  pub age:                u32,
  pub department:         Department,
  pub position:           String,
  pub salary:             f64,
  pub joining_date:       NaiveDate,
  pub email:              Option<String>,
  pub phone:              Option<String>,
  pub address:            Option<String>,
  pub skills:             Option<String>,
  pub performance_rating: f64,
  /// Weak reference to another employee's id. Never enforced; readers must
  /// tolerate dangling values (render as "unknown manager").
  pub manager_id:         Option<i64>,
  pub status:             EmploymentStatus,
  pub last_promotion:     Option<NaiveDate>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

// ─── EmployeeDraft ───────────────────────────────────────────────────────────

/// Input to the store's `create` and `update` operations: every field of an
/// [`Employee`] except the store-assigned ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDraft {
  pub name:               String,
  pub age:                u32,
  pub department:         Department,
  pub position:           String,
  pub salary:             f64,
  pub joining_date:       NaiveDate,
  pub email:              Option<String>,
  pub phone:              Option<String>,
  pub address:            Option<String>,
  pub skills:             Option<String>,
  pub performance_rating: f64,
  pub manager_id:         Option<i64>,
  pub status:             EmploymentStatus,
  pub last_promotion:     Option<NaiveDate>,
}

impl EmployeeDraft {
  /// Convenience constructor with the required fields; everything optional
  /// starts at its default.
  pub fn new(
    name: impl Into<String>,
    age: u32,
    department: Department,
    position: impl Into<String>,
    salary: f64,
    joining_date: NaiveDate,
  ) -> Self {
    Self {
      name: name.into(),
      age,
      department,
      position: position.into(),
      salary,
      joining_date,
      email: None,
      phone: None,
      address: None,
      skills: None,
      performance_rating: 0.0,
      manager_id: None,
      status: EmploymentStatus::default(),
      last_promotion: None,
    }
  }

  /// Check every field and report all failures at once.
  ///
  /// Department and status are closed enums, so their membership is already
  /// guaranteed by the type; the checks here cover the value-level rules.
  pub fn validate(&self) -> Result<(), Error> {
    let mut errors = Vec::new();

    if self.name.trim().is_empty() {
      errors.push(FieldError {
        field:  "name",
        reason: "must not be empty".to_owned(),
      });
    }
    if self.position.trim().is_empty() {
      errors.push(FieldError {
        field:  "position",
        reason: "must not be empty".to_owned(),
      });
    }
    if self.age == 0 {
      errors.push(FieldError {
        field:  "age",
        reason: "must be greater than zero".to_owned(),
      });
    }
    if !self.salary.is_finite() || self.salary < 0.0 {
      errors.push(FieldError {
        field:  "salary",
        reason: "must be a non-negative number".to_owned(),
      });
    }
    if !self.performance_rating.is_finite()
      || self.performance_rating < RATING_MIN
      || self.performance_rating > RATING_MAX
    {
      errors.push(FieldError {
        field:  "performance_rating",
        reason: format!("must be within [{RATING_MIN}, {RATING_MAX}]"),
      });
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(errors))
    }
  }
}
