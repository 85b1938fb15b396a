//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! and the two closed enums as their display text (`"HR"`, `"On Leave"`, ...).

use chrono::{DateTime, NaiveDate, Utc};
use ems_core::{
  employee::Employee,
  review::PerformanceReview,
  snapshot::InsightSnapshot,
};

use crate::{Error, Result};

// ─── Timestamps & dates ──────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("bad date {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every employee SELECT; order must match
/// [`RawEmployee::from_row`].
pub const EMPLOYEE_COLUMNS: &str = "emp_id, name, age, department, position, \
   salary, joining_date, email, phone, address, skills, performance_rating, \
   manager_id, status, last_promotion, created_at, updated_at";

/// Raw values read directly from an `employees` row.
pub struct RawEmployee {
  pub emp_id:             i64,
  pub name:               String,
  pub age:                i64,
  pub department:         String,
  pub position:           String,
  pub salary:             f64,
  pub joining_date:       String,
  pub email:              Option<String>,
  pub phone:              Option<String>,
  pub address:            Option<String>,
  pub skills:             Option<String>,
  pub performance_rating: f64,
  pub manager_id:         Option<i64>,
  pub status:             String,
  pub last_promotion:     Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawEmployee {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      emp_id:             row.get(0)?,
      name:               row.get(1)?,
      age:                row.get(2)?,
      department:         row.get(3)?,
      position:           row.get(4)?,
      salary:             row.get(5)?,
      joining_date:       row.get(6)?,
      email:              row.get(7)?,
      phone:              row.get(8)?,
      address:            row.get(9)?,
      skills:             row.get(10)?,
      performance_rating: row.get(11)?,
      manager_id:         row.get(12)?,
      status:             row.get(13)?,
      last_promotion:     row.get(14)?,
      created_at:         row.get(15)?,
      updated_at:         row.get(16)?,
    })
  }

  pub fn into_employee(self) -> Result<Employee> {
    let age = u32::try_from(self.age)
      .map_err(|_| Error::Decode(format!("bad age: {}", self.age)))?;

    Ok(Employee {
      id: self.emp_id,
      name: self.name,
      age,
      department: self.department.parse()?,
      position: self.position,
      salary: self.salary,
      joining_date: decode_date(&self.joining_date)?,
      email: self.email,
      phone: self.phone,
      address: self.address,
      skills: self.skills,
      performance_rating: self.performance_rating,
      manager_id: self.manager_id,
      status: self.status.parse()?,
      last_promotion: self
        .last_promotion
        .as_deref()
        .map(decode_date)
        .transpose()?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `performance_reviews` row.
pub struct RawReview {
  pub review_id:   i64,
  pub emp_id:      i64,
  pub review_date: String,
  pub rating:      f64,
  pub feedback:    Option<String>,
  pub goals:       Option<String>,
  pub reviewer:    Option<String>,
}

impl RawReview {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:   row.get(0)?,
      emp_id:      row.get(1)?,
      review_date: row.get(2)?,
      rating:      row.get(3)?,
      feedback:    row.get(4)?,
      goals:       row.get(5)?,
      reviewer:    row.get(6)?,
    })
  }

  pub fn into_review(self) -> Result<PerformanceReview> {
    Ok(PerformanceReview {
      review_id:   self.review_id,
      employee_id: self.emp_id,
      review_date: decode_date(&self.review_date)?,
      rating:      self.rating,
      feedback:    self.feedback,
      goals:       self.goals,
      reviewer:    self.reviewer,
    })
  }
}

/// Raw values read directly from an `insight_snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:  i64,
  pub kind:         String,
  pub payload_json: String,
  pub created_at:   String,
}

impl RawSnapshot {
  pub fn into_snapshot(self) -> Result<InsightSnapshot> {
    Ok(InsightSnapshot {
      snapshot_id: self.snapshot_id,
      kind:        self.kind,
      payload:     serde_json::from_str(&self.payload_json)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
