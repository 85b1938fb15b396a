//! CSV interchange for the employee roster.
//!
//! Export writes the full roster with a header row, one line per employee,
//! including the store-assigned columns. Import reads drafts back out of the
//! same shape: store-assigned columns are ignored, and each unusable row is
//! skipped and counted rather than failing the whole file.

use std::io;

use chrono::{DateTime, NaiveDate, Utc};
use ems_core::employee::{Employee, EmployeeDraft, EmploymentStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// File-level failures only. Row-level problems never surface here; they are
/// counted in [`RosterImport::skipped`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ExportRow<'a> {
  id:                 i64,
  name:               &'a str,
  age:                u32,
  department:         &'a str,
  position:           &'a str,
  salary:             f64,
  joining_date:       NaiveDate,
  email:              Option<&'a str>,
  phone:              Option<&'a str>,
  address:            Option<&'a str>,
  skills:             Option<&'a str>,
  performance_rating: f64,
  manager_id:         Option<i64>,
  status:             &'a str,
  last_promotion:     Option<NaiveDate>,
  created_at:         DateTime<Utc>,
  updated_at:         DateTime<Utc>,
}

impl<'a> ExportRow<'a> {
  fn from_employee(e: &'a Employee) -> Self {
    Self {
      id:                 e.id,
      name:               &e.name,
      age:                e.age,
      department:         e.department.as_str(),
      position:           &e.position,
      salary:             e.salary,
      joining_date:       e.joining_date,
      email:              e.email.as_deref(),
      phone:              e.phone.as_deref(),
      address:            e.address.as_deref(),
      skills:             e.skills.as_deref(),
      performance_rating: e.performance_rating,
      manager_id:         e.manager_id,
      status:             e.status.as_str(),
      last_promotion:     e.last_promotion,
      created_at:         e.created_at,
      updated_at:         e.updated_at,
    }
  }
}

/// Write `roster` to `writer` as CSV with a header row. The `csv` writer
/// quotes values containing commas or quotes, so names like
/// `"Smith, Robert"` survive a round trip.
pub fn write_roster<W: io::Write>(
  writer: W,
  roster: &[Employee],
) -> Result<()> {
  let mut out = csv::Writer::from_writer(writer);
  for employee in roster {
    out.serialize(ExportRow::from_employee(employee))?;
  }
  out.flush()?;
  Ok(())
}

// ─── Import ──────────────────────────────────────────────────────────────────

/// One parsed row of an import file. Columns the store assigns (`id`,
/// `created_at`, `updated_at`) are simply not listed, so the reader ignores
/// them when present.
#[derive(Debug, Deserialize)]
struct ImportRow {
  name:               String,
  age:                u32,
  department:         String,
  position:           String,
  salary:             f64,
  joining_date:       NaiveDate,
  email:              Option<String>,
  phone:              Option<String>,
  address:            Option<String>,
  skills:             Option<String>,
  performance_rating: Option<f64>,
  manager_id:         Option<i64>,
  status:             Option<String>,
  last_promotion:     Option<NaiveDate>,
}

impl ImportRow {
  fn into_draft(self) -> Result<EmployeeDraft, ems_core::Error> {
    let department = self.department.trim().parse()?;
    let status = match self.status.as_deref().map(str::trim) {
      Some(s) if !s.is_empty() => s.parse()?,
      _ => EmploymentStatus::default(),
    };

    let draft = EmployeeDraft {
      name: self.name,
      age: self.age,
      department,
      position: self.position,
      salary: self.salary,
      joining_date: self.joining_date,
      email: self.email,
      phone: self.phone,
      address: self.address,
      skills: self.skills,
      performance_rating: self.performance_rating.unwrap_or(0.0),
      manager_id: self.manager_id,
      status,
      last_promotion: self.last_promotion,
    };
    draft.validate()?;
    Ok(draft)
  }
}

/// Outcome of reading an import file.
#[derive(Debug)]
pub struct RosterImport {
  pub drafts:  Vec<EmployeeDraft>,
  /// Rows that failed to parse or validate and were dropped.
  pub skipped: usize,
}

/// Read drafts out of a CSV export. Unusable rows are logged, counted and
/// skipped; only a file-level failure aborts the whole read.
pub fn read_roster<R: io::Read>(reader: R) -> Result<RosterImport> {
  let mut rdr = csv::Reader::from_reader(reader);

  let mut drafts = Vec::new();
  let mut skipped = 0usize;

  for (idx, record) in rdr.deserialize::<ImportRow>().enumerate() {
    // Line 1 is the header.
    let line = idx + 2;
    match record {
      Ok(row) => match row.into_draft() {
        Ok(draft) => drafts.push(draft),
        Err(error) => {
          skipped += 1;
          warn!(line, %error, "skipping invalid roster row");
        }
      },
      Err(error) => {
        skipped += 1;
        warn!(line, %error, "skipping unparsable roster row");
      }
    }
  }

  Ok(RosterImport { drafts, skipped })
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use ems_core::employee::Department;

  use super::*;

  fn employee(id: i64, name: &str) -> Employee {
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
    Employee {
      id,
      name: name.to_owned(),
      age: 34,
      department: Department::Engineering,
      position: "Engineer".to_owned(),
      salary: 90_000.0,
      joining_date: NaiveDate::from_ymd_opt(2022, 3, 10).unwrap(),
      email: None,
      phone: None,
      address: None,
      skills: Some("Rust, SQL".to_owned()),
      performance_rating: 4.2,
      manager_id: None,
      status: EmploymentStatus::Active,
      last_promotion: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn quoted_name_survives_round_trip() {
    let roster = vec![employee(1, "Smith, Robert \"Bob\"")];

    let mut buf = Vec::new();
    write_roster(&mut buf, &roster).unwrap();

    let import = read_roster(buf.as_slice()).unwrap();
    assert_eq!(import.skipped, 0);
    assert_eq!(import.drafts.len(), 1);
    assert_eq!(import.drafts[0].name, "Smith, Robert \"Bob\"");
    assert_eq!(import.drafts[0].skills.as_deref(), Some("Rust, SQL"));
  }

  #[test]
  fn bad_rows_are_counted_not_fatal() {
    let csv_text = "\
name,age,department,position,salary,joining_date
Alice,30,IT,Engineer,85000,2023-01-15
Bob,abc,HR,Recruiter,55000,2023-02-01
Carol,41,Finance,Analyst,-10,2023-03-01
";
    let import = read_roster(csv_text.as_bytes()).unwrap();
    // Bob's age fails to parse, Carol's salary fails validation.
    assert_eq!(import.drafts.len(), 1);
    assert_eq!(import.skipped, 2);
    assert_eq!(import.drafts[0].name, "Alice");
  }

  #[test]
  fn unknown_department_skips_row() {
    let csv_text = "\
name,age,department,position,salary,joining_date
Dana,28,Astrology,Seer,40000,2023-04-01
";
    let import = read_roster(csv_text.as_bytes()).unwrap();
    assert_eq!(import.drafts.len(), 0);
    assert_eq!(import.skipped, 1);
  }

  #[test]
  fn missing_status_defaults_to_active() {
    let csv_text = "\
name,age,department,position,salary,joining_date,status
Ed,50,Sales,Director,120000,2020-06-15,
";
    let import = read_roster(csv_text.as_bytes()).unwrap();
    assert_eq!(import.drafts.len(), 1);
    assert_eq!(import.drafts[0].status, EmploymentStatus::Active);
  }
}
