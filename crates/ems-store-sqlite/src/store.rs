//! [`SqliteStore`] — the SQLite implementation of [`EmployeeStore`].

use std::path::Path;

use chrono::Utc;
use ems_core::{
  employee::{Employee, EmployeeDraft},
  review::{NewReview, PerformanceReview},
  snapshot::InsightSnapshot,
  store::{EmployeeStore, SearchQuery, Sort, SortDirection, SortKey},
};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use crate::{
  encode::{
    EMPLOYEE_COLUMNS, RawEmployee, RawReview, RawSnapshot, encode_date,
    encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An employee roster backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The one
/// connection is held for the lifetime of the process.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    info!("employee database schema initialised");
    Ok(())
  }
}

// ─── Draft encoding ──────────────────────────────────────────────────────────

/// A draft's fields encoded to their column representations, ready to move
/// into a connection closure.
struct DraftParams {
  name:               String,
  age:                i64,
  department:         String,
  position:           String,
  salary:             f64,
  joining_date:       String,
  email:              Option<String>,
  phone:              Option<String>,
  address:            Option<String>,
  skills:             Option<String>,
  performance_rating: f64,
  manager_id:         Option<i64>,
  status:             String,
  last_promotion:     Option<String>,
}

impl DraftParams {
  fn from_draft(draft: &EmployeeDraft) -> Self {
    Self {
      name:               draft.name.clone(),
      age:                i64::from(draft.age),
      department:         draft.department.as_str().to_owned(),
      position:           draft.position.clone(),
      salary:             draft.salary,
      joining_date:       encode_date(draft.joining_date),
      email:              draft.email.clone(),
      phone:              draft.phone.clone(),
      address:            draft.address.clone(),
      skills:             draft.skills.clone(),
      performance_rating: draft.performance_rating,
      manager_id:         draft.manager_id,
      status:             draft.status.as_str().to_owned(),
      last_promotion:     draft.last_promotion.map(encode_date),
    }
  }
}

/// ORDER BY clause for a search. Ties always break by ascending id, which
/// keeps any sort stable with respect to insertion order.
fn sort_sql(sort: Option<Sort>) -> &'static str {
  let Some(sort) = sort else {
    return "emp_id ASC";
  };
  // Static strings keep the SQL free of interpolated user input.
  match (sort.key, sort.direction) {
    (SortKey::Name, SortDirection::Ascending) => "name ASC, emp_id ASC",
    (SortKey::Name, SortDirection::Descending) => "name DESC, emp_id ASC",
    (SortKey::Age, SortDirection::Ascending) => "age ASC, emp_id ASC",
    (SortKey::Age, SortDirection::Descending) => "age DESC, emp_id ASC",
    (SortKey::Department, SortDirection::Ascending) => {
      "department ASC, emp_id ASC"
    }
    (SortKey::Department, SortDirection::Descending) => {
      "department DESC, emp_id ASC"
    }
    (SortKey::Position, SortDirection::Ascending) => "position ASC, emp_id ASC",
    (SortKey::Position, SortDirection::Descending) => {
      "position DESC, emp_id ASC"
    }
    (SortKey::Salary, SortDirection::Ascending) => "salary ASC, emp_id ASC",
    (SortKey::Salary, SortDirection::Descending) => "salary DESC, emp_id ASC",
    (SortKey::Status, SortDirection::Ascending) => "status ASC, emp_id ASC",
    (SortKey::Status, SortDirection::Descending) => "status DESC, emp_id ASC",
    (SortKey::PerformanceRating, SortDirection::Ascending) => {
      "performance_rating ASC, emp_id ASC"
    }
    (SortKey::PerformanceRating, SortDirection::Descending) => {
      "performance_rating DESC, emp_id ASC"
    }
    (SortKey::JoiningDate, SortDirection::Ascending) => {
      "joining_date ASC, emp_id ASC"
    }
    (SortKey::JoiningDate, SortDirection::Descending) => {
      "joining_date DESC, emp_id ASC"
    }
  }
}

// ─── EmployeeStore impl ──────────────────────────────────────────────────────

impl EmployeeStore for SqliteStore {
  type Error = Error;

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn create(&self, draft: EmployeeDraft) -> Result<Employee> {
    draft.validate()?;

    let now = Utc::now();
    let now_str = encode_dt(now);
    let p = DraftParams::from_draft(&draft);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO employees (
             name, age, department, position, salary, joining_date,
             email, phone, address, skills, performance_rating,
             manager_id, status, last_promotion, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?14, ?15, ?16)",
          rusqlite::params![
            p.name,
            p.age,
            p.department,
            p.position,
            p.salary,
            p.joining_date,
            p.email,
            p.phone,
            p.address,
            p.skills,
            p.performance_rating,
            p.manager_id,
            p.status,
            p.last_promotion,
            now_str,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, "created employee record");

    Ok(Employee {
      id,
      name: draft.name,
      age: draft.age,
      department: draft.department,
      position: draft.position,
      salary: draft.salary,
      joining_date: draft.joining_date,
      email: draft.email,
      phone: draft.phone,
      address: draft.address,
      skills: draft.skills,
      performance_rating: draft.performance_rating,
      manager_id: draft.manager_id,
      status: draft.status,
      last_promotion: draft.last_promotion,
      created_at: now,
      updated_at: now,
    })
  }

  async fn update(&self, id: i64, draft: EmployeeDraft) -> Result<Employee> {
    draft.validate()?;

    let now_str = encode_dt(Utc::now());
    let p = DraftParams::from_draft(&draft);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE employees SET
             name = ?1, age = ?2, department = ?3, position = ?4,
             salary = ?5, joining_date = ?6, email = ?7, phone = ?8,
             address = ?9, skills = ?10, performance_rating = ?11,
             manager_id = ?12, status = ?13, last_promotion = ?14,
             updated_at = ?15
           WHERE emp_id = ?16",
          rusqlite::params![
            p.name,
            p.age,
            p.department,
            p.position,
            p.salary,
            p.joining_date,
            p.email,
            p.phone,
            p.address,
            p.skills,
            p.performance_rating,
            p.manager_id,
            p.status,
            p.last_promotion,
            now_str,
            id,
          ],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::NotFound(id));
    }

    // Read back so the caller sees the preserved created_at.
    self.get(id).await?.ok_or(Error::NotFound(id))
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM employees WHERE emp_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::NotFound(id));
    }
    debug!(id, "deleted employee record");
    Ok(())
  }

  async fn get(&self, id: i64) -> Result<Option<Employee>> {
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE emp_id = ?1"
              ),
              rusqlite::params![id],
              RawEmployee::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEmployee::into_employee).transpose()
  }

  async fn list_all(&self) -> Result<Vec<Employee>> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY emp_id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawEmployee::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn search(&self, query: &SearchQuery) -> Result<Vec<Employee>> {
    let text_pattern = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(|t| format!("%{t}%"));
    let dept_str = query.department.map(|d| d.as_str().to_owned());
    let status_str = query.status.map(|s| s.as_str().to_owned());
    let order_by = sort_sql(query.sort);

    let raws: Vec<RawEmployee> = self
      .conn
      .call(move |conn| {
        // Build the WHERE clause dynamically. Placeholders are numbered
        // sequentially as conditions are added, so the bound-parameter
        // count always matches the statement.
        let mut conds: Vec<String> = vec![];
        let mut params: Vec<String> = vec![];
        if let Some(pattern) = text_pattern {
          // SQLite LIKE is case-insensitive for ASCII.
          let n = params.len() + 1;
          conds.push(format!(
            "(name LIKE ?{n} OR department LIKE ?{n} OR position LIKE ?{n})"
          ));
          params.push(pattern);
        }
        if let Some(dept) = dept_str {
          let n = params.len() + 1;
          conds.push(format!("department = ?{n}"));
          params.push(dept);
        }
        if let Some(status) = status_str {
          let n = params.len() + 1;
          conds.push(format!("status = ?{n}"));
          params.push(status);
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {EMPLOYEE_COLUMNS} FROM employees
           {where_clause}
           ORDER BY {order_by}"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(params),
            RawEmployee::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    debug!(results = raws.len(), "search executed");
    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  // ── Performance reviews ───────────────────────────────────────────────────

  async fn add_review(&self, input: NewReview) -> Result<PerformanceReview> {
    input.validate()?;

    let employee_id = input.employee_id;
    let date_str = encode_date(input.review_date);
    let rating = input.rating;
    let feedback = input.feedback.clone();
    let goals = input.goals.clone();
    let reviewer = input.reviewer.clone();

    let review_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO performance_reviews (
             emp_id, review_date, rating, feedback, goals, reviewer
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            employee_id,
            date_str,
            rating,
            feedback,
            goals,
            reviewer,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(PerformanceReview {
      review_id,
      employee_id: input.employee_id,
      review_date: input.review_date,
      rating: input.rating,
      feedback: input.feedback,
      goals: input.goals,
      reviewer: input.reviewer,
    })
  }

  async fn reviews_for(
    &self,
    employee_id: i64,
  ) -> Result<Vec<PerformanceReview>> {
    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT review_id, emp_id, review_date, rating, feedback, goals,
                  reviewer
           FROM performance_reviews
           WHERE emp_id = ?1
           ORDER BY review_date ASC, review_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![employee_id], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  // ── Insight snapshots ─────────────────────────────────────────────────────

  async fn save_snapshot(
    &self,
    kind: &str,
    payload: serde_json::Value,
  ) -> Result<InsightSnapshot> {
    let now = Utc::now();
    let now_str = encode_dt(now);
    let kind_owned = kind.to_owned();
    let payload_json = serde_json::to_string(&payload)?;

    let snapshot_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO insight_snapshots (kind, payload_json, created_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(kind) DO UPDATE SET
             payload_json = excluded.payload_json,
             created_at   = excluded.created_at",
          rusqlite::params![kind_owned, payload_json, now_str],
        )?;
        let id: i64 = conn.query_row(
          "SELECT snapshot_id FROM insight_snapshots WHERE kind = ?1",
          rusqlite::params![kind_owned],
          |row| row.get(0),
        )?;
        Ok(id)
      })
      .await?;

    Ok(InsightSnapshot {
      snapshot_id,
      kind: kind.to_owned(),
      payload,
      created_at: now,
    })
  }

  async fn latest_snapshot(&self, kind: &str) -> Result<Option<InsightSnapshot>> {
    let kind_owned = kind.to_owned();

    let raw: Option<RawSnapshot> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT snapshot_id, kind, payload_json, created_at
               FROM insight_snapshots WHERE kind = ?1",
              rusqlite::params![kind_owned],
              |row| {
                Ok(RawSnapshot {
                  snapshot_id:  row.get(0)?,
                  kind:         row.get(1)?,
                  payload_json: row.get(2)?,
                  created_at:   row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSnapshot::into_snapshot).transpose()
  }
}
