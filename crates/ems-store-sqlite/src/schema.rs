//! SQL schema for the EMS SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS employees (
    emp_id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT NOT NULL,
    age                INTEGER NOT NULL,
    department         TEXT NOT NULL,   -- display text of Department
    position           TEXT NOT NULL,
    salary             REAL NOT NULL,
    joining_date       TEXT NOT NULL,   -- ISO 8601 date
    email              TEXT,
    phone              TEXT,
    address            TEXT,
    skills             TEXT,
    performance_rating REAL NOT NULL DEFAULT 0.0,
    manager_id         INTEGER,         -- weak reference; may dangle
    status             TEXT NOT NULL DEFAULT 'Active',
    last_promotion     TEXT,
    created_at         TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at         TEXT NOT NULL
);

-- Reviews back-reference an employee by id. Deliberately no foreign key:
-- employee deletion does not cascade, and readers tolerate dangling ids.
CREATE TABLE IF NOT EXISTS performance_reviews (
    review_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    emp_id      INTEGER NOT NULL,
    review_date TEXT NOT NULL,
    rating      REAL NOT NULL,
    feedback    TEXT,
    goals       TEXT,
    reviewer    TEXT
);

-- Cache of computed insight payloads; at most one row per kind,
-- overwritten in place. Never load-bearing.
CREATE TABLE IF NOT EXISTS insight_snapshots (
    snapshot_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    kind         TEXT NOT NULL UNIQUE,
    payload_json TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS employees_department_idx ON employees(department);
CREATE INDEX IF NOT EXISTS employees_status_idx     ON employees(status);
CREATE INDEX IF NOT EXISTS employees_joining_idx    ON employees(joining_date);
CREATE INDEX IF NOT EXISTS reviews_emp_idx          ON performance_reviews(emp_id);

PRAGMA user_version = 1;
";
