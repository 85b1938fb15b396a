use chrono::NaiveDate;
use ems_core::{
  employee::{Department, EmployeeDraft, EmploymentStatus},
  review::NewReview,
  store::{EmployeeStore, SearchQuery, Sort, SortDirection, SortKey},
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(
  name: &str,
  department: Department,
  position: &str,
  salary: f64,
) -> EmployeeDraft {
  EmployeeDraft::new(name, 30, department, position, salary, date(2023, 1, 15))
}

// ─── Employee CRUD ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips() {
  let store = store().await;

  let mut input = draft("Alice Johnson", Department::It, "Engineer", 85_000.0);
  input.email = Some("alice@example.com".to_owned());
  input.skills = Some("Rust, SQL".to_owned());
  input.performance_rating = 4.5;
  input.last_promotion = Some(date(2024, 6, 1));

  let created = store.create(input.clone()).await.unwrap();
  assert!(created.id > 0);
  assert_eq!(created.created_at, created.updated_at);

  let fetched = store.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Alice Johnson");
  assert_eq!(fetched.age, 30);
  assert_eq!(fetched.department, Department::It);
  assert_eq!(fetched.salary, 85_000.0);
  assert_eq!(fetched.email.as_deref(), Some("alice@example.com"));
  assert_eq!(fetched.performance_rating, 4.5);
  assert_eq!(fetched.last_promotion, Some(date(2024, 6, 1)));
  assert_eq!(fetched.status, EmploymentStatus::Active);
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn create_rejects_invalid_draft() {
  let store = store().await;

  let mut input = draft("", Department::Hr, "Recruiter", -5.0);
  input.age = 0;

  let err = store.create(input).await.unwrap_err();
  let Error::Core(ems_core::Error::Validation(fields)) = err else {
    panic!("expected validation error");
  };
  assert_eq!(fields.len(), 3);

  // Nothing was written.
  assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_rewrites_fields_and_stamps_updated_at() {
  let store = store().await;
  let created = store
    .create(draft("Bob Smith", Department::Sales, "Rep", 50_000.0))
    .await
    .unwrap();

  let mut revised = draft("Bob Smith", Department::Sales, "Manager", 62_000.0);
  revised.status = EmploymentStatus::OnLeave;

  let updated = store.update(created.id, revised).await.unwrap();
  assert_eq!(updated.position, "Manager");
  assert_eq!(updated.salary, 62_000.0);
  assert_eq!(updated.status, EmploymentStatus::OnLeave);
  assert_eq!(updated.created_at, created.created_at);
  // A fresh timestamp is taken per mutating call, so the update stamp is
  // strictly later than creation.
  assert!(updated.updated_at > created.created_at);
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
  let store = store().await;
  let err = store
    .update(999, draft("Ghost", Department::It, "None", 1.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(999)));
}

#[tokio::test]
async fn delete_removes_record() {
  let store = store().await;
  let created = store
    .create(draft("Carol Lee", Department::Finance, "Analyst", 70_000.0))
    .await
    .unwrap();

  store.delete(created.id).await.unwrap();

  assert!(store.get(created.id).await.unwrap().is_none());
  assert!(store.list_all().await.unwrap().is_empty());

  let err = store.delete(created.id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn list_all_is_in_insertion_order() {
  let store = store().await;
  for name in ["Zoe", "Adam", "Mia"] {
    store
      .create(draft(name, Department::It, "Engineer", 80_000.0))
      .await
      .unwrap();
  }

  let names: Vec<_> = store
    .list_all()
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  assert_eq!(names, ["Zoe", "Adam", "Mia"]);
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn seeded_store() -> SqliteStore {
  let store = store().await;

  let mut a = draft("Alice Johnson", Department::Engineering, "Engineer", 90_000.0);
  a.status = EmploymentStatus::Active;
  store.create(a).await.unwrap();

  let mut b = draft("Bob Smith", Department::Hr, "Recruiter", 55_000.0);
  b.status = EmploymentStatus::Active;
  store.create(b).await.unwrap();

  let mut c = draft("Carol Lee", Department::Hr, "HR Manager", 65_000.0);
  c.status = EmploymentStatus::Terminated;
  store.create(c).await.unwrap();

  let mut d = draft("David Kim", Department::Sales, "Sales Engineer", 60_000.0);
  d.status = EmploymentStatus::Active;
  store.create(d).await.unwrap();

  store
}

#[tokio::test]
async fn search_without_filters_returns_everything() {
  let store = seeded_store().await;

  let results = store.search(&SearchQuery::default()).await.unwrap();
  assert_eq!(results.len(), 4);
}

#[tokio::test]
async fn single_filter_queries_bind_cleanly() {
  let store = seeded_store().await;

  // Each filter alone, so the statement carries one bound parameter.
  let by_text = SearchQuery {
    text: Some("smith".to_owned()),
    ..Default::default()
  };
  assert_eq!(store.search(&by_text).await.unwrap().len(), 1);

  let by_department = SearchQuery {
    department: Some(Department::Hr),
    ..Default::default()
  };
  assert_eq!(store.search(&by_department).await.unwrap().len(), 2);

  let by_status = SearchQuery {
    status: Some(EmploymentStatus::Terminated),
    ..Default::default()
  };
  assert_eq!(store.search(&by_status).await.unwrap().len(), 1);
}

#[tokio::test]
async fn text_search_spans_name_department_and_position() {
  let store = seeded_store().await;

  // "eng" hits the Engineering department and the "Sales Engineer" position,
  // case-insensitively.
  let query = SearchQuery {
    text: Some("eng".to_owned()),
    ..Default::default()
  };
  let names: Vec<_> = store
    .search(&query)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  assert_eq!(names, ["Alice Johnson", "David Kim"]);
}

#[tokio::test]
async fn filters_compose_with_and() {
  let store = seeded_store().await;

  let query = SearchQuery {
    department: Some(Department::Hr),
    status: Some(EmploymentStatus::Active),
    ..Default::default()
  };
  let names: Vec<_> = store
    .search(&query)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  // Carol is HR but Terminated, so only Bob survives both filters.
  assert_eq!(names, ["Bob Smith"]);
}

#[tokio::test]
async fn blank_text_is_no_filter() {
  let store = seeded_store().await;

  let query = SearchQuery {
    text: Some("   ".to_owned()),
    ..Default::default()
  };
  assert_eq!(store.search(&query).await.unwrap().len(), 4);
}

#[tokio::test]
async fn sort_by_salary_descending_breaks_ties_by_id() {
  let store = store().await;
  store
    .create(draft("First", Department::It, "Engineer", 80_000.0))
    .await
    .unwrap();
  store
    .create(draft("Second", Department::It, "Engineer", 80_000.0))
    .await
    .unwrap();
  store
    .create(draft("Third", Department::It, "Engineer", 95_000.0))
    .await
    .unwrap();

  let query = SearchQuery {
    sort: Some(Sort {
      key:       SortKey::Salary,
      direction: SortDirection::Descending,
    }),
    ..Default::default()
  };
  let names: Vec<_> = store
    .search(&query)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  // Equal salaries keep insertion order.
  assert_eq!(names, ["Third", "First", "Second"]);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reviews_are_stored_and_listed_in_date_order() {
  let store = store().await;
  let emp = store
    .create(draft("Eva Brown", Department::Design, "Designer", 58_000.0))
    .await
    .unwrap();

  let mut late = NewReview::new(emp.id, date(2024, 6, 1), 4.0);
  late.feedback = Some("strong quarter".to_owned());
  store.add_review(late).await.unwrap();

  let early = NewReview::new(emp.id, date(2024, 1, 1), 3.0);
  store.add_review(early).await.unwrap();

  let reviews = store.reviews_for(emp.id).await.unwrap();
  assert_eq!(reviews.len(), 2);
  assert_eq!(reviews[0].review_date, date(2024, 1, 1));
  assert_eq!(reviews[1].rating, 4.0);
  assert_eq!(reviews[1].feedback.as_deref(), Some("strong quarter"));
}

#[tokio::test]
async fn review_rating_out_of_range_rejected() {
  let store = store().await;
  let err = store
    .add_review(NewReview::new(1, date(2024, 1, 1), 7.5))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(ems_core::Error::Validation(_))));
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_of_same_kind_is_overwritten() {
  let store = store().await;

  let first = store
    .save_snapshot("workforce_report", json!({ "headcount": 4 }))
    .await
    .unwrap();
  let second = store
    .save_snapshot("workforce_report", json!({ "headcount": 5 }))
    .await
    .unwrap();
  assert_eq!(first.snapshot_id, second.snapshot_id);

  let latest = store
    .latest_snapshot("workforce_report")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(latest.payload, json!({ "headcount": 5 }));
}

#[tokio::test]
async fn missing_snapshot_kind_is_none() {
  let store = store().await;
  assert!(store.latest_snapshot("nope").await.unwrap().is_none());
}

// ─── CSV round trip ──────────────────────────────────────────────────────────

#[tokio::test]
async fn csv_export_import_round_trips_through_store() {
  let store = seeded_store().await;
  let roster = store.list_all().await.unwrap();

  let mut buf = Vec::new();
  ems_csv::write_roster(&mut buf, &roster).unwrap();

  let import = ems_csv::read_roster(buf.as_slice()).unwrap();
  assert_eq!(import.skipped, 0);
  assert_eq!(import.drafts.len(), roster.len());

  let target = store_for_import().await;
  for d in import.drafts {
    target.create(d).await.unwrap();
  }

  let restored = target.list_all().await.unwrap();
  assert_eq!(restored.len(), roster.len());
  assert_eq!(restored[0].name, roster[0].name);
  assert_eq!(restored[0].department, roster[0].department);
  assert_eq!(restored[0].salary, roster[0].salary);
}

async fn store_for_import() -> SqliteStore {
  SqliteStore::open_in_memory().await.unwrap()
}
