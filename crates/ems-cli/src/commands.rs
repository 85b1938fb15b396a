//! Subcommand definitions and handlers.
//!
//! Each handler is one store round trip plus formatting; all aggregation
//! happens in `ems-core` over the fetched record set.

use std::{fs::File, path::PathBuf};

use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use ems_core::{
  employee::{Department, Employee, EmployeeDraft, EmploymentStatus},
  insight::{self, WorkforceReport},
  review::NewReview,
  stats::{self, GroupKey, Metric, NumericField},
  store::{EmployeeStore, SearchQuery, Sort, SortDirection, SortKey},
};
use ems_store_sqlite::SqliteStore;

use crate::settings::AppSettings;

// ─── Subcommands ─────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub enum Command {
  /// Add a new employee.
  Add(AddArgs),
  /// Show one employee with their review history.
  Get { id: i64 },
  /// Change fields of an existing employee.
  Update(UpdateArgs),
  /// Delete an employee permanently.
  Delete { id: i64 },
  /// List the whole roster.
  List,
  /// Search the roster with text, department and status filters.
  Search(SearchArgs),
  /// Record a performance review for an employee.
  Review(ReviewArgs),
  /// Dashboard summary: headcount, salaries, hiring.
  Stats,
  /// Workforce insights with configured thresholds.
  Insights,
  /// Per-department headcount and salary report.
  Report,
  /// Export the roster to a CSV file.
  Export { path: PathBuf },
  /// Import employees from a CSV file; bad rows are skipped.
  Import { path: PathBuf },
  /// Populate the store with a small sample roster.
  Seed,
}

#[derive(Args)]
pub struct AddArgs {
  #[arg(long)]
  name:           String,
  #[arg(long)]
  age:            u32,
  /// One of: HR, IT, Finance, Marketing, Operations, Sales, Engineering,
  /// Design.
  #[arg(long)]
  department:     String,
  #[arg(long)]
  position:       String,
  #[arg(long)]
  salary:         f64,
  /// Joining date, YYYY-MM-DD.
  #[arg(long)]
  joined:         NaiveDate,
  #[arg(long)]
  email:          Option<String>,
  #[arg(long)]
  phone:          Option<String>,
  #[arg(long)]
  address:        Option<String>,
  /// Comma-separated free text.
  #[arg(long)]
  skills:         Option<String>,
  #[arg(long, default_value_t = 0.0)]
  rating:         f64,
  #[arg(long)]
  manager:        Option<i64>,
  /// One of: Active, Inactive, "On Leave", Terminated. Defaults to Active.
  #[arg(long)]
  status:         Option<String>,
  #[arg(long)]
  last_promotion: Option<NaiveDate>,
}

#[derive(Args)]
pub struct UpdateArgs {
  id: i64,

  #[arg(long)]
  name:           Option<String>,
  #[arg(long)]
  age:            Option<u32>,
  #[arg(long)]
  department:     Option<String>,
  #[arg(long)]
  position:       Option<String>,
  #[arg(long)]
  salary:         Option<f64>,
  #[arg(long)]
  joined:         Option<NaiveDate>,
  #[arg(long)]
  email:          Option<String>,
  #[arg(long)]
  phone:          Option<String>,
  #[arg(long)]
  address:        Option<String>,
  #[arg(long)]
  skills:         Option<String>,
  #[arg(long)]
  rating:         Option<f64>,
  #[arg(long)]
  manager:        Option<i64>,
  #[arg(long)]
  status:         Option<String>,
  #[arg(long)]
  last_promotion: Option<NaiveDate>,
}

#[derive(Args)]
pub struct SearchArgs {
  /// Substring matched against name, department and position.
  #[arg(long)]
  text:       Option<String>,
  #[arg(long)]
  department: Option<String>,
  #[arg(long)]
  status:     Option<String>,
  /// Sort column: name, age, department, position, salary, status, rating,
  /// joined.
  #[arg(long)]
  sort:       Option<String>,
  /// Sort descending instead of ascending.
  #[arg(long)]
  desc:       bool,
}

#[derive(Args)]
pub struct ReviewArgs {
  id: i64,

  #[arg(long)]
  date:     NaiveDate,
  #[arg(long)]
  rating:   f64,
  #[arg(long)]
  feedback: Option<String>,
  #[arg(long)]
  goals:    Option<String>,
  #[arg(long)]
  reviewer: Option<String>,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

pub async fn run(
  command: Command,
  store: &SqliteStore,
  settings: &AppSettings,
) -> anyhow::Result<()> {
  match command {
    Command::Add(args) => add(store, settings, args).await,
    Command::Get { id } => get(store, id).await,
    Command::Update(args) => update(store, args).await,
    Command::Delete { id } => delete(store, id).await,
    Command::List => list(store).await,
    Command::Search(args) => search(store, args).await,
    Command::Review(args) => review(store, args).await,
    Command::Stats => show_stats(store).await,
    Command::Insights => insights(store, settings).await,
    Command::Report => report(store).await,
    Command::Export { path } => export(store, path).await,
    Command::Import { path } => import(store, path).await,
    Command::Seed => seed(store).await,
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn add(
  store: &SqliteStore,
  settings: &AppSettings,
  args: AddArgs,
) -> anyhow::Result<()> {
  let draft = EmployeeDraft {
    name: args.name,
    age: args.age,
    department: args.department.parse()?,
    position: args.position,
    salary: args.salary,
    joining_date: args.joined,
    email: args.email,
    phone: args.phone,
    address: args.address,
    skills: args.skills,
    performance_rating: args.rating,
    manager_id: args.manager,
    status: match args.status.as_deref() {
      Some(s) => s.parse()?,
      None => EmploymentStatus::default(),
    },
    last_promotion: args.last_promotion,
  };

  for suggestion in insight::draft_suggestions(&draft, &settings.insights) {
    println!("note: {suggestion}");
  }

  let employee = store.create(draft).await?;
  println!("created employee {}", employee.id);
  Ok(())
}

async fn get(store: &SqliteStore, id: i64) -> anyhow::Result<()> {
  let employee = store
    .get(id)
    .await?
    .with_context(|| format!("no employee with id {id}"))?;
  print_detail(&employee);

  let reviews = store.reviews_for(id).await?;
  if !reviews.is_empty() {
    println!("reviews:");
    for r in &reviews {
      let feedback = r.feedback.as_deref().unwrap_or("-");
      println!("  {}  {:.1}  {}", r.review_date, r.rating, feedback);
    }
  }
  Ok(())
}

async fn update(store: &SqliteStore, args: UpdateArgs) -> anyhow::Result<()> {
  let existing = store
    .get(args.id)
    .await?
    .with_context(|| format!("no employee with id {}", args.id))?;

  // Overlay the provided flags onto the current record.
  let draft = EmployeeDraft {
    name: args.name.unwrap_or(existing.name),
    age: args.age.unwrap_or(existing.age),
    department: match args.department.as_deref() {
      Some(d) => d.parse()?,
      None => existing.department,
    },
    position: args.position.unwrap_or(existing.position),
    salary: args.salary.unwrap_or(existing.salary),
    joining_date: args.joined.unwrap_or(existing.joining_date),
    email: args.email.or(existing.email),
    phone: args.phone.or(existing.phone),
    address: args.address.or(existing.address),
    skills: args.skills.or(existing.skills),
    performance_rating: args.rating.unwrap_or(existing.performance_rating),
    manager_id: args.manager.or(existing.manager_id),
    status: match args.status.as_deref() {
      Some(s) => s.parse()?,
      None => existing.status,
    },
    last_promotion: args.last_promotion.or(existing.last_promotion),
  };

  let updated = store.update(args.id, draft).await?;
  println!("updated employee {}", updated.id);
  Ok(())
}

async fn delete(store: &SqliteStore, id: i64) -> anyhow::Result<()> {
  store.delete(id).await?;
  println!("deleted employee {id}");
  Ok(())
}

async fn list(store: &SqliteStore) -> anyhow::Result<()> {
  let roster = store.list_all().await?;
  print_rows(&roster);
  Ok(())
}

async fn search(store: &SqliteStore, args: SearchArgs) -> anyhow::Result<()> {
  let sort = match args.sort.as_deref() {
    Some(key) => Some(Sort {
      key:       parse_sort_key(key)?,
      direction: if args.desc {
        SortDirection::Descending
      } else {
        SortDirection::Ascending
      },
    }),
    None => None,
  };

  let query = SearchQuery {
    text: args.text,
    department: args
      .department
      .as_deref()
      .map(str::parse::<Department>)
      .transpose()?,
    status: args
      .status
      .as_deref()
      .map(str::parse::<EmploymentStatus>)
      .transpose()?,
    sort,
  };

  let results = store.search(&query).await?;
  print_rows(&results);
  Ok(())
}

async fn review(store: &SqliteStore, args: ReviewArgs) -> anyhow::Result<()> {
  // Reviews tolerate dangling ids, but the CLI checks up front so a typo
  // does not silently attach a review to nothing.
  store
    .get(args.id)
    .await?
    .with_context(|| format!("no employee with id {}", args.id))?;

  let mut input = NewReview::new(args.id, args.date, args.rating);
  input.feedback = args.feedback;
  input.goals = args.goals;
  input.reviewer = args.reviewer;

  let saved = store.add_review(input).await?;
  println!("recorded review {} for employee {}", saved.review_id, args.id);
  Ok(())
}

async fn show_stats(store: &SqliteStore) -> anyhow::Result<()> {
  let roster = store.list_all().await?;

  println!("total employees:  {}", stats::count(&roster));
  println!(
    "average salary:   {}",
    fmt_money(stats::average(&roster, NumericField::Salary))
  );
  println!(
    "average rating:   {}",
    fmt_num(stats::average(&roster, NumericField::PerformanceRating))
  );
  println!(
    "top department:   {}",
    match stats::top_group(&roster, GroupKey::Department, Metric::Count) {
      Some((label, n)) => format!("{label} ({n:.0})"),
      None => "N/A".to_owned(),
    }
  );
  println!(
    "new hires (30d):  {}",
    stats::new_hires_since(&roster, 30, Utc::now())
  );
  Ok(())
}

async fn insights(
  store: &SqliteStore,
  settings: &AppSettings,
) -> anyhow::Result<()> {
  let roster = store.list_all().await?;
  let report = insight::workforce_report(&roster, &settings.insights);

  print_report(&report);

  // Cache the computed payload; purely informational, reads never depend
  // on it.
  store
    .save_snapshot("workforce_report", serde_json::to_value(&report)?)
    .await?;
  Ok(())
}

async fn report(store: &SqliteStore) -> anyhow::Result<()> {
  let roster = store.list_all().await?;
  let counts = stats::group_count(&roster, GroupKey::Department);
  let salaries =
    stats::group_average(&roster, GroupKey::Department, NumericField::Salary);

  println!("{:<14} {:>6} {:>12}", "department", "count", "avg salary");
  for (department, n) in &counts {
    println!(
      "{department:<14} {n:>6} {:>12}",
      fmt_money(salaries.get(department).copied())
    );
  }
  Ok(())
}

async fn export(store: &SqliteStore, path: PathBuf) -> anyhow::Result<()> {
  let roster = store.list_all().await?;
  let file = File::create(&path)
    .with_context(|| format!("failed to create {}", path.display()))?;
  ems_csv::write_roster(file, &roster)?;
  println!("exported {} employees to {}", roster.len(), path.display());
  Ok(())
}

async fn import(store: &SqliteStore, path: PathBuf) -> anyhow::Result<()> {
  let file = File::open(&path)
    .with_context(|| format!("failed to open {}", path.display()))?;
  let parsed = ems_csv::read_roster(file)?;

  let mut imported = 0usize;
  for draft in parsed.drafts {
    store.create(draft).await?;
    imported += 1;
  }

  println!("imported {imported} employees, skipped {}", parsed.skipped);
  Ok(())
}

async fn seed(store: &SqliteStore) -> anyhow::Result<()> {
  for draft in sample_roster() {
    let employee = store.create(draft).await?;
    println!("seeded {} ({})", employee.name, employee.id);
  }
  Ok(())
}

// ─── Sample data ─────────────────────────────────────────────────────────────

fn sample_roster() -> Vec<EmployeeDraft> {
  let entry = |name: &str,
               age: u32,
               department: Department,
               position: &str,
               salary: f64,
               joined: (i32, u32, u32),
               rating: f64| {
    let mut d = EmployeeDraft::new(
      name,
      age,
      department,
      position,
      salary,
      NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2).unwrap(),
    );
    d.performance_rating = rating;
    d
  };

  vec![
    entry("Alice Johnson", 29, Department::It, "Software Engineer", 85_000.0, (2023, 1, 15), 4.5),
    entry("Bob Smith", 41, Department::Sales, "Sales Manager", 72_000.0, (2019, 6, 3), 3.8),
    entry("Carol Lee", 35, Department::Hr, "HR Specialist", 58_000.0, (2021, 3, 22), 4.1),
    entry("David Kim", 47, Department::Finance, "Financial Analyst", 67_500.0, (2018, 11, 5), 3.4),
    entry("Eva Brown", 26, Department::Marketing, "Marketing Coordinator", 48_000.0, (2024, 2, 12), 4.0),
  ]
}

// ─── Formatting ──────────────────────────────────────────────────────────────

fn parse_sort_key(s: &str) -> anyhow::Result<SortKey> {
  Ok(match s.to_ascii_lowercase().as_str() {
    "name" => SortKey::Name,
    "age" => SortKey::Age,
    "department" => SortKey::Department,
    "position" => SortKey::Position,
    "salary" => SortKey::Salary,
    "status" => SortKey::Status,
    "rating" => SortKey::PerformanceRating,
    "joined" => SortKey::JoiningDate,
    other => anyhow::bail!("unknown sort column {other:?}"),
  })
}

/// "N/A" distinguishes an empty roster from a real zero.
fn fmt_money(value: Option<f64>) -> String {
  match value {
    Some(v) => format!("${v:.2}"),
    None => "N/A".to_owned(),
  }
}

fn fmt_num(value: Option<f64>) -> String {
  match value {
    Some(v) => format!("{v:.2}"),
    None => "N/A".to_owned(),
  }
}

fn print_rows(roster: &[Employee]) {
  if roster.is_empty() {
    println!("no employees");
    return;
  }
  println!(
    "{:>4} {:<22} {:<12} {:<24} {:>10} {:<10}",
    "id", "name", "department", "position", "salary", "status"
  );
  for e in roster {
    println!(
      "{:>4} {:<22} {:<12} {:<24} {:>10.2} {:<10}",
      e.id, e.name, e.department, e.position, e.salary, e.status
    );
  }
}

fn print_detail(e: &Employee) {
  println!("id:             {}", e.id);
  println!("name:           {}", e.name);
  println!("age:            {}", e.age);
  println!("department:     {}", e.department);
  println!("position:       {}", e.position);
  println!("salary:         ${:.2}", e.salary);
  println!("joined:         {}", e.joining_date);
  println!("status:         {}", e.status);
  println!("rating:         {:.1}", e.performance_rating);
  if let Some(email) = &e.email {
    println!("email:          {email}");
  }
  if let Some(phone) = &e.phone {
    println!("phone:          {phone}");
  }
  if let Some(address) = &e.address {
    println!("address:        {address}");
  }
  if let Some(skills) = &e.skills {
    println!("skills:         {skills}");
  }
  if let Some(id) = e.manager_id {
    println!("manager:        {id}");
  }
  if let Some(date) = e.last_promotion {
    println!("last promotion: {date}");
  }
}

fn print_report(report: &WorkforceReport) {
  println!("headcount:        {}", report.headcount);
  println!(
    "status:           {} active, {} on leave, {} terminated",
    report.active, report.on_leave, report.terminated
  );
  if let Some((dept, rating)) = &report.best_performing {
    println!("best performing:  {dept} (avg rating {rating:.2})");
  }

  println!(
    "turnover:         {:.1}%{}",
    report.turnover.rate_pct,
    if report.turnover.elevated {
      "  ⚠ elevated"
    } else {
      ""
    }
  );
  println!(
    "performance:      {}{}",
    fmt_num(report.performance.average_rating),
    if report.performance.declining {
      "  ⚠ below threshold"
    } else {
      ""
    }
  );

  println!(
    "company salary:   {}",
    fmt_money(report.salary.company_average)
  );
  for (dept, avg) in &report.salary.by_department {
    println!("  {dept:<14} {}", fmt_money(Some(*avg)));
  }
  if let Some((dept, avg)) = &report.salary.highest {
    println!("highest paying:   {dept} ({})", fmt_money(Some(*avg)));
  }
  if let Some((dept, avg)) = &report.salary.lowest {
    println!("lowest paying:    {dept} ({})", fmt_money(Some(*avg)));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sort_keys_parse_case_insensitively() {
    assert_eq!(parse_sort_key("Salary").unwrap(), SortKey::Salary);
    assert_eq!(parse_sort_key("rating").unwrap(), SortKey::PerformanceRating);
    assert!(parse_sort_key("favourite_colour").is_err());
  }

  #[test]
  fn money_formatting_distinguishes_empty_from_zero() {
    assert_eq!(fmt_money(None), "N/A");
    assert_eq!(fmt_money(Some(0.0)), "$0.00");
    assert_eq!(fmt_money(Some(85_000.0)), "$85000.00");
  }

  #[test]
  fn sample_roster_is_valid() {
    for draft in sample_roster() {
      draft.validate().unwrap();
    }
  }
}
