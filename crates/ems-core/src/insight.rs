//! Insight rules: closed-form decision rules layered on the aggregation
//! engine. There is no learned model here; every "AI" output is a
//! deterministic computation over the current record set.
//!
//! Thresholds are named configuration values on [`InsightConfig`] so callers
//! (and tests) can exercise exact boundaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  employee::{Employee, EmployeeDraft, EmploymentStatus},
  stats::{self, GroupKey, Metric, NumericField},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Decision thresholds for the insight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
  /// Turnover percentage above which the outlook flags elevated turnover.
  pub turnover_alert_pct:   f64,
  /// Average rating below which the outlook flags declining performance.
  pub low_rating_threshold: f64,
  /// Salary below which a draft suggestion recommends a compensation review.
  pub low_salary_floor:     f64,
}

impl Default for InsightConfig {
  fn default() -> Self {
    Self {
      turnover_alert_pct:   10.0,
      low_rating_threshold: 3.0,
      low_salary_floor:     30_000.0,
    }
  }
}

// ─── Outlooks ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverOutlook {
  /// Terminated records as a percentage of all records; 0 on an empty set.
  pub rate_pct: f64,
  /// True when `rate_pct` is strictly above the alert threshold.
  pub elevated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceOutlook {
  /// `None` when there are no records ("no data", not a real zero).
  pub average_rating: Option<f64>,
  /// True when the average is strictly below the threshold; never flagged
  /// on an empty set.
  pub declining:      bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryAnalysis {
  pub company_average: Option<f64>,
  pub by_department:   BTreeMap<String, f64>,
  pub highest:         Option<(String, f64)>,
  pub lowest:          Option<(String, f64)>,
}

/// The bundled insights view: headcount, status breakdown and the three
/// outlooks in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceReport {
  pub headcount:       usize,
  pub active:          usize,
  pub on_leave:        usize,
  pub terminated:      usize,
  /// Department with the highest average rating; `None` with no records.
  pub best_performing: Option<(String, f64)>,
  pub turnover:        TurnoverOutlook,
  pub performance:     PerformanceOutlook,
  pub salary:          SalaryAnalysis,
}

// ─── Rules ───────────────────────────────────────────────────────────────────

pub fn turnover_outlook(
  records: &[Employee],
  config: &InsightConfig,
) -> TurnoverOutlook {
  let rate_pct = stats::rate(
    records,
    |e| e.status == EmploymentStatus::Terminated,
    |_| true,
  );
  TurnoverOutlook {
    rate_pct,
    elevated: rate_pct > config.turnover_alert_pct,
  }
}

pub fn performance_outlook(
  records: &[Employee],
  config: &InsightConfig,
) -> PerformanceOutlook {
  let average_rating = stats::average(records, NumericField::PerformanceRating);
  PerformanceOutlook {
    average_rating,
    declining: average_rating.is_some_and(|a| a < config.low_rating_threshold),
  }
}

pub fn salary_analysis(records: &[Employee]) -> SalaryAnalysis {
  let metric = Metric::Average(NumericField::Salary);
  SalaryAnalysis {
    company_average: stats::average(records, NumericField::Salary),
    by_department:   stats::group_average(
      records,
      GroupKey::Department,
      NumericField::Salary,
    ),
    highest:         stats::top_group(records, GroupKey::Department, metric),
    lowest:          stats::bottom_group(records, GroupKey::Department, metric),
  }
}

pub fn workforce_report(
  records: &[Employee],
  config: &InsightConfig,
) -> WorkforceReport {
  WorkforceReport {
    headcount:       stats::count(records),
    active:          stats::status_count(records, EmploymentStatus::Active),
    on_leave:        stats::status_count(records, EmploymentStatus::OnLeave),
    terminated:      stats::status_count(records, EmploymentStatus::Terminated),
    best_performing: stats::top_group(
      records,
      GroupKey::Department,
      Metric::Average(NumericField::PerformanceRating),
    ),
    turnover:        turnover_outlook(records, config),
    performance:     performance_outlook(records, config),
    salary:          salary_analysis(records),
  }
}

/// Form-level suggestions for a draft being edited. Empty when everything
/// looks fine.
pub fn draft_suggestions(
  draft: &EmployeeDraft,
  config: &InsightConfig,
) -> Vec<String> {
  let mut suggestions = Vec::new();
  if draft.name.trim().is_empty() {
    suggestions.push("Enter the employee's full name.".to_owned());
  }
  if draft.performance_rating > 0.0
    && draft.performance_rating < config.low_rating_threshold
  {
    suggestions
      .push("Performance is below average. Recommend training.".to_owned());
  }
  if draft.salary < config.low_salary_floor {
    suggestions
      .push("Salary is below market average. Consider review.".to_owned());
  }
  suggestions
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::employee::Department;

  fn emp(id: i64, status: EmploymentStatus, rating: f64) -> Employee {
    let now = Utc::now();
    Employee {
      id,
      name: format!("Employee {id}"),
      age: 30,
      department: Department::It,
      position: "Dev".to_owned(),
      salary: 80_000.0,
      joining_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
      email: None,
      phone: None,
      address: None,
      skills: None,
      performance_rating: rating,
      manager_id: None,
      status,
      last_promotion: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn turnover_at_exact_threshold_is_not_elevated() {
    // 1 terminated of 10: exactly 10%, which is not strictly above.
    let mut records: Vec<_> =
      (1..10).map(|i| emp(i, EmploymentStatus::Active, 4.0)).collect();
    records.push(emp(10, EmploymentStatus::Terminated, 4.0));

    let outlook = turnover_outlook(&records, &InsightConfig::default());
    assert_eq!(outlook.rate_pct, 10.0);
    assert!(!outlook.elevated);
  }

  #[test]
  fn turnover_above_threshold_is_elevated() {
    let records = vec![
      emp(1, EmploymentStatus::Active, 4.0),
      emp(2, EmploymentStatus::Terminated, 4.0),
    ];
    let outlook = turnover_outlook(&records, &InsightConfig::default());
    assert_eq!(outlook.rate_pct, 50.0);
    assert!(outlook.elevated);
  }

  #[test]
  fn empty_set_turnover_is_zero_and_calm() {
    let outlook = turnover_outlook(&[], &InsightConfig::default());
    assert_eq!(outlook.rate_pct, 0.0);
    assert!(!outlook.elevated);
  }

  #[test]
  fn performance_at_exact_threshold_is_not_declining() {
    let records = vec![emp(1, EmploymentStatus::Active, 3.0)];
    let outlook = performance_outlook(&records, &InsightConfig::default());
    assert_eq!(outlook.average_rating, Some(3.0));
    assert!(!outlook.declining);
  }

  #[test]
  fn performance_below_threshold_is_declining() {
    let records = vec![emp(1, EmploymentStatus::Active, 2.9)];
    let outlook = performance_outlook(&records, &InsightConfig::default());
    assert!(outlook.declining);
  }

  #[test]
  fn empty_set_performance_has_no_data() {
    let outlook = performance_outlook(&[], &InsightConfig::default());
    assert_eq!(outlook.average_rating, None);
    assert!(!outlook.declining);
  }

  #[test]
  fn thresholds_are_overridable() {
    let strict = InsightConfig {
      low_rating_threshold: 4.5,
      ..InsightConfig::default()
    };
    let records = vec![emp(1, EmploymentStatus::Active, 4.0)];
    assert!(performance_outlook(&records, &strict).declining);
  }

  #[test]
  fn draft_suggestions_flag_low_salary_and_rating() {
    let mut draft = EmployeeDraft::new(
      "Bob",
      40,
      Department::Finance,
      "Clerk",
      25_000.0,
      NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    draft.performance_rating = 2.0;

    let suggestions = draft_suggestions(&draft, &InsightConfig::default());
    assert_eq!(suggestions.len(), 2);
  }

  #[test]
  fn clean_draft_gets_no_suggestions() {
    let draft = EmployeeDraft::new(
      "Alice",
      30,
      Department::It,
      "Engineer",
      85_000.0,
      NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    );
    assert!(draft_suggestions(&draft, &InsightConfig::default()).is_empty());
  }
}
