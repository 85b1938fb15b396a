//! Aggregation engine: pure, side-effect-free statistics over a record set.
//!
//! Every function takes a `&[Employee]` slice, which may be the full store
//! contents or a filtered search result supplied by the caller. Empty-input
//! aggregates return a defined sentinel (`None` or `0`) rather than failing;
//! the presentation layer renders the sentinel distinctly from a real zero.
//!
//! Groups are collected into `BTreeMap`s so group keys iterate in lexically
//! ascending order; `top_group`/`bottom_group` are therefore deterministic,
//! ties resolving to the lexically smallest key.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::employee::{Employee, EmploymentStatus};

// ─── Field selectors ─────────────────────────────────────────────────────────

/// A numeric field an average can be taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
  Salary,
  PerformanceRating,
  Age,
}

impl NumericField {
  fn value_of(self, e: &Employee) -> f64 {
    match self {
      NumericField::Salary => e.salary,
      NumericField::PerformanceRating => e.performance_rating,
      NumericField::Age => f64::from(e.age),
    }
  }
}

/// A field records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
  Department,
  Status,
  Position,
}

impl GroupKey {
  fn label_of(self, e: &Employee) -> String {
    match self {
      GroupKey::Department => e.department.as_str().to_owned(),
      GroupKey::Status => e.status.as_str().to_owned(),
      GroupKey::Position => e.position.clone(),
    }
  }
}

/// A date field trend buckets are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
  JoiningDate,
  LastPromotion,
}

impl DateField {
  fn date_of(self, e: &Employee) -> Option<NaiveDate> {
    match self {
      DateField::JoiningDate => Some(e.joining_date),
      DateField::LastPromotion => e.last_promotion,
    }
  }
}

/// What `top_group`/`bottom_group` rank groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
  Count,
  Average(NumericField),
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

pub fn count(records: &[Employee]) -> usize {
  records.len()
}

/// Mean of `field` over the set; `None` when the set is empty.
pub fn average(records: &[Employee], field: NumericField) -> Option<f64> {
  if records.is_empty() {
    return None;
  }
  let sum: f64 = records.iter().map(|e| field.value_of(e)).sum();
  Some(sum / records.len() as f64)
}

/// Group label -> record count.
pub fn group_count(
  records: &[Employee],
  key: GroupKey,
) -> BTreeMap<String, usize> {
  let mut counts = BTreeMap::new();
  for e in records {
    *counts.entry(key.label_of(e)).or_insert(0) += 1;
  }
  counts
}

/// Group label -> mean of `field` within the group.
pub fn group_average(
  records: &[Employee],
  key: GroupKey,
  field: NumericField,
) -> BTreeMap<String, f64> {
  let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
  for e in records {
    let entry = sums.entry(key.label_of(e)).or_insert((0.0, 0));
    entry.0 += field.value_of(e);
    entry.1 += 1;
  }
  sums
    .into_iter()
    .map(|(label, (sum, n))| (label, sum / n as f64))
    .collect()
}

fn grouped_metric(
  records: &[Employee],
  key: GroupKey,
  metric: Metric,
) -> BTreeMap<String, f64> {
  match metric {
    Metric::Count => group_count(records, key)
      .into_iter()
      .map(|(label, n)| (label, n as f64))
      .collect(),
    Metric::Average(field) => group_average(records, key, field),
  }
}

/// The group with the largest metric value, or `None` on an empty set.
/// Ties resolve to the lexically smallest group label.
pub fn top_group(
  records: &[Employee],
  key: GroupKey,
  metric: Metric,
) -> Option<(String, f64)> {
  let mut best: Option<(String, f64)> = None;
  for (label, value) in grouped_metric(records, key, metric) {
    match &best {
      Some((_, top)) if value <= *top => {}
      _ => best = Some((label, value)),
    }
  }
  best
}

/// The group with the smallest metric value; same tie-break as `top_group`.
pub fn bottom_group(
  records: &[Employee],
  key: GroupKey,
  metric: Metric,
) -> Option<(String, f64)> {
  let mut best: Option<(String, f64)> = None;
  for (label, value) in grouped_metric(records, key, metric) {
    match &best {
      Some((_, bottom)) if value >= *bottom => {}
      _ => best = Some((label, value)),
    }
  }
  best
}

/// Percentage of records matching `numerator` among those matching
/// `denominator`. Returns `0.0` when the denominator selects nothing; an
/// empty set is not an error.
pub fn rate(
  records: &[Employee],
  numerator: impl Fn(&Employee) -> bool,
  denominator: impl Fn(&Employee) -> bool,
) -> f64 {
  let den = records.iter().filter(|e| denominator(e)).count();
  if den == 0 {
    return 0.0;
  }
  let num = records.iter().filter(|e| numerator(e)).count();
  (num as f64 / den as f64) * 100.0
}

/// Count of records with the given status.
pub fn status_count(records: &[Employee], status: EmploymentStatus) -> usize {
  records.iter().filter(|e| e.status == status).count()
}

/// Mean of `value` bucketed by the calendar month of `date`, as
/// `("YYYY-MM", average)` pairs in ascending label order (lexical ordering of
/// the labels is chronological). Records without the date are skipped.
pub fn monthly_average(
  records: &[Employee],
  date: DateField,
  value: NumericField,
) -> Vec<(String, f64)> {
  let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();
  for e in records {
    let Some(d) = date.date_of(e) else { continue };
    let label = format!("{:04}-{:02}", d.year(), d.month());
    let entry = buckets.entry(label).or_insert((0.0, 0));
    entry.0 += value.value_of(e);
    entry.1 += 1;
  }
  buckets
    .into_iter()
    .map(|(label, (sum, n))| (label, sum / n as f64))
    .collect()
}

/// Count of records whose `joining_date` falls within the trailing
/// `days`-day window ending at `now`, boundary date inclusive.
pub fn new_hires_since(
  records: &[Employee],
  days: i64,
  now: DateTime<Utc>,
) -> usize {
  let cutoff = now.date_naive() - Duration::days(days);
  records.iter().filter(|e| e.joining_date >= cutoff).count()
}
