//! Performance reviews — owned by exactly one employee record.
//!
//! The back-reference is a plain id, not an ownership pointer; deleting an
//! employee does not cascade to its reviews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  employee::{RATING_MAX, RATING_MIN},
  error::{Error, FieldError},
};

/// A persisted performance review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReview {
  pub review_id:   i64,
  pub employee_id: i64,
  pub review_date: NaiveDate,
  pub rating:      f64,
  pub feedback:    Option<String>,
  pub goals:       Option<String>,
  pub reviewer:    Option<String>,
}

/// Input to the store's `add_review`. `review_id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReview {
  pub employee_id: i64,
  pub review_date: NaiveDate,
  pub rating:      f64,
  pub feedback:    Option<String>,
  pub goals:       Option<String>,
  pub reviewer:    Option<String>,
}

impl NewReview {
  pub fn new(employee_id: i64, review_date: NaiveDate, rating: f64) -> Self {
    Self {
      employee_id,
      review_date,
      rating,
      feedback: None,
      goals: None,
      reviewer: None,
    }
  }

  pub fn validate(&self) -> Result<(), Error> {
    if !self.rating.is_finite()
      || self.rating < RATING_MIN
      || self.rating > RATING_MAX
    {
      return Err(Error::Validation(vec![FieldError {
        field:  "rating",
        reason: format!("must be within [{RATING_MIN}, {RATING_MAX}]"),
      }]));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rating_bounds_enforced() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    assert!(NewReview::new(1, date, 4.5).validate().is_ok());
    assert!(NewReview::new(1, date, 5.0).validate().is_ok());
    assert!(NewReview::new(1, date, 5.5).validate().is_err());
    assert!(NewReview::new(1, date, -0.1).validate().is_err());
  }
}
