//! Admission rules for a new duty fact.
//!
//! Pure decisions over a snapshot of the person's existing intervals; nothing
//! here touches storage.

use crate::{
  Error, Result,
  duty::{DutyInterval, DutyRules, NewDuty, is_enrollment_title, is_retirement_title},
};

/// Accept or reject `candidate` given the person's `existing` intervals.
///
/// - A person with no history can only be enrolled with the `Spaceman` title.
/// - An interval with the same title and start date must not already exist.
/// - With [`DutyRules::reject_after_retirement`], a retired person takes no
///   further duties.
pub fn validate(
  candidate: &NewDuty,
  existing: &[DutyInterval],
  rules: &DutyRules,
) -> Result<()> {
  if existing.is_empty() && !is_enrollment_title(&candidate.title) {
    return Err(Error::EnrollmentRequiresSpaceman);
  }

  if existing
    .iter()
    .any(|d| d.matches(&candidate.title, candidate.start_date))
  {
    return Err(Error::DuplicateDuty {
      title:      candidate.title.clone(),
      start_date: candidate.start_date,
    });
  }

  if rules.reject_after_retirement
    && existing.iter().any(|d| is_retirement_title(&d.title))
  {
    return Err(Error::CareerEnded(candidate.person_id));
  }

  Ok(())
}
