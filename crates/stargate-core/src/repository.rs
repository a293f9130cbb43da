//! The narrow, synchronous storage interface the duty-chain engine runs on.
//!
//! An implementation wraps exactly one storage transaction: every call made
//! through it during a [`record_duty`](crate::orchestrator::record_duty)
//! invocation belongs to the same unit of work, and the owner of the
//! transaction commits only when the engine returns `Ok`.

use chrono::NaiveDate;

use crate::{
  Result,
  duty::{CareerStatus, DutyId, DutyInterval, NewDuty},
  person::PersonId,
};

/// Read access to person identity records.
pub trait PersonDirectory {
  fn person_exists(&self, person_id: PersonId) -> Result<bool>;
}

/// Duty intervals and career-status records, scoped to one unit of work.
pub trait DutyRepository {
  /// The person's open interval, if any.
  fn find_open_interval(
    &self,
    person_id: PersonId,
  ) -> Result<Option<DutyInterval>>;

  /// Every interval of the person, ordered by start date (ties by id).
  fn list_intervals(&self, person_id: PersonId) -> Result<Vec<DutyInterval>>;

  /// Persist a new open interval and return its id.
  fn insert_interval(&mut self, duty: &NewDuty) -> Result<DutyId>;

  /// Set the end date of an existing interval.
  fn close_interval(&mut self, duty_id: DutyId, end_date: NaiveDate)
  -> Result<()>;

  fn get_status(&self, person_id: PersonId) -> Result<Option<CareerStatus>>;

  /// Insert or replace the person's career-status record.
  fn upsert_status(&mut self, status: &CareerStatus) -> Result<()>;
}
