//! Duty intervals and the career-status summary derived from them.
//!
//! A duty interval is one assignment (rank + title) held over a closed or
//! open-ended range of calendar dates. Only `end_date` is ever written after
//! an interval is created, and only once: when the next interval opens.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, person::PersonId};

/// Store-assigned identifier of a [`DutyInterval`].
pub type DutyId = i64;

// ─── Sentinel titles ─────────────────────────────────────────────────────────

/// The title every career must begin with.
pub const ENROLLMENT_TITLE: &str = "Spaceman";

/// The title that marks the end of a career.
pub const RETIREMENT_TITLE: &str = "RETIRED";

pub fn is_enrollment_title(title: &str) -> bool {
  title.eq_ignore_ascii_case(ENROLLMENT_TITLE)
}

pub fn is_retirement_title(title: &str) -> bool {
  title.eq_ignore_ascii_case(RETIREMENT_TITLE)
}

/// The last inclusive day of an interval that is followed by one starting on
/// `date`.
pub fn day_before(date: NaiveDate) -> Result<NaiveDate> {
  date
    .checked_sub_days(Days::new(1))
    .ok_or(Error::DateOutOfRange(date))
}

// ─── DutyInterval ────────────────────────────────────────────────────────────

/// One assignment held by a person. `end_date == None` marks the open,
/// current assignment; a person has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyInterval {
  pub duty_id:    DutyId,
  pub person_id:  PersonId,
  pub rank:       String,
  pub title:      String,
  /// Inclusive.
  pub start_date: NaiveDate,
  /// Inclusive; `None` while the interval is open.
  pub end_date:   Option<NaiveDate>,
}

impl DutyInterval {
  pub fn is_open(&self) -> bool { self.end_date.is_none() }

  /// Whether this interval collides with a candidate under the duplicate
  /// rule.
  pub fn matches(&self, title: &str, start_date: NaiveDate) -> bool {
    self.title == title && self.start_date == start_date
  }
}

/// A "record new duty" fact, as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDuty {
  pub person_id:  PersonId,
  pub rank:       String,
  pub title:      String,
  pub start_date: NaiveDate,
}

impl NewDuty {
  pub fn new(
    person_id: PersonId,
    rank: impl Into<String>,
    title: impl Into<String>,
    start_date: NaiveDate,
  ) -> Self {
    Self {
      person_id,
      rank: rank.into(),
      title: title.into(),
      start_date,
    }
  }
}

// ─── CareerStatus ────────────────────────────────────────────────────────────

/// The derived, always-current summary of a person's career. Exists exactly
/// when the person has at least one duty interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerStatus {
  pub person_id:         PersonId,
  pub current_rank:      String,
  pub current_title:     String,
  /// Start of the first accepted duty; never changes once set.
  pub career_start_date: NaiveDate,
  /// The day before the `RETIRED` duty began, if there is one.
  pub career_end_date:   Option<NaiveDate>,
}

impl CareerStatus {
  pub fn is_retired(&self) -> bool { self.career_end_date.is_some() }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Which interval the status projector treats as "current".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionPolicy {
  /// The most recently submitted duty, whatever its start date.
  #[default]
  LastSubmitted,
  /// The duty with the greatest start date; a back-dated submission does not
  /// displace a later-starting one.
  LatestStart,
}

/// Tunable admission and projection behaviour, loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DutyRules {
  pub projection:              ProjectionPolicy,
  /// Reject any duty for a person who already has a `RETIRED` interval.
  pub reject_after_retirement: bool,
}
