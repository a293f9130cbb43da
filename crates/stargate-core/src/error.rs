//! Error types for `stargate-core`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{duty::DutyId, person::PersonId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("no person named {0:?}")]
  PersonNameNotFound(String),

  #[error("a person named {0:?} already exists")]
  PersonNameTaken(String),

  #[error("person name must not be empty")]
  EmptyName,

  #[error("duty not found: {0}")]
  DutyNotFound(DutyId),

  #[error(
    "to enroll in the astronaut program, the first duty title must be \
     'Spaceman'"
  )]
  EnrollmentRequiresSpaceman,

  #[error("duty {title:?} starting {start_date} already exists for this person")]
  DuplicateDuty { title: String, start_date: NaiveDate },

  #[error("person {0} has retired and cannot take further duties")]
  CareerEnded(PersonId),

  #[error("date {0} has no preceding day")]
  DateOutOfRange(NaiveDate),

  #[error("a concurrent update to the same person was detected")]
  ConcurrencyConflict,

  #[error("storage unavailable: {0}")]
  StorageUnavailable(String),

  #[error("unit of work cancelled before commit")]
  Cancelled,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Failure classification ──────────────────────────────────────────────────

/// The caller-facing category of a failure.
///
/// Outer layers map this to transport details (HTTP status codes) without
/// inspecting the storage error that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  PersonNotFound,
  PersonNameTaken,
  DutyNotFound,
  InvalidInput,
  EnrollmentRequiresSpaceman,
  DuplicateDuty,
  CareerEnded,
  ConcurrencyConflict,
  StorageUnavailable,
}

impl FailureKind {
  /// Whether resubmitting the identical request may succeed.
  pub fn is_retryable(self) -> bool {
    matches!(self, Self::ConcurrencyConflict | Self::StorageUnavailable)
  }
}

/// Implemented by every error type that crosses the store boundary.
pub trait Classify {
  fn failure_kind(&self) -> FailureKind;
}

impl Classify for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Self::PersonNotFound(_) | Self::PersonNameNotFound(_) => {
        FailureKind::PersonNotFound
      }
      Self::PersonNameTaken(_) => FailureKind::PersonNameTaken,
      Self::EmptyName | Self::DateOutOfRange(_) => FailureKind::InvalidInput,
      Self::DutyNotFound(_) => FailureKind::DutyNotFound,
      Self::EnrollmentRequiresSpaceman => {
        FailureKind::EnrollmentRequiresSpaceman
      }
      Self::DuplicateDuty { .. } => FailureKind::DuplicateDuty,
      Self::CareerEnded(_) => FailureKind::CareerEnded,
      Self::ConcurrencyConflict => FailureKind::ConcurrencyConflict,
      Self::StorageUnavailable(_) | Self::Cancelled => {
        FailureKind::StorageUnavailable
      }
    }
  }
}
