//! Error type for `stargate-store-sqlite`.

use rusqlite::ErrorCode;
use stargate_core::{Classify, FailureKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] stargate_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::Core(e) => e.failure_kind(),
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) if is_contention(e) => {
        FailureKind::ConcurrencyConflict
      }
      Error::Database(_) | Error::DateParse(_) => FailureKind::StorageUnavailable,
    }
  }
}

/// Another connection holds the write lock.
pub(crate) fn is_contention(e: &rusqlite::Error) -> bool {
  matches!(
    e.sqlite_error_code(),
    Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
  )
}

pub(crate) fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}

/// Translate a failure inside the duty-chain unit of work into the core
/// taxonomy. Lock contention and uniqueness races are both the footprint of
/// a concurrent writer.
pub(crate) fn storage(e: rusqlite::Error) -> stargate_core::Error {
  if is_contention(&e) || is_constraint_violation(&e) {
    stargate_core::Error::ConcurrencyConflict
  } else {
    stargate_core::Error::StorageUnavailable(e.to_string())
  }
}
