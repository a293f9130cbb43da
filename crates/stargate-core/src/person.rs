//! Person — the identity record a duty history hangs off.
//!
//! A person holds only identity metadata. Their career is assembled on read
//! from the derived [`CareerStatus`] record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duty::CareerStatus;

/// Store-assigned identifier of a [`Person`].
pub type PersonId = i64;

/// A uniquely named member of personnel. May exist with no duty history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  PersonId,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// The read model returned by person listings: identity plus the current
/// career summary, if the person has ever been enrolled. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerView {
  pub person: Person,
  pub status: Option<CareerStatus>,
}

impl CareerView {
  pub fn is_enrolled(&self) -> bool { self.status.is_some() }
}

/// Trim a submitted name and reject it if nothing is left.
pub fn normalize_name(name: &str) -> crate::Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(crate::Error::EmptyName);
  }
  Ok(trimmed.to_owned())
}
