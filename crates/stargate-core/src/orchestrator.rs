//! The public entry point of the duty-chain engine.
//!
//! [`record_duty`] sequences enrollment validation, the chain update and the
//! status projection against one repository. It performs no commit of its
//! own: the repository is expected to wrap a single storage transaction that
//! its owner commits if and only if this function returns `Ok`.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result, chain,
  duty::{CareerStatus, DutyId, DutyInterval, DutyRules, NewDuty},
  enrollment, projector,
  repository::{DutyRepository, PersonDirectory},
};

/// The outcome of an accepted duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecorded {
  /// The newly opened interval.
  pub duty:   DutyInterval,
  /// The interval that was open before and has now been closed.
  pub closed: Option<DutyId>,
  /// The person's career status after the duty was applied.
  pub status: CareerStatus,
}

/// Validate `candidate` and apply it to the person's duty chain and career
/// status.
///
/// On `Err`, some writes may already have gone through `repo`; the caller must
/// discard the unit of work.
pub fn record_duty<R>(
  repo: &mut R,
  rules: &DutyRules,
  candidate: &NewDuty,
) -> Result<DutyRecorded>
where
  R: DutyRepository + PersonDirectory + ?Sized,
{
  if !repo.person_exists(candidate.person_id)? {
    return Err(Error::PersonNotFound(candidate.person_id));
  }

  let history = repo.list_intervals(candidate.person_id)?;
  enrollment::validate(candidate, &history, rules)?;

  let update = chain::apply(repo, candidate)?;
  let status = projector::project(repo, candidate, &history, rules.projection)?;

  Ok(DutyRecorded {
    duty: update.opened,
    closed: update.closed,
    status,
  })
}
