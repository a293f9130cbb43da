//! Derivation of the [`CareerStatus`] summary from an accepted duty.
//!
//! [`derive`] is a pure function of the previous summary, the person's
//! history before the duty was accepted and the duty itself. [`project`]
//! loads and stores the summary around it within the caller's unit of work.

use crate::{
  Result,
  duty::{
    CareerStatus, DutyInterval, NewDuty, ProjectionPolicy, day_before,
    is_retirement_title,
  },
  repository::DutyRepository,
};

/// Compute the career status that results from accepting `candidate`.
///
/// `history` holds the intervals that existed before `candidate`. The career
/// start date is taken from `previous` when there is one and is never
/// recomputed.
pub fn derive(
  previous: Option<&CareerStatus>,
  candidate: &NewDuty,
  history: &[DutyInterval],
  policy: ProjectionPolicy,
) -> Result<CareerStatus> {
  let retired_on = if is_retirement_title(&candidate.title) {
    Some(day_before(candidate.start_date)?)
  } else {
    None
  };

  let Some(previous) = previous else {
    return Ok(CareerStatus {
      person_id:         candidate.person_id,
      current_rank:      candidate.rank.clone(),
      current_title:     candidate.title.clone(),
      career_start_date: candidate.start_date,
      career_end_date:   retired_on,
    });
  };

  let (rank, title) = match policy {
    ProjectionPolicy::LastSubmitted => (&candidate.rank, &candidate.title),
    ProjectionPolicy::LatestStart => {
      match history.iter().max_by_key(|d| (d.start_date, d.duty_id)) {
        Some(latest) if latest.start_date > candidate.start_date => {
          (&latest.rank, &latest.title)
        }
        _ => (&candidate.rank, &candidate.title),
      }
    }
  };

  Ok(CareerStatus {
    person_id:         previous.person_id,
    current_rank:      rank.clone(),
    current_title:     title.clone(),
    career_start_date: previous.career_start_date,
    career_end_date:   retired_on.or(previous.career_end_date),
  })
}

/// Re-derive and store the person's career status after `candidate` was
/// added to the chain.
pub fn project<R>(
  repo: &mut R,
  candidate: &NewDuty,
  history: &[DutyInterval],
  policy: ProjectionPolicy,
) -> Result<CareerStatus>
where
  R: DutyRepository + ?Sized,
{
  let previous = repo.get_status(candidate.person_id)?;
  let status = derive(previous.as_ref(), candidate, history, policy)?;
  repo.upsert_status(&status)?;
  Ok(status)
}
