//! The duty chain: a person's ordered intervals, at most one of them open.
//!
//! Opening a new interval closes the currently open one on the day before the
//! new start date. The close is unconditional: a back-dated start closes the
//! open interval before it began rather than being rejected.

use crate::{
  Result,
  duty::{DutyId, DutyInterval, NewDuty, day_before},
  repository::DutyRepository,
};

/// The writes performed by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainUpdate {
  /// The interval that was open before, now ending the day before
  /// `opened.start_date`.
  pub closed: Option<DutyId>,
  /// The new open interval.
  pub opened: DutyInterval,
}

/// Close the person's open interval (if any) and open one for `candidate`.
///
/// Admission rules are not checked here; callers validate first. Errors are
/// returned as-is so the enclosing unit of work can roll back.
pub fn apply<R>(repo: &mut R, candidate: &NewDuty) -> Result<ChainUpdate>
where
  R: DutyRepository + ?Sized,
{
  let closed = match repo.find_open_interval(candidate.person_id)? {
    Some(open) => {
      repo.close_interval(open.duty_id, day_before(candidate.start_date)?)?;
      Some(open.duty_id)
    }
    None => None,
  };

  let duty_id = repo.insert_interval(candidate)?;

  Ok(ChainUpdate {
    closed,
    opened: DutyInterval {
      duty_id,
      person_id: candidate.person_id,
      rank: candidate.rank.clone(),
      title: candidate.title.clone(),
      start_date: candidate.start_date,
      end_date: None,
    },
  })
}
