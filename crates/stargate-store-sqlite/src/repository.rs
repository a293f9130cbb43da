//! [`TxRepository`] — the duty-chain engine's view of one open transaction.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension as _};
use stargate_core::{
  duty::{CareerStatus, DutyId, DutyInterval, NewDuty},
  person::PersonId,
  repository::{DutyRepository, PersonDirectory},
};

use crate::{
  encode::{RawDuty, RawStatus, encode_date},
  error::storage,
};

type CoreResult<T> = stargate_core::Result<T>;

/// Implements the core repository traits over a connection that is inside a
/// transaction. Never commits; the owner of the transaction does.
pub struct TxRepository<'tx> {
  conn: &'tx Connection,
}

impl<'tx> TxRepository<'tx> {
  pub fn new(tx: &'tx rusqlite::Transaction<'_>) -> Self { Self { conn: tx } }
}

/// A row that does not decode is reported as a storage fault, never as a
/// domain outcome.
fn corrupt(e: crate::Error) -> stargate_core::Error {
  stargate_core::Error::StorageUnavailable(e.to_string())
}

impl PersonDirectory for TxRepository<'_> {
  fn person_exists(&self, person_id: PersonId) -> CoreResult<bool> {
    let found = self
      .conn
      .query_row(
        "SELECT 1 FROM people WHERE person_id = ?1",
        rusqlite::params![person_id],
        |_| Ok(()),
      )
      .optional()
      .map_err(storage)?;
    Ok(found.is_some())
  }
}

impl DutyRepository for TxRepository<'_> {
  fn find_open_interval(
    &self,
    person_id: PersonId,
  ) -> CoreResult<Option<DutyInterval>> {
    let raw = self
      .conn
      .query_row(
        &format!(
          "SELECT {} FROM duties WHERE person_id = ?1 AND end_date IS NULL",
          RawDuty::COLUMNS
        ),
        rusqlite::params![person_id],
        RawDuty::from_row,
      )
      .optional()
      .map_err(storage)?;
    raw.map(RawDuty::into_interval).transpose().map_err(corrupt)
  }

  fn list_intervals(&self, person_id: PersonId) -> CoreResult<Vec<DutyInterval>> {
    let mut stmt = self
      .conn
      .prepare_cached(&format!(
        "SELECT {} FROM duties WHERE person_id = ?1
         ORDER BY start_date, duty_id",
        RawDuty::COLUMNS
      ))
      .map_err(storage)?;
    let raws = stmt
      .query_map(rusqlite::params![person_id], RawDuty::from_row)
      .map_err(storage)?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(storage)?;
    raws
      .into_iter()
      .map(RawDuty::into_interval)
      .collect::<crate::Result<_>>()
      .map_err(corrupt)
  }

  fn insert_interval(&mut self, duty: &NewDuty) -> CoreResult<DutyId> {
    self
      .conn
      .execute(
        "INSERT INTO duties (person_id, rank, duty_title, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, NULL)",
        rusqlite::params![
          duty.person_id,
          duty.rank,
          duty.title,
          encode_date(duty.start_date),
        ],
      )
      .map_err(storage)?;
    Ok(self.conn.last_insert_rowid())
  }

  fn close_interval(
    &mut self,
    duty_id: DutyId,
    end_date: NaiveDate,
  ) -> CoreResult<()> {
    let changed = self
      .conn
      .execute(
        "UPDATE duties SET end_date = ?2 WHERE duty_id = ?1",
        rusqlite::params![duty_id, encode_date(end_date)],
      )
      .map_err(storage)?;
    if changed == 0 {
      return Err(stargate_core::Error::DutyNotFound(duty_id));
    }
    Ok(())
  }

  fn get_status(&self, person_id: PersonId) -> CoreResult<Option<CareerStatus>> {
    let raw = self
      .conn
      .query_row(
        &format!(
          "SELECT {} FROM career_status WHERE person_id = ?1",
          RawStatus::COLUMNS
        ),
        rusqlite::params![person_id],
        RawStatus::from_row,
      )
      .optional()
      .map_err(storage)?;
    raw.map(RawStatus::into_status).transpose().map_err(corrupt)
  }

  fn upsert_status(&mut self, status: &CareerStatus) -> CoreResult<()> {
    self
      .conn
      .execute(
        "INSERT INTO career_status (
           person_id, current_rank, current_title,
           career_start_date, career_end_date
         ) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (person_id) DO UPDATE SET
           current_rank      = excluded.current_rank,
           current_title     = excluded.current_title,
           career_start_date = excluded.career_start_date,
           career_end_date   = excluded.career_end_date",
        rusqlite::params![
          status.person_id,
          status.current_rank,
          status.current_title,
          encode_date(status.career_start_date),
          status.career_end_date.map(encode_date),
        ],
      )
      .map_err(storage)?;
    Ok(())
  }
}
