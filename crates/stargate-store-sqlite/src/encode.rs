//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as ISO 8601
//! `YYYY-MM-DD`, so lexical order in SQL matches chronological order.

use chrono::{DateTime, NaiveDate, Utc};
use stargate_core::{
  duty::{CareerStatus, DutyInterval},
  person::{CareerView, Person},
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub person_id:  i64,
  pub name:       String,
  pub created_at: String,
}

impl RawPerson {
  pub const COLUMNS: &'static str = "person_id, name, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:  row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:  self.person_id,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `duties` row.
pub struct RawDuty {
  pub duty_id:    i64,
  pub person_id:  i64,
  pub rank:       String,
  pub duty_title: String,
  pub start_date: String,
  pub end_date:   Option<String>,
}

impl RawDuty {
  pub const COLUMNS: &'static str =
    "duty_id, person_id, rank, duty_title, start_date, end_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      duty_id:    row.get(0)?,
      person_id:  row.get(1)?,
      rank:       row.get(2)?,
      duty_title: row.get(3)?,
      start_date: row.get(4)?,
      end_date:   row.get(5)?,
    })
  }

  pub fn into_interval(self) -> Result<DutyInterval> {
    Ok(DutyInterval {
      duty_id:    self.duty_id,
      person_id:  self.person_id,
      rank:       self.rank,
      title:      self.duty_title,
      start_date: decode_date(&self.start_date)?,
      end_date:   self.end_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// Raw values read directly from a `career_status` row.
pub struct RawStatus {
  pub person_id:         i64,
  pub current_rank:      String,
  pub current_title:     String,
  pub career_start_date: String,
  pub career_end_date:   Option<String>,
}

impl RawStatus {
  pub const COLUMNS: &'static str = "person_id, current_rank, current_title, \
                                     career_start_date, career_end_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Self::from_row_at(row, 0)
  }

  /// Read the five status columns starting at `offset`.
  pub fn from_row_at(
    row: &rusqlite::Row<'_>,
    offset: usize,
  ) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:         row.get(offset)?,
      current_rank:      row.get(offset + 1)?,
      current_title:     row.get(offset + 2)?,
      career_start_date: row.get(offset + 3)?,
      career_end_date:   row.get(offset + 4)?,
    })
  }

  pub fn into_status(self) -> Result<CareerStatus> {
    Ok(CareerStatus {
      person_id:         self.person_id,
      current_rank:      self.current_rank,
      current_title:     self.current_title,
      career_start_date: decode_date(&self.career_start_date)?,
      career_end_date:   self
        .career_end_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
    })
  }
}

/// A `people` row left-joined with its `career_status` row.
pub struct RawCareer {
  pub person: RawPerson,
  pub status: Option<RawStatus>,
}

impl RawCareer {
  /// The join selects the person columns followed by the status columns.
  pub const SELECT: &'static str = "SELECT
       p.person_id, p.name, p.created_at,
       s.person_id, s.current_rank, s.current_title,
       s.career_start_date, s.career_end_date
     FROM people p
     LEFT JOIN career_status s ON s.person_id = p.person_id";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let person = RawPerson::from_row(row)?;
    let status_id: Option<i64> = row.get(3)?;
    let status = match status_id {
      Some(_) => Some(RawStatus::from_row_at(row, 3)?),
      None => None,
    };
    Ok(Self { person, status })
  }

  pub fn into_view(self) -> Result<CareerView> {
    Ok(CareerView {
      person: self.person.into_person()?,
      status: self.status.map(RawStatus::into_status).transpose()?,
    })
  }
}
