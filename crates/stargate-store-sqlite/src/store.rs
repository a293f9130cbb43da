//! [`SqliteStore`] — the SQLite implementation of [`CareerStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use stargate_core::{
  duty::{CareerStatus, DutyId, DutyInterval, DutyRules, NewDuty},
  orchestrator::{self, DutyRecorded},
  person::{CareerView, Person, PersonId, normalize_name},
  store::CareerStore,
};

use crate::{
  Error, Result,
  encode::{RawCareer, RawDuty, RawPerson, RawStatus, encode_dt},
  error::is_constraint_violation,
  locks::PersonLocks,
  repository::TxRepository,
  schema::SCHEMA,
};

/// How long a writer waits on another connection's write lock before the
/// call fails with a concurrency conflict.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stargate career store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and the lock table are
/// reference-counted, so clones serialise against each other.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  locks: Arc<PersonLocks>,
  rules: DutyRules,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Replace the admission and projection rules (default: [`DutyRules::default`]).
  pub fn with_rules(mut self, rules: DutyRules) -> Self {
    self.rules = rules;
    self
  }

  pub fn rules(&self) -> DutyRules { self.rules }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      locks: Arc::new(PersonLocks::default()),
      rules: DutyRules::default(),
    })
  }

  /// Occupy the database thread for `hold`; later calls queue behind it.
  #[cfg(test)]
  pub(crate) async fn stall(&self, hold: Duration) -> Result<()> {
    self
      .conn
      .call(move |_| {
        std::thread::sleep(hold);
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn select_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM people WHERE person_id = ?1", RawPerson::COLUMNS),
              rusqlite::params![id],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}

// ─── Cancellation ────────────────────────────────────────────────────────────

/// Raises a flag if the `record_duty` future is dropped before the database
/// thread has reported back. The unit of work checks the flag right before
/// `COMMIT` and rolls back when it is set.
struct CancelOnDrop {
  flag:  Arc<AtomicBool>,
  armed: bool,
}

impl CancelOnDrop {
  fn new() -> Self {
    Self { flag: Arc::new(AtomicBool::new(false)), armed: true }
  }

  fn flag(&self) -> Arc<AtomicBool> { Arc::clone(&self.flag) }

  fn disarm(mut self) { self.armed = false; }
}

impl Drop for CancelOnDrop {
  fn drop(&mut self) {
    if self.armed {
      self.flag.store(true, Ordering::Release);
    }
  }
}

// ─── CareerStore impl ────────────────────────────────────────────────────────

impl CareerStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person(&self, name: String) -> Result<Person> {
    let name = normalize_name(&name)?;
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let name_sql = name.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO people (name, created_at) VALUES (?1, ?2)",
          rusqlite::params![name_sql, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let person_id =
      inserted.ok_or_else(|| stargate_core::Error::PersonNameTaken(name.clone()))?;

    tracing::info!(person_id, name = %name, "person created");
    Ok(Person { person_id, name, created_at })
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    self.select_person(id).await
  }

  async fn get_person_by_name(&self, name: &str) -> Result<Option<Person>> {
    let name = name.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM people WHERE name = ?1", RawPerson::COLUMNS),
              rusqlite::params![name],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self) -> Result<Vec<CareerView>> {
    let raws: Vec<RawCareer> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("{} ORDER BY p.person_id", RawCareer::SELECT))?;
        let rows = stmt
          .query_map([], RawCareer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCareer::into_view).collect()
  }

  async fn get_career(&self, id: PersonId) -> Result<Option<CareerView>> {
    let raw: Option<RawCareer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{} WHERE p.person_id = ?1", RawCareer::SELECT),
              rusqlite::params![id],
              RawCareer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCareer::into_view).transpose()
  }

  async fn rename_person(&self, id: PersonId, name: String) -> Result<Person> {
    let name = normalize_name(&name)?;
    let name_sql = name.clone();

    // `None`: no such person; `Some(false)`: name taken.
    let renamed: Option<bool> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "UPDATE people SET name = ?2 WHERE person_id = ?1",
          rusqlite::params![id, name_sql],
        ) {
          Ok(0) => Ok(None),
          Ok(_) => Ok(Some(true)),
          Err(e) if is_constraint_violation(&e) => Ok(Some(false)),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match renamed {
      None => Err(stargate_core::Error::PersonNotFound(id).into()),
      Some(false) => Err(stargate_core::Error::PersonNameTaken(name).into()),
      Some(true) => {
        tracing::info!(person_id = id, name = %name, "person renamed");
        self
          .select_person(id)
          .await?
          .ok_or_else(|| stargate_core::Error::PersonNotFound(id).into())
      }
    }
  }

  async fn delete_person(&self, id: PersonId) -> Result<()> {
    let _chain = self.locks.lock(id).await;

    // Duties and career status go with the person via ON DELETE CASCADE.
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(stargate_core::Error::PersonNotFound(id).into());
    }
    tracing::info!(person_id = id, "person deleted");
    Ok(())
  }

  // ── Duties ────────────────────────────────────────────────────────────────

  async fn record_duty(&self, duty: NewDuty) -> Result<DutyRecorded> {
    let person_id = duty.person_id;
    let _chain = self.locks.lock(person_id).await;

    let rules = self.rules;
    let cancel = CancelOnDrop::new();
    let cancelled = cancel.flag();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result =
          orchestrator::record_duty(&mut TxRepository::new(&tx), &rules, &duty);

        // Dropping `tx` without committing rolls the unit of work back.
        match result {
          Ok(_) if cancelled.load(Ordering::Acquire) => {
            Ok(Err(stargate_core::Error::Cancelled))
          }
          Ok(recorded) => {
            tx.commit()?;
            Ok(Ok(recorded))
          }
          Err(e) => Ok(Err(e)),
        }
      })
      .await;
    cancel.disarm();

    match outcome? {
      Ok(recorded) => {
        tracing::info!(
          person_id,
          duty_id = recorded.duty.duty_id,
          closed = ?recorded.closed,
          title = %recorded.duty.title,
          "duty recorded"
        );
        Ok(recorded)
      }
      Err(e) => {
        tracing::debug!(person_id, error = %e, "duty rejected");
        Err(e.into())
      }
    }
  }

  async fn get_duty(&self, id: DutyId) -> Result<Option<DutyInterval>> {
    let raw: Option<RawDuty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM duties WHERE duty_id = ?1", RawDuty::COLUMNS),
              rusqlite::params![id],
              RawDuty::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDuty::into_interval).transpose()
  }

  async fn list_duties(&self, person_id: PersonId) -> Result<Vec<DutyInterval>> {
    let raws: Vec<RawDuty> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM duties WHERE person_id = ?1
           ORDER BY start_date, duty_id",
          RawDuty::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawDuty::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDuty::into_interval).collect()
  }

  async fn get_status(&self, person_id: PersonId) -> Result<Option<CareerStatus>> {
    let raw: Option<RawStatus> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM career_status WHERE person_id = ?1",
                RawStatus::COLUMNS
              ),
              rusqlite::params![person_id],
              RawStatus::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStatus::into_status).transpose()
  }
}
