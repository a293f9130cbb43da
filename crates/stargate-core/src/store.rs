//! The `CareerStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `stargate-store-sqlite`). Higher layers (`stargate-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Classify,
  duty::{CareerStatus, DutyId, DutyInterval, NewDuty},
  orchestrator::DutyRecorded,
  person::{CareerView, Person, PersonId},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Stargate store backend.
///
/// Duty intervals are only ever written through [`record_duty`], which runs
/// the duty-chain engine as one atomic unit of work. Persons are created,
/// renamed and deleted independently of any duty history.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`record_duty`]: CareerStore::record_duty
pub trait CareerStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create and persist a person. Names are trimmed and must be unique.
  fn add_person(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by exact name. Returns `None` if not found.
  fn get_person_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// List every person with their career summary, ordered by id.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<CareerView>, Self::Error>> + Send + '_;

  /// A single person with their career summary.
  fn get_career(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<CareerView>, Self::Error>> + Send + '_;

  /// Change a person's name, subject to the same uniqueness rule as
  /// [`add_person`](CareerStore::add_person).
  fn rename_person(
    &self,
    id: PersonId,
    name: String,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person together with their duty intervals and career status.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Duties ────────────────────────────────────────────────────────────

  /// Run the duty-chain engine for `duty` in a single transaction,
  /// serialised against other calls for the same person.
  fn record_duty(
    &self,
    duty: NewDuty,
  ) -> impl Future<Output = Result<DutyRecorded, Self::Error>> + Send + '_;

  /// Retrieve a duty interval by id. Returns `None` if not found.
  fn get_duty(
    &self,
    id: DutyId,
  ) -> impl Future<Output = Result<Option<DutyInterval>, Self::Error>> + Send + '_;

  /// All duty intervals of a person ordered by start date.
  fn list_duties(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<DutyInterval>, Self::Error>> + Send + '_;

  /// The person's career status; `None` until their first duty.
  fn get_status(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Option<CareerStatus>, Self::Error>> + Send + '_;
}
