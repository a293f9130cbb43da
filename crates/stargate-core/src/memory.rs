//! In-memory repository used by the engine's unit tests.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  duty::{CareerStatus, DutyId, DutyInterval, NewDuty},
  person::PersonId,
  repository::{DutyRepository, PersonDirectory},
};

#[derive(Debug, Default)]
pub struct MemoryRepository {
  people:    BTreeSet<PersonId>,
  intervals: BTreeMap<DutyId, DutyInterval>,
  statuses:  BTreeMap<PersonId, CareerStatus>,
  next_id:   DutyId,
}

impl MemoryRepository {
  pub fn with_person(person_id: PersonId) -> Self {
    let mut repo = Self::default();
    repo.people.insert(person_id);
    repo
  }
}

impl PersonDirectory for MemoryRepository {
  fn person_exists(&self, person_id: PersonId) -> Result<bool> {
    Ok(self.people.contains(&person_id))
  }
}

impl DutyRepository for MemoryRepository {
  fn find_open_interval(
    &self,
    person_id: PersonId,
  ) -> Result<Option<DutyInterval>> {
    Ok(
      self
        .intervals
        .values()
        .find(|d| d.person_id == person_id && d.is_open())
        .cloned(),
    )
  }

  fn list_intervals(&self, person_id: PersonId) -> Result<Vec<DutyInterval>> {
    let mut intervals: Vec<_> = self
      .intervals
      .values()
      .filter(|d| d.person_id == person_id)
      .cloned()
      .collect();
    intervals.sort_by_key(|d| (d.start_date, d.duty_id));
    Ok(intervals)
  }

  fn insert_interval(&mut self, duty: &NewDuty) -> Result<DutyId> {
    self.next_id += 1;
    let duty_id = self.next_id;
    self.intervals.insert(duty_id, DutyInterval {
      duty_id,
      person_id: duty.person_id,
      rank: duty.rank.clone(),
      title: duty.title.clone(),
      start_date: duty.start_date,
      end_date: None,
    });
    Ok(duty_id)
  }

  fn close_interval(
    &mut self,
    duty_id: DutyId,
    end_date: NaiveDate,
  ) -> Result<()> {
    let interval = self
      .intervals
      .get_mut(&duty_id)
      .ok_or(Error::DutyNotFound(duty_id))?;
    interval.end_date = Some(end_date);
    Ok(())
  }

  fn get_status(&self, person_id: PersonId) -> Result<Option<CareerStatus>> {
    Ok(self.statuses.get(&person_id).cloned())
  }

  fn upsert_status(&mut self, status: &CareerStatus) -> Result<()> {
    self.statuses.insert(status.person_id, status.clone());
    Ok(())
  }
}
