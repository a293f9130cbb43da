//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use chrono::NaiveDate;
use stargate_core::{
  Classify, FailureKind,
  duty::{DutyRules, NewDuty, ProjectionPolicy},
  person::Person,
  store::CareerStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn person(s: &SqliteStore, name: &str) -> Person {
  s.add_person(name.into()).await.unwrap()
}

fn kind(err: &Error) -> FailureKind { err.failure_kind() }

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let p = person(&s, "  Jane Doe ").await;
  assert_eq!(p.name, "Jane Doe");

  let fetched = s.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(fetched, p);

  let by_name = s.get_person_by_name("Jane Doe").await.unwrap().unwrap();
  assert_eq!(by_name.person_id, p.person_id);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
  assert!(s.get_person_by_name("Nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_person_name_is_rejected() {
  let s = store().await;
  person(&s, "Jane Doe").await;

  let err = s.add_person("Jane Doe".into()).await.unwrap_err();
  assert_eq!(kind(&err), FailureKind::PersonNameTaken);
}

#[tokio::test]
async fn blank_person_name_is_rejected() {
  let s = store().await;
  let err = s.add_person("   ".into()).await.unwrap_err();
  assert_eq!(kind(&err), FailureKind::InvalidInput);
}

#[tokio::test]
async fn rename_person() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  person(&s, "John Roe").await;

  let renamed = s.rename_person(p.person_id, "Jane Smith".into()).await.unwrap();
  assert_eq!(renamed.name, "Jane Smith");
  assert_eq!(renamed.created_at, p.created_at);

  let err = s
    .rename_person(p.person_id, "John Roe".into())
    .await
    .unwrap_err();
  assert_eq!(kind(&err), FailureKind::PersonNameTaken);

  let err = s.rename_person(999, "Ghost".into()).await.unwrap_err();
  assert_eq!(kind(&err), FailureKind::PersonNotFound);
}

#[tokio::test]
async fn list_people_includes_career_status() {
  let s = store().await;
  let enrolled = person(&s, "Jane Doe").await;
  let civilian = person(&s, "John Roe").await;
  s.record_duty(NewDuty::new(enrolled.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();

  let people = s.list_people().await.unwrap();
  assert_eq!(people.len(), 2);
  assert_eq!(people[0].person.person_id, enrolled.person_id);
  assert_eq!(
    people[0].status.as_ref().map(|st| st.current_title.as_str()),
    Some("Spaceman")
  );
  assert_eq!(people[1].person.person_id, civilian.person_id);
  assert!(!people[1].is_enrolled());

  let career = s.get_career(civilian.person_id).await.unwrap().unwrap();
  assert!(career.status.is_none());
  assert!(s.get_career(999).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_person_cascades() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  let recorded = s
    .record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();

  s.delete_person(p.person_id).await.unwrap();

  assert!(s.get_person(p.person_id).await.unwrap().is_none());
  assert!(s.get_duty(recorded.duty.duty_id).await.unwrap().is_none());
  assert!(s.list_duties(p.person_id).await.unwrap().is_empty());
  assert!(s.get_status(p.person_id).await.unwrap().is_none());

  let err = s.delete_person(p.person_id).await.unwrap_err();
  assert_eq!(kind(&err), FailureKind::PersonNotFound);
}

// ─── Duty chain ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn enrollment_opens_first_interval_and_status() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;

  let recorded = s
    .record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();
  assert_eq!(recorded.closed, None);

  let duties = s.list_duties(p.person_id).await.unwrap();
  assert_eq!(duties, vec![recorded.duty.clone()]);
  assert!(duties[0].is_open());
  assert_eq!(duties[0].start_date, date(2020, 1, 1));

  let status = s.get_status(p.person_id).await.unwrap().unwrap();
  assert_eq!(status.current_title, "Spaceman");
  assert_eq!(status.current_rank, "CPT");
  assert_eq!(status.career_start_date, date(2020, 1, 1));
  assert_eq!(status.career_end_date, None);
}

#[tokio::test]
async fn promotion_closes_previous_interval() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  let first = s
    .record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();

  let second = s
    .record_duty(NewDuty::new(p.person_id, "CAPT", "Commander", date(2020, 2, 1)))
    .await
    .unwrap();
  assert_eq!(second.closed, Some(first.duty.duty_id));

  let closed = s.get_duty(first.duty.duty_id).await.unwrap().unwrap();
  assert_eq!(closed.end_date, Some(date(2020, 1, 31)));

  let opened = s.get_duty(second.duty.duty_id).await.unwrap().unwrap();
  assert!(opened.is_open());
  assert_eq!(opened.start_date, date(2020, 2, 1));

  let status = s.get_status(p.person_id).await.unwrap().unwrap();
  assert_eq!(status.current_title, "Commander");
  assert_eq!(status.career_start_date, date(2020, 1, 1));
}

#[tokio::test]
async fn non_spaceman_enrollment_writes_nothing() {
  let s = store().await;
  let q = person(&s, "John Roe").await;

  let err = s
    .record_duty(NewDuty::new(q.person_id, "CPT", "Commander", date(2020, 1, 1)))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), FailureKind::EnrollmentRequiresSpaceman);

  assert!(s.list_duties(q.person_id).await.unwrap().is_empty());
  assert!(s.get_status(q.person_id).await.unwrap().is_none());
}

#[tokio::test]
async fn retirement_sets_career_end() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  s.record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();
  let commander = s
    .record_duty(NewDuty::new(p.person_id, "CAPT", "Commander", date(2020, 2, 1)))
    .await
    .unwrap();

  let retired = s
    .record_duty(NewDuty::new(p.person_id, "CAPT", "RETIRED", date(2021, 1, 1)))
    .await
    .unwrap();
  assert_eq!(retired.status.career_end_date, Some(date(2020, 12, 31)));

  let closed = s.get_duty(commander.duty.duty_id).await.unwrap().unwrap();
  assert_eq!(closed.end_date, Some(date(2020, 12, 31)));

  let status = s.get_status(p.person_id).await.unwrap().unwrap();
  assert_eq!(status.career_end_date, Some(date(2020, 12, 31)));
  assert_eq!(status.current_title, "RETIRED");
}

#[tokio::test]
async fn resubmission_is_rejected_and_state_unchanged() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  let duty = NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1));
  s.record_duty(duty.clone()).await.unwrap();
  let before = s.list_duties(p.person_id).await.unwrap();
  let status_before = s.get_status(p.person_id).await.unwrap();

  let err = s.record_duty(duty).await.unwrap_err();
  assert_eq!(kind(&err), FailureKind::DuplicateDuty);
  assert!(!kind(&err).is_retryable());

  assert_eq!(s.list_duties(p.person_id).await.unwrap(), before);
  assert_eq!(s.get_status(p.person_id).await.unwrap(), status_before);
}

#[tokio::test]
async fn unknown_person_is_not_found() {
  let s = store().await;
  let err = s
    .record_duty(NewDuty::new(404, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), FailureKind::PersonNotFound);
}

#[tokio::test]
async fn duties_are_listed_by_start_date() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  for (title, start) in [
    ("Spaceman", date(2020, 1, 1)),
    ("Engineer", date(2020, 9, 1)),
    ("Pilot", date(2020, 5, 1)),
  ] {
    s.record_duty(NewDuty::new(p.person_id, "CPT", title, start))
      .await
      .unwrap();
  }

  let titles: Vec<_> = s
    .list_duties(p.person_id)
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.title)
    .collect();
  assert_eq!(titles, ["Spaceman", "Pilot", "Engineer"]);
}

#[tokio::test]
async fn latest_start_policy_ignores_back_dated_duty() {
  let s = store().await.with_rules(DutyRules {
    projection: ProjectionPolicy::LatestStart,
    ..DutyRules::default()
  });
  let p = person(&s, "Jane Doe").await;
  s.record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();
  s.record_duty(NewDuty::new(p.person_id, "CAPT", "Commander", date(2020, 6, 1)))
    .await
    .unwrap();
  s.record_duty(NewDuty::new(p.person_id, "LT", "Pilot", date(2020, 3, 1)))
    .await
    .unwrap();

  let status = s.get_status(p.person_id).await.unwrap().unwrap();
  assert_eq!(status.current_title, "Commander");
}

#[tokio::test]
async fn retired_person_rejected_when_configured() {
  let s = store().await.with_rules(DutyRules {
    reject_after_retirement: true,
    ..DutyRules::default()
  });
  let p = person(&s, "Jane Doe").await;
  s.record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();
  s.record_duty(NewDuty::new(p.person_id, "CPT", "RETIRED", date(2021, 1, 1)))
    .await
    .unwrap();

  let err = s
    .record_duty(NewDuty::new(p.person_id, "CPT", "Consultant", date(2022, 1, 1)))
    .await
    .unwrap_err();
  assert_eq!(kind(&err), FailureKind::CareerEnded);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duties_for_one_person_leave_one_open_interval() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;
  s.record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();

  let (a, b) = tokio::join!(
    s.record_duty(NewDuty::new(p.person_id, "CAPT", "Commander", date(2020, 2, 1))),
    s.record_duty(NewDuty::new(p.person_id, "MAJ", "Pilot", date(2020, 3, 1))),
  );
  for result in [&a, &b] {
    if let Err(e) = result {
      assert_eq!(kind(e), FailureKind::ConcurrencyConflict);
    }
  }

  let duties = s.list_duties(p.person_id).await.unwrap();
  assert_eq!(duties.iter().filter(|d| d.is_open()).count(), 1);
  assert_eq!(duties.len(), 1 + [a, b].iter().filter(|r| r.is_ok()).count());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrollments_cannot_both_pass_entry_check() {
  let s = store().await;
  let p = person(&s, "Jane Doe").await;

  let (a, b) = tokio::join!(
    s.record_duty(NewDuty::new(p.person_id, "CPT", "Spaceman", date(2020, 1, 1))),
    s.record_duty(NewDuty::new(p.person_id, "CPT", "Commander", date(2020, 1, 2))),
  );

  // Whichever lands second sees the first; a Commander enrollment can only
  // succeed after the Spaceman one.
  assert!(a.is_ok());
  let duties = s.list_duties(p.person_id).await.unwrap();
  assert_eq!(duties[0].title, "Spaceman");
  assert_eq!(duties.iter().filter(|d| d.is_open()).count(), 1);
  if let Err(e) = b {
    assert_eq!(kind(&e), FailureKind::EnrollmentRequiresSpaceman);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn separate_connections_serialise_on_the_database() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("stargate.db");
  let one = SqliteStore::open(&path).await.unwrap();
  let two = SqliteStore::open(&path).await.unwrap();

  let person_id = person(&one, "Jane Doe").await.person_id;
  one
    .record_duty(NewDuty::new(person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();

  let mut tasks = Vec::new();
  for (i, store) in [one.clone(), two.clone(), one.clone(), two.clone()]
    .into_iter()
    .enumerate()
  {
    let title = format!("Assignment {i}");
    let start = date(2020, 2 + i as u32, 1);
    tasks.push(tokio::spawn(async move {
      store
        .record_duty(NewDuty::new(person_id, "CPT", title, start))
        .await
    }));
  }
  for task in tasks {
    if let Err(e) = task.await.unwrap() {
      assert!(kind(&e).is_retryable(), "unexpected failure: {e}");
    }
  }

  let duties = two.list_duties(person_id).await.unwrap();
  assert_eq!(duties.iter().filter(|d| d.is_open()).count(), 1);
  let status = one.get_status(person_id).await.unwrap().unwrap();
  assert_eq!(status.career_start_date, date(2020, 1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn aborted_call_commits_all_or_nothing() {
  let s = store().await;
  let person_id = person(&s, "Jane Doe").await.person_id;

  for attempt in 0..20u32 {
    let store = s.clone();
    let start = date(2020, 1, 1) + chrono::Days::new(u64::from(attempt));
    let title = if attempt == 0 { "Spaceman".to_owned() } else { format!("Duty {attempt}") };
    let task = tokio::spawn(async move {
      store
        .record_duty(NewDuty::new(person_id, "CPT", title, start))
        .await
    });
    tokio::task::yield_now().await;
    task.abort();
    let _ = task.await;

    let duties = s.list_duties(person_id).await.unwrap();
    let status = s.get_status(person_id).await.unwrap();
    assert_eq!(duties.is_empty(), status.is_none());
    if !duties.is_empty() {
      assert_eq!(duties.iter().filter(|d| d.is_open()).count(), 1);
      let latest = duties.iter().max_by_key(|d| d.start_date).unwrap();
      assert_eq!(status.unwrap().current_title, latest.title);
    }
  }
}

#[tokio::test]
async fn dropped_record_duty_rolls_back_before_commit() {
  let s = store().await;
  let person_id = person(&s, "Jane Doe").await.person_id;

  let blocker = tokio::spawn({
    let s = s.clone();
    async move { s.stall(Duration::from_millis(300)).await }
  });
  tokio::time::sleep(Duration::from_millis(20)).await;

  // Dropped while its unit of work is still queued behind the blocker.
  let timed_out = tokio::time::timeout(
    Duration::from_millis(50),
    s.record_duty(NewDuty::new(person_id, "CPT", "Spaceman", date(2020, 1, 1))),
  )
  .await;
  assert!(timed_out.is_err());

  blocker.await.unwrap().unwrap();
  assert!(s.list_duties(person_id).await.unwrap().is_empty());
  assert!(s.get_status(person_id).await.unwrap().is_none());

  // The person lock was released with the dropped call.
  let recorded = s
    .record_duty(NewDuty::new(person_id, "CPT", "Spaceman", date(2020, 1, 1)))
    .await
    .unwrap();
  assert_eq!(recorded.closed, None);
}
