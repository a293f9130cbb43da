//! Handlers for duty endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/duties` | Runs the duty chain; 201 with the recorded outcome |
//! | `GET`  | `/duties/{id}` | 404 if not found |
//! | `GET`  | `/people/{id}/duties` | Ordered by start date |
//! | `GET`  | `/people/by-name/{name}/duties` | Ordered by start date |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use stargate_core::{
  Error,
  duty::{DutyId, DutyInterval, NewDuty},
  person::PersonId,
  store::CareerStore,
};

use crate::{error::ApiError, people::find_by_name};

// ─── Record ───────────────────────────────────────────────────────────────────

/// Request body for `POST /duties`.
#[derive(Debug, Deserialize)]
pub struct RecordDutyBody {
  pub person_id:       PersonId,
  pub rank:            String,
  pub duty_title:      String,
  pub duty_start_date: NaiveDate,
}

impl From<RecordDutyBody> for NewDuty {
  fn from(b: RecordDutyBody) -> Self {
    NewDuty::new(b.person_id, b.rank, b.duty_title, b.duty_start_date)
  }
}

/// `POST /duties`
pub async fn record<S: CareerStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<RecordDutyBody>,
) -> Result<impl IntoResponse, ApiError> {
  let recorded = store
    .record_duty(body.into())
    .await
    .map_err(ApiError::failure)?;
  Ok((StatusCode::CREATED, Json(recorded)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /duties/{id}`
pub async fn get_one<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<DutyId>,
) -> Result<Json<DutyInterval>, ApiError> {
  let duty = store
    .get_duty(id)
    .await
    .map_err(ApiError::failure)?
    .ok_or(Error::DutyNotFound(id))?;
  Ok(Json(duty))
}

/// `GET /people/{id}/duties`
pub async fn list_for_person<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<DutyInterval>>, ApiError> {
  store
    .get_person(id)
    .await
    .map_err(ApiError::failure)?
    .ok_or(Error::PersonNotFound(id))?;
  let duties = store.list_duties(id).await.map_err(ApiError::failure)?;
  Ok(Json(duties))
}

/// `GET /people/by-name/{name}/duties`
pub async fn list_for_name<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<DutyInterval>>, ApiError> {
  let person = find_by_name(store.as_ref(), &name).await?;
  let duties = store
    .list_duties(person.person_id)
    .await
    .map_err(ApiError::failure)?;
  Ok(Json(duties))
}
