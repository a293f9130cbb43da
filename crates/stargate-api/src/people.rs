//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Every person with their career status |
//! | `POST`   | `/people` | Body: `{"name":"..."}`; 409 if the name is taken |
//! | `GET`    | `/people/{id}` | 404 if not found |
//! | `PUT`    | `/people/{id}` | Body: `{"name":"..."}` |
//! | `DELETE` | `/people/{id}` | Cascades to duties and career status |
//! | `GET`    | `/people/{id}/status` | `null` until the person's first duty |
//! | `GET`    | `/people/by-name/{name}` | Exact name match |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use stargate_core::{
  Error,
  duty::CareerStatus,
  person::{CareerView, Person, PersonId},
  store::CareerStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S: CareerStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CareerView>>, ApiError> {
  let people = store.list_people().await.map_err(ApiError::failure)?;
  Ok(Json(people))
}

// ─── Create / rename ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// `POST /people` — body: `{"name":"..."}`
pub async fn create<S: CareerStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError> {
  let person = store.add_person(body.name).await.map_err(ApiError::failure)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `PUT /people/{id}` — body: `{"name":"..."}`
pub async fn rename<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  Json(body): Json<NameBody>,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .rename_person(id, body.name)
    .await
    .map_err(ApiError::failure)?;
  Ok(Json(person))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/{id}`
pub async fn get_one<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<CareerView>, ApiError> {
  let career = store
    .get_career(id)
    .await
    .map_err(ApiError::failure)?
    .ok_or(Error::PersonNotFound(id))?;
  Ok(Json(career))
}

/// `GET /people/by-name/{name}`
pub async fn get_by_name<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<CareerView>, ApiError> {
  let person = find_by_name(store.as_ref(), &name).await?;
  let career = store
    .get_career(person.person_id)
    .await
    .map_err(ApiError::failure)?
    .ok_or(Error::PersonNotFound(person.person_id))?;
  Ok(Json(career))
}

/// `GET /people/{id}/status`
pub async fn status<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Option<CareerStatus>>, ApiError> {
  store
    .get_person(id)
    .await
    .map_err(ApiError::failure)?
    .ok_or(Error::PersonNotFound(id))?;
  let status = store.get_status(id).await.map_err(ApiError::failure)?;
  Ok(Json(status))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/{id}` — 204 on success.
pub async fn delete<S: CareerStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<StatusCode, ApiError> {
  store.delete_person(id).await.map_err(ApiError::failure)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Resolve a person by exact name.
pub(crate) async fn find_by_name<S: CareerStore>(
  store: &S,
  name: &str,
) -> Result<Person, ApiError> {
  store
    .get_person_by_name(name)
    .await
    .map_err(ApiError::failure)?
    .ok_or_else(|| ApiError::from(Error::PersonNameNotFound(name.to_owned())))
}
