//! JSON REST API for the Stargate career tracker.
//!
//! Exposes an axum [`Router`] backed by any [`stargate_core::store::CareerStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stargate_api::api_router(store.clone()))
//! ```

pub mod duties;
pub mod error;
pub mod people;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stargate_core::store::CareerStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CareerStore + 'static,
{
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::rename::<S>)
        .delete(people::delete::<S>),
    )
    .route("/people/{id}/status", get(people::status::<S>))
    .route("/people/{id}/duties", get(duties::list_for_person::<S>))
    .route("/people/by-name/{name}", get(people::get_by_name::<S>))
    .route("/people/by-name/{name}/duties", get(duties::list_for_name::<S>))
    // Duties
    .route("/duties", post(duties::record::<S>))
    .route("/duties/{id}", get(duties::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
