//! JSON HTTP layer for Homeward.
//!
//! Exposes an axum [`Router`] backed by any [`EntityStore`]. Every route
//! except registration authenticates with HTTP Basic and hands the core an
//! [`homeward_core::actor::Actor`] descriptor; sessions and cookies are out
//! of scope.

pub mod animals;
pub mod auth;
pub mod error;
pub mod shelters;
pub mod users;
pub mod vets;
pub mod visitors;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use homeward_core::store::EntityStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
///
/// The `admin_*` fields bootstrap a first administrator account at startup
/// when no account with that username exists yet.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub admin_username:      Option<String>,
  pub admin_email:         Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: Option<String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: EntityStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the Homeward API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Accounts
    .route("/auth/register", post(users::register::<S>))
    .route("/users", get(users::list::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Shelter profiles & authorization
    .route(
      "/users/{id}/shelter",
      get(shelters::for_user::<S>).put(shelters::upsert::<S>),
    )
    .route("/users/{id}/shelter/authorize", post(shelters::authorize::<S>))
    // Vet profiles, authorization cascade, assignment
    .route(
      "/users/{id}/vet",
      get(vets::for_user::<S>).put(vets::upsert::<S>),
    )
    .route("/users/{id}/vet/authorize", post(vets::authorize::<S>))
    .route("/users/{id}/vet/animals", get(vets::animals::<S>))
    .route("/vets", get(vets::list::<S>))
    .route("/vets/{id}/shelters", post(vets::assign_shelter::<S>))
    // Visitor profiles & views
    .route(
      "/users/{id}/visitor",
      get(visitors::for_user::<S>).put(visitors::upsert::<S>),
    )
    .route("/users/{id}/visitor/visits", get(visitors::planned_visits::<S>))
    .route("/users/{id}/visitor/adopted", get(visitors::adopted::<S>))
    .route("/visitors", get(visitors::list::<S>))
    // Shelters
    .route("/shelters", get(shelters::list::<S>))
    .route("/shelters/{id}", get(shelters::get_one::<S>))
    .route("/shelters/{id}/animals", get(animals::by_shelter::<S>))
    .route("/shelters/{id}/pending-visits", get(animals::pending_visits::<S>))
    .route(
      "/shelters/{id}/animals/{animal_id}/visit/approve",
      post(animals::approve_visit::<S>),
    )
    .route(
      "/shelters/{id}/animals/{animal_id}/visit/deny",
      post(animals::deny_visit::<S>),
    )
    // Animals
    .route("/animals", get(animals::browse::<S>).post(animals::create::<S>))
    .route(
      "/animals/{id}",
      get(animals::get_one::<S>).put(animals::update::<S>),
    )
    .route("/animals/{id}/accepted", post(animals::toggle_accepted::<S>))
    .route(
      "/animals/{id}/visit-request",
      post(animals::toggle_visit_request::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
