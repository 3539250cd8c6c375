//! Handlers for visitor profiles and the visitor's own animal views.

use axum::{
  Json,
  extract::{Path, State},
};
use uuid::Uuid;

use homeward_core::{
  animal::Animal,
  ops,
  store::EntityStore,
  visitor::{Visitor, VisitorProfile},
};

use crate::{AppState, auth::CurrentActor, error::ApiError};

pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Visitor>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let visitors = ops::visitors::list(state.store.as_ref(), &actor).await?;
  Ok(Json(visitors))
}

pub async fn for_user<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Option<Visitor>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let visitor = ops::visitors::for_user(state.store.as_ref(), &actor, id).await?;
  Ok(Json(visitor))
}

pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(profile): Json<VisitorProfile>,
) -> Result<Json<Visitor>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let visitor =
    ops::visitors::upsert_profile(state.store.as_ref(), &actor, id, profile).await?;
  Ok(Json(visitor))
}

/// `GET /users/{id}/visitor/visits` — the visitor's active visit plans.
pub async fn planned_visits<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Animal>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animals = ops::visitors::planned_visits(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animals))
}

/// `GET /users/{id}/visitor/adopted` — the visitor's adopted animals.
pub async fn adopted<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Animal>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animals = ops::visitors::adopted_animals(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animals))
}
