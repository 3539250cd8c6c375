//! Handlers for vets: profiles, the authorization toggle with its cascade,
//! and shelter assignment.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use homeward_core::{
  animal::Animal,
  ops,
  store::EntityStore,
  vet::{Vet, VetProfile},
};

use crate::{AppState, auth::CurrentActor, error::ApiError};

pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Vet>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let vets = ops::vets::list(state.store.as_ref(), &actor).await?;
  Ok(Json(vets))
}

pub async fn for_user<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Option<Vet>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let vet = ops::vets::for_user(state.store.as_ref(), &actor, id).await?;
  Ok(Json(vet))
}

pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(profile): Json<VetProfile>,
) -> Result<Json<Vet>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let vet = ops::vets::upsert_profile(state.store.as_ref(), &actor, id, profile).await?;
  Ok(Json(vet))
}

pub async fn authorize<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vet>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let vet = ops::vets::toggle_authorization(state.store.as_ref(), &actor, id).await?;
  Ok(Json(vet))
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub shelter_id: Uuid,
}

/// `POST /vets/{id}/shelters` — admin assigns a shelter to the vet.
pub async fn assign_shelter<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  ops::vets::assign_shelter(state.store.as_ref(), &actor, id, body.shelter_id).await?;
  Ok(Json(serde_json::json!({ "assigned": true })))
}

/// `GET /users/{id}/vet/animals` — every animal across the vet's shelters.
pub async fn animals<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Animal>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animals = ops::vets::animals(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animals))
}
