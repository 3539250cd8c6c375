//! Handlers for shelters and the shelter authorization toggle.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/shelters` | Admin only |
//! | `GET`  | `/shelters/{id}` | Access policy applies |
//! | `GET`  | `/users/{id}/shelter` | Profile view; `null` until created |
//! | `PUT`  | `/users/{id}/shelter` | Idempotent profile upsert |
//! | `POST` | `/users/{id}/shelter/authorize` | Admin toggle + role pairing |

use axum::{
  Json,
  extract::{Path, State},
};
use uuid::Uuid;

use homeward_core::{
  ops,
  shelter::{Shelter, ShelterProfile},
  store::EntityStore,
};

use crate::{AppState, auth::CurrentActor, error::ApiError};

pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Shelter>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let shelters = ops::shelters::list(state.store.as_ref(), &actor).await?;
  Ok(Json(shelters))
}

pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Shelter>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let shelter = ops::shelters::get(state.store.as_ref(), &actor, id).await?;
  Ok(Json(shelter))
}

pub async fn for_user<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Option<Shelter>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let shelter = ops::shelters::for_user(state.store.as_ref(), &actor, id).await?;
  Ok(Json(shelter))
}

pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(profile): Json<ShelterProfile>,
) -> Result<Json<Shelter>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let shelter =
    ops::shelters::upsert_profile(state.store.as_ref(), &actor, id, profile).await?;
  Ok(Json(shelter))
}

pub async fn authorize<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Shelter>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let shelter =
    ops::shelters::toggle_authorization(state.store.as_ref(), &actor, id).await?;
  Ok(Json(shelter))
}
