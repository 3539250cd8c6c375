//! Handlers for animals: listing and editing, the vet sign-off, and the
//! visit request protocol.
//!
//! Each capability is its own route. There is no role-dispatched catch-all
//! POST: an actor whose roles fit none of the capabilities gets an explicit
//! 403 from the ops layer.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;

use homeward_core::{
  animal::{Animal, AnimalDetails},
  ops,
  store::EntityStore,
  visit::PendingVisit,
};

use crate::{AppState, auth::CurrentActor, error::ApiError};

/// `GET /animals` — the visitor-facing browse view.
pub async fn browse<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Animal>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animals = ops::animals::browse(state.store.as_ref(), &actor).await?;
  Ok(Json(animals))
}

/// `POST /animals` — list a new animal under the caller's own shelter.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Json(details): Json<AnimalDetails>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal = ops::animals::create(state.store.as_ref(), &actor, details).await?;
  Ok((StatusCode::CREATED, Json(animal)))
}

/// `GET /animals/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal = ops::animals::get(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animal))
}

/// `PUT /animals/{id}` — the shelter owner's edit.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
  Json(details): Json<AnimalDetails>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal = ops::animals::update(state.store.as_ref(), &actor, id, details).await?;
  Ok(Json(animal))
}

/// `POST /animals/{id}/accepted` — the vet's sign-off toggle.
pub async fn toggle_accepted<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal = ops::animals::toggle_accepted(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animal))
}

/// `POST /animals/{id}/visit-request` — the visitor's request toggle.
pub async fn toggle_visit_request<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal =
    ops::animals::toggle_visit_request(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animal))
}

/// `GET /shelters/{id}/animals`
pub async fn by_shelter<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Animal>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animals = ops::animals::by_shelter(state.store.as_ref(), &actor, id).await?;
  Ok(Json(animals))
}

/// `GET /shelters/{id}/pending-visits` — the actionable request queue.
pub async fn pending_visits<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PendingVisit>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let rows = ops::animals::pending_visits(state.store.as_ref(), &actor, id).await?;
  Ok(Json(rows))
}

/// `POST /shelters/{id}/animals/{animal_id}/visit/approve`
pub async fn approve_visit<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path((shelter_id, animal_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal =
    ops::animals::approve_visit(state.store.as_ref(), &actor, shelter_id, animal_id)
      .await?;
  Ok(Json(animal))
}

/// `POST /shelters/{id}/animals/{animal_id}/visit/deny`
pub async fn deny_visit<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path((shelter_id, animal_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Animal>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let animal =
    ops::animals::deny_visit(state.store.as_ref(), &actor, shelter_id, animal_id)
      .await?;
  Ok(Json(animal))
}
