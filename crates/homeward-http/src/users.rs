//! Handlers for accounts: registration and admin listing.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rand_core::OsRng;
use serde::Deserialize;
use uuid::Uuid;

use homeward_core::{
  Error as CoreError,
  ops,
  store::EntityStore,
  user::{NewUser, User},
};

use crate::{AppState, auth::CurrentActor, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub email:    String,
  pub password: String,
}

/// `POST /auth/register` — open to unauthenticated callers.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let salt = SaltString::generate(&mut OsRng);
  let password_hash = Argon2::default()
    .hash_password(body.password.as_bytes(), &salt)
    .map_err(|e| CoreError::InvalidState(format!("unusable password: {e}")))?
    .to_string();

  let user = ops::users::register(state.store.as_ref(), NewUser {
    username: body.username,
    email: body.email,
    password_hash,
  })
  .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}` — admin or the account itself.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let user = ops::users::get(state.store.as_ref(), &actor, id).await?;
  Ok(Json(user))
}

/// `GET /users` — admin only.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let users = ops::users::list(state.store.as_ref(), &actor).await?;
  Ok(Json(users))
}
