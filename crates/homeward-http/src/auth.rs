//! HTTP Basic-auth extractor — the principal provider.
//!
//! Resolves the credentials against the user table once per request and
//! hands the core an [`Actor`] descriptor. The core never re-validates
//! credentials.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use homeward_core::{Error as CoreError, actor::Actor, store::EntityStore};

use crate::{AppState, error::ApiError};

/// Present in a handler signature means the request carried valid
/// credentials; the inner [`Actor`] is the authenticated principal.
pub struct CurrentActor(pub Actor);

/// Verify credentials from headers and build the actor descriptor.
pub async fn authenticate<S>(
  headers: &HeaderMap,
  state: &AppState<S>,
) -> Result<Actor, ApiError>
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;
  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = state
    .store
    .user_by_username(username)
    .await
    .map_err(CoreError::store)?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  // The vet profile id rides on the actor so the shelter policy can
  // recognise the user behind an assigned vet without another lookup.
  let vet_id = state
    .store
    .vet_by_user(user.user_id)
    .await
    .map_err(CoreError::store)?
    .map(|v| v.vet_id);

  Ok(Actor::from_user(&user, vet_id))
}

impl<S> FromRequestParts<AppState<S>> for CurrentActor
where
  S: EntityStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let actor = authenticate(&parts.headers, state).await?;
    Ok(CurrentActor(actor))
  }
}
