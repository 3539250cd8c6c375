//! Shelter profile operations and the shelter authorization toggle.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  actor::Actor,
  error::{Error, Result},
  policy,
  role::Role,
  shelter::{Shelter, ShelterProfile},
  store::{Commit, EntityStore},
};

use super::{require_admin, require_shelter, require_user};

/// List every shelter. Admin only; individual shelters are readable per the
/// access policy through [`get`].
pub async fn list<S: EntityStore>(store: &S, actor: &Actor) -> Result<Vec<Shelter>> {
  require_admin(actor, "list shelters")?;
  store.list_shelters().await.map_err(Error::store)
}

/// Fetch one shelter, policy-gated.
pub async fn get<S: EntityStore>(
  store: &S,
  actor: &Actor,
  shelter_id: Uuid,
) -> Result<Shelter> {
  let shelter = require_shelter(store, shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("view this shelter"));
  }
  Ok(shelter)
}

/// The shelter profile of `user_id`, viewed by admins, visitors, or the
/// user itself. `Ok(None)` means the user may still create one; only the
/// owner sees that, anyone else gets the not-found condition.
pub async fn for_user<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Option<Shelter>> {
  if !actor.is_admin() && !actor.is_user(user_id) && !actor.has_role(Role::Visitor) {
    return Err(Error::Forbidden("view this shelter profile"));
  }
  require_user(store, user_id).await?;
  let shelter = store.shelter_by_user(user_id).await.map_err(Error::store)?;
  if shelter.is_none() && !actor.is_user(user_id) {
    return Err(Error::ProfileMissing(user_id));
  }
  Ok(shelter)
}

/// Create the shelter profile on first save, update it in place afterwards.
/// Never touches `authorized`; a de-authorized shelter keeps its vet
/// reference cleared on every save.
pub async fn upsert_profile<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
  profile: ShelterProfile,
) -> Result<Shelter> {
  if !actor.is_user(user_id) {
    return Err(Error::Forbidden("edit another user's shelter profile"));
  }
  require_user(store, user_id).await?;

  let shelter = match store.shelter_by_user(user_id).await.map_err(Error::store)? {
    Some(mut existing) => {
      existing.apply_profile(&profile);
      if !existing.authorized {
        existing.vet_id = None;
      }
      existing
    }
    None => Shelter {
      shelter_id: Uuid::new_v4(),
      name:       profile.name.clone(),
      address:    profile.address.clone(),
      city:       profile.city.clone(),
      phone:      profile.phone.clone(),
      authorized: false,
      user_id:    Some(user_id),
      vet_id:     None,
      created_at: Utc::now(),
    },
  };

  store
    .apply(Commit::new().shelter(shelter.clone()))
    .await
    .map_err(Error::store)?;
  Ok(shelter)
}

/// Admin-only: flip the shelter's `authorized` gate together with the
/// owner's structural role, in one commit. De-authorizing clears the
/// assigned vet, since a de-authorized shelter cannot retain one. Fails
/// with the not-found condition before any mutation when the user never
/// created a profile.
pub async fn toggle_authorization<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Shelter> {
  require_admin(actor, "authorize shelters")?;
  let mut user = require_user(store, user_id).await?;
  let mut shelter = store
    .shelter_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(user_id))?;
  store
    .find_role_by_name(Role::Shelter.name())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::RoleNotFound(Role::Shelter.name().to_owned()))?;

  user.toggle_role(Role::Shelter);
  shelter.authorized = !shelter.authorized;
  if !shelter.authorized {
    shelter.vet_id = None;
  }

  store
    .apply(Commit::new().user(user).shelter(shelter.clone()))
    .await
    .map_err(Error::store)?;
  tracing::info!(
    shelter = %shelter.shelter_id,
    authorized = shelter.authorized,
    "shelter authorization toggled"
  );
  Ok(shelter)
}
