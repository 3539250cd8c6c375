//! Vet profile operations, shelter assignment, and the vet authorization
//! toggle with its cascade.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  actor::Actor,
  animal::Animal,
  error::{Error, Result},
  role::Role,
  store::{Commit, EntityStore},
  vet::{Vet, VetProfile},
};

use super::{require_admin, require_admin_or_self, require_shelter, require_user, require_vet};

/// List every vet. Admin only.
pub async fn list<S: EntityStore>(store: &S, actor: &Actor) -> Result<Vec<Vet>> {
  require_admin(actor, "list vets")?;
  store.list_vets().await.map_err(Error::store)
}

/// The vet profile of `user_id`. Admin or the user itself; there is no
/// cross-vet visibility. `Ok(None)` means the owner may still create one.
pub async fn for_user<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Option<Vet>> {
  require_admin_or_self(actor, user_id, "view this vet profile")?;
  require_user(store, user_id).await?;
  let vet = store.vet_by_user(user_id).await.map_err(Error::store)?;
  if vet.is_none() && !actor.is_user(user_id) {
    return Err(Error::ProfileMissing(user_id));
  }
  Ok(vet)
}

/// Create the vet profile on first save, update it in place afterwards.
/// `authorized` is preserved, never set from the form.
pub async fn upsert_profile<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
  profile: VetProfile,
) -> Result<Vet> {
  if !actor.is_user(user_id) {
    return Err(Error::Forbidden("edit another user's vet profile"));
  }
  require_user(store, user_id).await?;

  let vet = match store.vet_by_user(user_id).await.map_err(Error::store)? {
    Some(mut existing) => {
      existing.apply_profile(&profile);
      existing
    }
    None => Vet {
      vet_id:     Uuid::new_v4(),
      first_name: profile.first_name.clone(),
      last_name:  profile.last_name.clone(),
      id_number:  profile.id_number.clone(),
      authorized: false,
      user_id:    Some(user_id),
      created_at: Utc::now(),
    },
  };

  store
    .apply(Commit::new().vet(vet.clone()))
    .await
    .map_err(Error::store)?;
  Ok(vet)
}

/// Admin-only: flip the vet's `authorized` gate together with the owner's
/// structural role. De-authorizing severs the assignment on every shelter
/// that references this vet, in the same commit; no shelter may retain the
/// reference. Fails before any mutation when the user never created a
/// profile.
pub async fn toggle_authorization<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Vet> {
  require_admin(actor, "authorize vets")?;
  let mut user = require_user(store, user_id).await?;
  let mut vet = store
    .vet_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(user_id))?;
  store
    .find_role_by_name(Role::Vet.name())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::RoleNotFound(Role::Vet.name().to_owned()))?;

  user.toggle_role(Role::Vet);
  vet.authorized = !vet.authorized;

  let mut commit = Commit::new().user(user);
  if !vet.authorized {
    let assigned = store
      .shelters_by_vet(vet.vet_id)
      .await
      .map_err(Error::store)?;
    tracing::info!(
      vet = %vet.vet_id,
      shelters = assigned.len(),
      "vet de-authorized; severing shelter assignments"
    );
    for mut shelter in assigned {
      shelter.vet_id = None;
      commit = commit.shelter(shelter);
    }
  }

  store
    .apply(commit.vet(vet.clone()))
    .await
    .map_err(Error::store)?;
  Ok(vet)
}

/// Admin-only: assign `shelter_id` to `vet_id`. Re-assigning a shelter to
/// the vet it already has is reported instead of silently re-written.
pub async fn assign_shelter<S: EntityStore>(
  store: &S,
  actor: &Actor,
  vet_id: Uuid,
  shelter_id: Uuid,
) -> Result<()> {
  require_admin(actor, "assign shelters to vets")?;
  let vet = require_vet(store, vet_id).await?;
  let mut shelter = require_shelter(store, shelter_id).await?;

  if shelter.vet_id == Some(vet.vet_id) {
    return Err(Error::InvalidState(format!(
      "shelter {shelter_id} is already assigned to vet {vet_id}"
    )));
  }

  shelter.vet_id = Some(vet.vet_id);
  store
    .apply(Commit::new().shelter(shelter))
    .await
    .map_err(Error::store)?;
  Ok(())
}

/// Every animal across the shelters assigned to the vet owned by
/// `user_id`. Admin or the vet's own user.
pub async fn animals<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Vec<Animal>> {
  require_admin_or_self(actor, user_id, "view this vet's animals")?;
  require_user(store, user_id).await?;
  let vet = store
    .vet_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(user_id))?;

  let mut animals = Vec::new();
  for shelter in store
    .shelters_by_vet(vet.vet_id)
    .await
    .map_err(Error::store)?
  {
    animals.extend(
      store
        .animals_by_shelter(shelter.shelter_id)
        .await
        .map_err(Error::store)?,
    );
  }
  Ok(animals)
}
