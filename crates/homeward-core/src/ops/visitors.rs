//! Visitor profile operations and the visitor-facing animal views.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  actor::Actor,
  animal::{Animal, Status},
  error::{Error, Result},
  role::Role,
  store::{Commit, EntityStore},
  visitor::{Visitor, VisitorProfile},
};

use super::{require_admin, require_admin_or_self, require_user};

/// List every visitor. Admin only.
pub async fn list<S: EntityStore>(store: &S, actor: &Actor) -> Result<Vec<Visitor>> {
  require_admin(actor, "list visitors")?;
  store.list_visitors().await.map_err(Error::store)
}

/// The visitor profile of `user_id`. Admins and shelter-role users may read
/// an applicant's profile; otherwise only the user itself. `Ok(None)` means
/// the owner may still create one.
pub async fn for_user<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Option<Visitor>> {
  if !actor.is_admin() && !actor.is_user(user_id) && !actor.has_role(Role::Shelter) {
    return Err(Error::Forbidden("view this visitor profile"));
  }
  require_user(store, user_id).await?;
  let visitor = store.visitor_by_user(user_id).await.map_err(Error::store)?;
  if visitor.is_none() && !actor.is_user(user_id) {
    return Err(Error::ProfileMissing(user_id));
  }
  Ok(visitor)
}

/// Create the visitor profile on first save, update it in place afterwards.
/// First-time creation also grants the visitor role when it is absent: a
/// grant, not a toggle, so repeated saves keep the role.
pub async fn upsert_profile<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
  profile: VisitorProfile,
) -> Result<Visitor> {
  if !actor.is_user(user_id) {
    return Err(Error::Forbidden("edit another user's visitor profile"));
  }
  let mut user = require_user(store, user_id).await?;

  let visitor = match store.visitor_by_user(user_id).await.map_err(Error::store)? {
    Some(mut existing) => {
      existing.apply_profile(&profile);
      existing
    }
    None => Visitor {
      visitor_id: Uuid::new_v4(),
      first_name: profile.first_name.clone(),
      last_name:  profile.last_name.clone(),
      phone:      profile.phone.clone(),
      address:    profile.address.clone(),
      sex:        profile.sex,
      age:        profile.age,
      bio:        profile.bio.clone(),
      user_id:    Some(user_id),
      created_at: Utc::now(),
    },
  };

  let mut commit = Commit::new().visitor(visitor.clone());
  if !user.has_role(Role::Visitor) {
    store
      .find_role_by_name(Role::Visitor.name())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::RoleNotFound(Role::Visitor.name().to_owned()))?;
    user.grant(Role::Visitor);
    commit = commit.user(user);
  }

  store.apply(commit).await.map_err(Error::store)?;
  Ok(visitor)
}

/// The animals this visitor has an active visit plan for, filtered the way
/// the browse view filters: adopted, unaccepted, and orphaned-shelter
/// animals drop out.
pub async fn planned_visits<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Vec<Animal>> {
  require_admin_or_self(actor, user_id, "view this visitor's planned visits")?;
  require_user(store, user_id).await?;
  let visitor = store
    .visitor_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(user_id))?;

  let mut animals = Vec::new();
  for animal in store
    .animals_planned_by(visitor.visitor_id)
    .await
    .map_err(Error::store)?
  {
    if animal.status == Status::Adopted || !animal.accepted {
      continue;
    }
    if !shelter_owner_is_active(store, &animal).await? {
      continue;
    }
    animals.push(animal);
  }
  Ok(animals)
}

/// The animals this visitor has adopted. Admin or the user itself.
pub async fn adopted_animals<S: EntityStore>(
  store: &S,
  actor: &Actor,
  user_id: Uuid,
) -> Result<Vec<Animal>> {
  require_admin_or_self(actor, user_id, "view this visitor's adoptions")?;
  require_user(store, user_id).await?;
  let visitor = store
    .visitor_by_user(user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(user_id))?;
  store
    .animals_adopted_by(visitor.visitor_id)
    .await
    .map_err(Error::store)
}

/// Whether the animal's shelter has an owner that still holds the shelter
/// role. Animals of orphaned or role-revoked shelters are hidden from
/// visitor-facing views.
pub(crate) async fn shelter_owner_is_active<S: EntityStore>(
  store: &S,
  animal: &Animal,
) -> Result<bool> {
  let shelter = match store
    .get_shelter(animal.shelter_id)
    .await
    .map_err(Error::store)?
  {
    Some(s) => s,
    None => return Ok(false),
  };
  let Some(owner_id) = shelter.user_id else {
    return Ok(false);
  };
  let Some(owner) = store.get_user(owner_id).await.map_err(Error::store)? else {
    return Ok(false);
  };
  Ok(owner.has_role(Role::Shelter))
}
