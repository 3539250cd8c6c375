//! Workflow operations — the only sanctioned way to mutate entities.
//!
//! Every operation takes the backing store and an [`Actor`] descriptor,
//! consults the access policy before anything else, and applies its writes
//! as one [`Commit`]. NotFound and Forbidden abort before any write reaches
//! the store.

pub mod animals;
pub mod roles;
pub mod shelters;
pub mod users;
pub mod vets;
pub mod visitors;

use uuid::Uuid;

use crate::{
  actor::Actor,
  animal::Animal,
  error::{Error, Result},
  shelter::Shelter,
  store::EntityStore,
  user::User,
  vet::Vet,
  visitor::Visitor,
};

// ─── Lookup helpers ──────────────────────────────────────────────────────────

// Missing targets are a distinct condition from policy denials, so every
// operation resolves its target before consulting the policy.

pub(crate) async fn require_user<S: EntityStore>(store: &S, id: Uuid) -> Result<User> {
  store
    .get_user(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(id))
}

pub(crate) async fn require_shelter<S: EntityStore>(
  store: &S,
  id: Uuid,
) -> Result<Shelter> {
  store
    .get_shelter(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ShelterNotFound(id))
}

pub(crate) async fn require_vet<S: EntityStore>(store: &S, id: Uuid) -> Result<Vet> {
  store
    .get_vet(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::VetNotFound(id))
}

pub(crate) async fn require_visitor<S: EntityStore>(
  store: &S,
  id: Uuid,
) -> Result<Visitor> {
  store
    .get_visitor(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::VisitorNotFound(id))
}

pub(crate) async fn require_animal<S: EntityStore>(
  store: &S,
  id: Uuid,
) -> Result<Animal> {
  store
    .get_animal(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AnimalNotFound(id))
}

// ─── Gate helpers ────────────────────────────────────────────────────────────

pub(crate) fn require_admin(actor: &Actor, action: &'static str) -> Result<()> {
  if actor.is_admin() {
    Ok(())
  } else {
    Err(Error::Forbidden(action))
  }
}

/// Admin, or the user the resource belongs to. The guard used by the
/// per-user profile and listing views.
pub(crate) fn require_admin_or_self(
  actor: &Actor,
  user_id: Uuid,
  action: &'static str,
) -> Result<()> {
  if actor.is_admin() || actor.is_user(user_id) {
    Ok(())
  } else {
    Err(Error::Forbidden(action))
  }
}
