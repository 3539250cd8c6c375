//! Animal operations: listing, the shelter owner's edits, the vet's
//! sign-off toggle, and the visitor-driven visit request protocol.
//!
//! Mutation access derives from the animal's parent shelter; the acting
//! role then selects the narrow capability. There is no fall-through: an
//! actor whose roles match none of the capabilities is denied explicitly.

use uuid::Uuid;

use crate::{
  actor::Actor,
  animal::{Animal, AnimalDetails, Status},
  error::{Error, Result},
  lifecycle, policy,
  role::Role,
  shelter::Shelter,
  store::{Commit, EntityStore},
  visit::{self, PendingVisit},
};

use super::{require_animal, require_shelter, require_visitor};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Fetch one animal; readable by anyone who may access its shelter.
pub async fn get<S: EntityStore>(
  store: &S,
  actor: &Actor,
  animal_id: Uuid,
) -> Result<Animal> {
  let animal = require_animal(store, animal_id).await?;
  let shelter = require_shelter(store, animal.shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("view this animal"));
  }
  Ok(animal)
}

/// The animals of one shelter, policy-gated.
pub async fn by_shelter<S: EntityStore>(
  store: &S,
  actor: &Actor,
  shelter_id: Uuid,
) -> Result<Vec<Animal>> {
  let shelter = require_shelter(store, shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("view this shelter's animals"));
  }
  store
    .animals_by_shelter(shelter_id)
    .await
    .map_err(Error::store)
}

/// The visitor-facing browse view: every adoptable animal in the network.
/// Skips adopted and not-yet-accepted animals, animals whose pending visit
/// belongs to a different visitor, and animals of shelters whose owner no
/// longer holds the shelter role.
pub async fn browse<S: EntityStore>(store: &S, actor: &Actor) -> Result<Vec<Animal>> {
  if !actor.is_admin() && !actor.has_role(Role::Visitor) {
    return Err(Error::Forbidden("browse adoptable animals"));
  }

  let mut animals = Vec::new();
  for animal in store.list_animals().await.map_err(Error::store)? {
    if animal.status == Status::Adopted || !animal.accepted {
      continue;
    }
    if animal.visit_requested {
      let visitor_id = animal.planned_visitor_id.ok_or_else(|| {
        Error::DataIntegrity(format!(
          "animal {} has an active visit request but no planning visitor",
          animal.animal_id
        ))
      })?;
      let visitor = require_visitor(store, visitor_id).await?;
      if visitor.user_id != Some(actor.user_id) {
        continue;
      }
    }
    if !super::visitors::shelter_owner_is_active(store, &animal).await? {
      continue;
    }
    animals.push(animal);
  }
  Ok(animals)
}

// ─── Shelter owner capability ────────────────────────────────────────────────

/// List a new animal under the acting user's own shelter. The not-found
/// condition fires when the user never created a shelter profile.
pub async fn create<S: EntityStore>(
  store: &S,
  actor: &Actor,
  details: AnimalDetails,
) -> Result<Animal> {
  let shelter = store
    .shelter_by_user(actor.user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(actor.user_id))?;
  require_shelter_capability(actor, &shelter, "list animals for this shelter")?;

  let mut animal = Animal::new(shelter.shelter_id, &details);
  lifecycle::advance_status(&mut animal, details.status)?;
  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  tracing::info!(animal = %animal.animal_id, shelter = %shelter.shelter_id, "animal listed");
  Ok(animal)
}

/// The shelter owner's edit: descriptive fields plus a forward-only status
/// move. Advancing to `Adopted` consumes the pending planned visit: the
/// planning visitor becomes the permanent adopter and the request fields
/// clear, all in the same commit.
pub async fn update<S: EntityStore>(
  store: &S,
  actor: &Actor,
  animal_id: Uuid,
  details: AnimalDetails,
) -> Result<Animal> {
  let mut animal = require_animal(store, animal_id).await?;
  let shelter = require_shelter(store, animal.shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("edit this animal"));
  }
  if !actor.has_role(Role::Shelter) {
    return Err(Error::Forbidden("edit animals"));
  }

  animal.apply_details(&details);
  lifecycle::advance_status(&mut animal, details.status)?;

  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  Ok(animal)
}

// ─── Vet capability ──────────────────────────────────────────────────────────

/// The vet's narrow capability: flip the `accepted` sign-off gate and
/// nothing else. No descriptive field changes ride along.
pub async fn toggle_accepted<S: EntityStore>(
  store: &S,
  actor: &Actor,
  animal_id: Uuid,
) -> Result<Animal> {
  let mut animal = require_animal(store, animal_id).await?;
  let shelter = require_shelter(store, animal.shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("review this animal"));
  }
  if !actor.has_role(Role::Vet) {
    return Err(Error::Forbidden("toggle the vet sign-off"));
  }

  let accepted = lifecycle::toggle_accepted(&mut animal);
  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  tracing::debug!(animal = %animal.animal_id, accepted, "vet sign-off toggled");
  Ok(animal)
}

// ─── Visitor capability ──────────────────────────────────────────────────────

/// The visitor's narrow capability: flip the visit request. Requesting
/// attaches the acting visitor as the planning visitor; repeating the
/// action withdraws the request. Intentionally non-idempotent.
pub async fn toggle_visit_request<S: EntityStore>(
  store: &S,
  actor: &Actor,
  animal_id: Uuid,
) -> Result<Animal> {
  let mut animal = require_animal(store, animal_id).await?;
  let shelter = require_shelter(store, animal.shelter_id).await?;
  if !policy::can_access_shelter(actor, &shelter) {
    return Err(Error::Forbidden("view this animal"));
  }
  if !actor.has_role(Role::Visitor) {
    return Err(Error::Forbidden("request visits"));
  }
  let visitor = store
    .visitor_by_user(actor.user_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ProfileMissing(actor.user_id))?;

  let state = visit::toggle_request(&mut animal, visitor.visitor_id)?;
  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  tracing::debug!(animal = %animal.animal_id, ?state, "visit request toggled");
  Ok(animal)
}

// ─── Visit review (shelter side) ─────────────────────────────────────────────

/// Approve the pending visit on one of the shelter's own animals. Requires
/// an active request; approving an idle animal is an invalid-state error,
/// not a silent write.
pub async fn approve_visit<S: EntityStore>(
  store: &S,
  actor: &Actor,
  shelter_id: Uuid,
  animal_id: Uuid,
) -> Result<Animal> {
  let (shelter, mut animal) = scoped_animal(store, shelter_id, animal_id).await?;
  require_shelter_capability(actor, &shelter, "review visit requests")?;

  visit::approve(&mut animal)?;
  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  Ok(animal)
}

/// Deny the pending visit: request, approval, and planning visitor all
/// reset in one step. Reject overrides approve.
pub async fn deny_visit<S: EntityStore>(
  store: &S,
  actor: &Actor,
  shelter_id: Uuid,
  animal_id: Uuid,
) -> Result<Animal> {
  let (shelter, mut animal) = scoped_animal(store, shelter_id, animal_id).await?;
  require_shelter_capability(actor, &shelter, "review visit requests")?;

  visit::deny(&mut animal)?;
  store
    .apply(Commit::new().animal(animal.clone()))
    .await
    .map_err(Error::store)?;
  Ok(animal)
}

/// The shelter's actionable queue: every animal currently in the Requested
/// state, paired with the requesting visitor and that visitor's owning-user
/// id. A requested animal with no planning visitor, or a planning visitor
/// with no owning user, is a data-integrity defect and fails the whole
/// query rather than producing a hollow row.
pub async fn pending_visits<S: EntityStore>(
  store: &S,
  actor: &Actor,
  shelter_id: Uuid,
) -> Result<Vec<PendingVisit>> {
  let shelter = require_shelter(store, shelter_id).await?;
  require_shelter_capability(actor, &shelter, "view visit requests")?;

  let mut rows = Vec::new();
  for animal in store
    .animals_by_shelter(shelter_id)
    .await
    .map_err(Error::store)?
  {
    if !animal.visit_requested {
      continue;
    }
    let visitor_id = animal.planned_visitor_id.ok_or_else(|| {
      Error::DataIntegrity(format!(
        "animal {} has an active visit request but no planning visitor",
        animal.animal_id
      ))
    })?;
    let visitor = require_visitor(store, visitor_id).await?;
    let user_id = visitor.user_id.ok_or_else(|| {
      Error::DataIntegrity(format!("visitor {visitor_id} has no owning user"))
    })?;
    rows.push(PendingVisit { animal, visitor, user_id });
  }
  Ok(rows)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Resolve an animal within a specific shelter; an animal outside that
/// shelter is not found from the caller's point of view.
async fn scoped_animal<S: EntityStore>(
  store: &S,
  shelter_id: Uuid,
  animal_id: Uuid,
) -> Result<(Shelter, Animal)> {
  let shelter = require_shelter(store, shelter_id).await?;
  let animal = require_animal(store, animal_id).await?;
  if animal.shelter_id != shelter.shelter_id {
    return Err(Error::AnimalNotFound(animal_id));
  }
  Ok((shelter, animal))
}

/// Admin, or the shelter's owning user while it holds the shelter role.
fn require_shelter_capability(
  actor: &Actor,
  shelter: &Shelter,
  action: &'static str,
) -> Result<()> {
  if actor.is_admin() {
    return Ok(());
  }
  if shelter.user_id == Some(actor.user_id) && actor.has_role(Role::Shelter) {
    return Ok(());
  }
  Err(Error::Forbidden(action))
}
