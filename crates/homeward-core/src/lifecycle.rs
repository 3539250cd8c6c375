//! Animal lifecycle — the forward-only adoption state machine.
//!
//! `accepted` is orthogonal to status: it is a vet sign-off gate flipped by
//! a vet actor and moves nothing else.

use crate::{
  animal::{Animal, Status},
  error::{Error, Result},
};

/// Advance `animal.status` to `next`.
///
/// Writing the current status again is a no-op; moving backward, including
/// any move off `Adopted`, is an invalid-state error. Reaching `Adopted`
/// finalises the visit protocol via [`finalize_adoption`].
pub fn advance_status(animal: &mut Animal, next: Status) -> Result<()> {
  if next < animal.status {
    return Err(Error::InvalidState(format!(
      "animal {} cannot move from {:?} back to {next:?}",
      animal.animal_id, animal.status
    )));
  }
  let was = animal.status;
  animal.status = next;
  if next == Status::Adopted {
    finalize_adoption(animal);
  }
  if was != next {
    tracing::debug!(animal = %animal.animal_id, from = ?was, to = ?next, "status advanced");
  }
  Ok(())
}

/// The adoption side effect: a pending planned visit is consumed (the
/// planning visitor becomes the permanent adopter) and every visit-request
/// field is cleared. Adoption with no planned visit proceeds without
/// assigning an adopter.
pub fn finalize_adoption(animal: &mut Animal) {
  if let Some(visitor_id) = animal.planned_visitor_id.take() {
    animal.adopted_by = Some(visitor_id);
  }
  animal.visit_requested = false;
  animal.visit_approved = false;
}

/// Flip the vet sign-off gate. Returns the new value.
pub fn toggle_accepted(animal: &mut Animal) -> bool {
  animal.accepted = !animal.accepted;
  animal.accepted
}
