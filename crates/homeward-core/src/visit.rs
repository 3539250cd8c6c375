//! Visit request protocol — the sub-protocol carried on a single animal.
//!
//! Idle → Requested (visitor toggle) → Approved (shelter accept), with deny
//! resetting to Idle at any point and adoption consuming the pending
//! visitor. The state is derived from the stored fields on every read;
//! field combinations outside the protocol are reported as data-integrity
//! defects, never patched over.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  animal::{Animal, Status},
  error::{Error, Result},
  visitor::Visitor,
};

/// The derived protocol state of an animal's visit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitState {
  Idle,
  Requested,
  Approved,
}

/// One row of the shelter's actionable queue: a requested animal paired
/// with the requesting visitor and that visitor's owning-user id.
#[derive(Debug, Clone, Serialize)]
pub struct PendingVisit {
  pub animal:  Animal,
  pub visitor: Visitor,
  pub user_id: Uuid,
}

/// Derive the protocol state from the stored fields.
///
/// Approval without an active request, or a request with no planning
/// visitor, is not representable in the protocol and comes back as a
/// [`Error::DataIntegrity`].
pub fn visit_state(animal: &Animal) -> Result<VisitState> {
  match (
    animal.visit_requested,
    animal.visit_approved,
    animal.planned_visitor_id,
  ) {
    (false, false, None) => Ok(VisitState::Idle),
    (true, false, Some(_)) => Ok(VisitState::Requested),
    (true, true, Some(_)) => Ok(VisitState::Approved),
    (true, _, None) => Err(Error::DataIntegrity(format!(
      "animal {} has an active visit request but no planning visitor",
      animal.animal_id
    ))),
    (false, true, _) => Err(Error::DataIntegrity(format!(
      "animal {} is approved for a visit without an active request",
      animal.animal_id
    ))),
    (false, false, Some(_)) => Err(Error::DataIntegrity(format!(
      "animal {} has a planning visitor without an active request",
      animal.animal_id
    ))),
  }
}

/// The visitor-initiated toggle: request a visit, or withdraw an existing
/// request made by the same visitor. Deliberately non-idempotent; each
/// call flips the state. Approval is forced off on either transition, so
/// `visit_approved` can never outlive the request it approved.
pub fn toggle_request(animal: &mut Animal, visitor_id: Uuid) -> Result<VisitState> {
  if animal.status == Status::Adopted {
    return Err(Error::InvalidState(format!(
      "animal {} is already adopted",
      animal.animal_id
    )));
  }
  let next = match visit_state(animal)? {
    VisitState::Idle => {
      animal.visit_requested = true;
      animal.planned_visitor_id = Some(visitor_id);
      VisitState::Requested
    }
    VisitState::Requested | VisitState::Approved => {
      // Only the requesting visitor's own action withdraws the request.
      if animal.planned_visitor_id != Some(visitor_id) {
        return Err(Error::InvalidState(format!(
          "animal {} already has a pending visit from another visitor",
          animal.animal_id
        )));
      }
      animal.visit_requested = false;
      animal.planned_visitor_id = None;
      VisitState::Idle
    }
  };
  animal.visit_approved = false;
  Ok(next)
}

/// The shelter's accept action. Requires an active request; approving an
/// already-approved visit is a safe no-op, approving an idle animal is an
/// invalid-state error.
pub fn approve(animal: &mut Animal) -> Result<()> {
  match visit_state(animal)? {
    VisitState::Requested | VisitState::Approved => {
      animal.visit_approved = true;
      Ok(())
    }
    VisitState::Idle => Err(Error::InvalidState(format!(
      "animal {} has no visit request to approve",
      animal.animal_id
    ))),
  }
}

/// The shelter's deny action: reset the whole sub-protocol to Idle in one
/// step. Denying an idle animal stays Idle.
pub fn deny(animal: &mut Animal) -> Result<()> {
  // Reject overrides approve; no state check needed.
  visit_state(animal)?;
  animal.visit_requested = false;
  animal.visit_approved = false;
  animal.planned_visitor_id = None;
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::animal::Sex;

  fn animal() -> Animal {
    Animal {
      animal_id: Uuid::new_v4(),
      name: "Mika".into(),
      species: "Cat".into(),
      breed: None,
      age_years: Some(2),
      age_months: Some(4),
      sex: Sex::Female,
      status: Status::Available,
      vaccinated: true,
      neutered: true,
      photo_url: None,
      description: None,
      shelter_id: Uuid::new_v4(),
      accepted: true,
      adopted_by: None,
      planned_visitor_id: None,
      visit_requested: false,
      visit_approved: false,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn request_then_withdraw_round_trips() {
    let visitor = Uuid::new_v4();
    let mut a = animal();

    assert_eq!(toggle_request(&mut a, visitor).unwrap(), VisitState::Requested);
    assert!(a.visit_requested);
    assert_eq!(a.planned_visitor_id, Some(visitor));

    assert_eq!(toggle_request(&mut a, visitor).unwrap(), VisitState::Idle);
    assert!(!a.visit_requested);
    assert_eq!(a.planned_visitor_id, None);
  }

  #[test]
  fn withdrawing_an_approved_visit_clears_approval() {
    let visitor = Uuid::new_v4();
    let mut a = animal();
    toggle_request(&mut a, visitor).unwrap();
    approve(&mut a).unwrap();

    toggle_request(&mut a, visitor).unwrap();
    assert!(!a.visit_approved);
    assert_eq!(visit_state(&a).unwrap(), VisitState::Idle);
  }

  #[test]
  fn another_visitor_cannot_flip_a_pending_request() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut a = animal();
    toggle_request(&mut a, first).unwrap();

    assert!(matches!(
      toggle_request(&mut a, second),
      Err(Error::InvalidState(_))
    ));
    assert_eq!(a.planned_visitor_id, Some(first));
  }

  #[test]
  fn requesting_an_adopted_animal_is_invalid() {
    let mut a = animal();
    a.status = Status::Adopted;
    assert!(matches!(
      toggle_request(&mut a, Uuid::new_v4()),
      Err(Error::InvalidState(_))
    ));
  }

  #[test]
  fn approve_requires_an_active_request() {
    let mut a = animal();
    assert!(matches!(approve(&mut a), Err(Error::InvalidState(_))));
  }

  #[test]
  fn approve_is_retry_safe() {
    let mut a = animal();
    toggle_request(&mut a, Uuid::new_v4()).unwrap();
    approve(&mut a).unwrap();
    approve(&mut a).unwrap();
    assert_eq!(visit_state(&a).unwrap(), VisitState::Approved);
  }

  #[test]
  fn deny_resets_everything_in_one_step() {
    let mut a = animal();
    toggle_request(&mut a, Uuid::new_v4()).unwrap();
    approve(&mut a).unwrap();

    deny(&mut a).unwrap();
    assert_eq!(visit_state(&a).unwrap(), VisitState::Idle);
    assert!(!a.visit_requested);
    assert!(!a.visit_approved);
    assert_eq!(a.planned_visitor_id, None);
  }

  #[test]
  fn deny_on_idle_stays_idle() {
    let mut a = animal();
    deny(&mut a).unwrap();
    assert_eq!(visit_state(&a).unwrap(), VisitState::Idle);
  }

  #[test]
  fn approval_never_coexists_with_a_cleared_request() {
    // Walk every reachable transition and check the invariant after each.
    let visitor = Uuid::new_v4();
    let mut a = animal();
    let check = |a: &Animal| assert!(!a.visit_approved || a.visit_requested);

    toggle_request(&mut a, visitor).unwrap();
    check(&a);
    approve(&mut a).unwrap();
    check(&a);
    toggle_request(&mut a, visitor).unwrap();
    check(&a);
    toggle_request(&mut a, visitor).unwrap();
    approve(&mut a).unwrap();
    deny(&mut a).unwrap();
    check(&a);
    toggle_request(&mut a, visitor).unwrap();
    approve(&mut a).unwrap();
    crate::lifecycle::advance_status(&mut a, Status::Adopted).unwrap();
    check(&a);
  }

  #[test]
  fn integrity_defects_are_reported() {
    let mut a = animal();
    a.visit_requested = true; // no planning visitor
    assert!(matches!(visit_state(&a), Err(Error::DataIntegrity(_))));

    let mut b = animal();
    b.visit_approved = true; // no request
    assert!(matches!(visit_state(&b), Err(Error::DataIntegrity(_))));

    let mut c = animal();
    c.planned_visitor_id = Some(Uuid::new_v4()); // no request
    assert!(matches!(visit_state(&c), Err(Error::DataIntegrity(_))));
  }
}
