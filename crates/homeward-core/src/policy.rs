//! Access policy — pure per-resource permission checks.
//!
//! Every state-changing operation consults these before it runs. The
//! functions never touch the store: callers resolve the target first, so a
//! missing target surfaces as NotFound rather than being folded into a
//! deny.

use crate::{actor::Actor, role::Role, shelter::Shelter, vet::Vet, visitor::Visitor};

/// Whether `actor` may access `shelter` (and, by derivation, its animals).
///
/// Permitted for: admins; the owning user while it holds the shelter role;
/// the user behind the shelter's assigned vet; and any visitor-role user.
/// Visitors browse animals across all shelters, so the last arm is
/// intentionally permissive.
pub fn can_access_shelter(actor: &Actor, shelter: &Shelter) -> bool {
  if actor.is_admin() {
    return true;
  }
  if shelter.user_id == Some(actor.user_id) && actor.has_role(Role::Shelter) {
    return true;
  }
  if actor.vet_id.is_some() && actor.vet_id == shelter.vet_id {
    return true;
  }
  actor.has_role(Role::Visitor)
}

/// Whether `actor` may access `vet`. Admins always; otherwise only the
/// owning user. There is no cross-vet visibility.
pub fn can_access_vet(actor: &Actor, vet: &Vet) -> bool {
  actor.is_admin() || vet.user_id == Some(actor.user_id)
}

/// Whether `actor` may access `visitor`. Admins and shelter-role users may
/// read an applicant's profile; otherwise only the owning user.
pub fn can_access_visitor(actor: &Actor, visitor: &Visitor) -> bool {
  actor.is_admin()
    || actor.has_role(Role::Shelter)
    || visitor.user_id == Some(actor.user_id)
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn actor(roles: &[Role]) -> Actor {
    Actor {
      user_id: Uuid::new_v4(),
      roles:   roles.iter().copied().collect::<BTreeSet<_>>(),
      vet_id:  None,
    }
  }

  fn shelter(user_id: Option<Uuid>, vet_id: Option<Uuid>) -> Shelter {
    Shelter {
      shelter_id: Uuid::new_v4(),
      name: "Northside Paws".into(),
      address: None,
      city: None,
      phone: None,
      authorized: true,
      user_id,
      vet_id,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn admin_accesses_any_shelter() {
    let admin = actor(&[Role::Admin]);
    assert!(can_access_shelter(&admin, &shelter(None, None)));
  }

  #[test]
  fn owner_with_shelter_role_accesses_own_shelter() {
    let owner = actor(&[Role::Shelter]);
    assert!(can_access_shelter(&owner, &shelter(Some(owner.user_id), None)));
  }

  #[test]
  fn owner_without_shelter_role_is_denied() {
    let owner = actor(&[Role::User]);
    assert!(!can_access_shelter(&owner, &shelter(Some(owner.user_id), None)));
  }

  #[test]
  fn assigned_vet_accesses_the_shelter() {
    let vet_id = Uuid::new_v4();
    let mut vet_actor = actor(&[Role::Vet]);
    vet_actor.vet_id = Some(vet_id);
    assert!(can_access_shelter(&vet_actor, &shelter(None, Some(vet_id))));
  }

  #[test]
  fn unassigned_vet_is_denied() {
    let mut vet_actor = actor(&[Role::Vet]);
    vet_actor.vet_id = Some(Uuid::new_v4());
    assert!(!can_access_shelter(
      &vet_actor,
      &shelter(None, Some(Uuid::new_v4()))
    ));
  }

  #[test]
  fn any_visitor_may_read_a_shelter() {
    let visitor = actor(&[Role::Visitor]);
    assert!(can_access_shelter(&visitor, &shelter(Some(Uuid::new_v4()), None)));
  }

  #[test]
  fn stranger_is_denied() {
    // Authenticated, but none of admin / owner / assigned vet / visitor.
    let stranger = actor(&[Role::User]);
    assert!(!can_access_shelter(&stranger, &shelter(Some(Uuid::new_v4()), None)));
  }

  #[test]
  fn vet_profile_is_owner_or_admin_only() {
    let owner = actor(&[Role::Vet]);
    let other = actor(&[Role::Vet, Role::Visitor]);
    let admin = actor(&[Role::Admin]);
    let vet = Vet {
      vet_id: Uuid::new_v4(),
      first_name: "Jo".into(),
      last_name: "Stavros".into(),
      id_number: None,
      authorized: true,
      user_id: Some(owner.user_id),
      created_at: Utc::now(),
    };
    assert!(can_access_vet(&owner, &vet));
    assert!(can_access_vet(&admin, &vet));
    assert!(!can_access_vet(&other, &vet));
  }

  #[test]
  fn visitor_profile_readable_by_shelters() {
    let owner = actor(&[Role::Visitor]);
    let shelter_user = actor(&[Role::Shelter]);
    let stranger = actor(&[Role::User]);
    let visitor = Visitor {
      visitor_id: Uuid::new_v4(),
      first_name: "Ada".into(),
      last_name: "Klein".into(),
      phone: "5550100".into(),
      address: "12 Elm St".into(),
      sex: crate::animal::Sex::Female,
      age: 34,
      bio: None,
      user_id: Some(owner.user_id),
      created_at: Utc::now(),
    };
    assert!(can_access_visitor(&owner, &visitor));
    assert!(can_access_visitor(&shelter_user, &visitor));
    assert!(!can_access_visitor(&stranger, &visitor));
  }
}
