//! Actor — the already-authenticated principal descriptor.
//!
//! Built by the transport layer once per request and treated as opaque by
//! the core: credentials are never re-validated here.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{role::Role, user::User};

/// The identity performing an action: the user id, the role set, and the id
/// of the vet profile behind this user, if any. The vet id is what lets the
/// shelter policy recognise "the user behind the shelter's assigned vet"
/// without re-fetching the vet.
#[derive(Debug, Clone)]
pub struct Actor {
  pub user_id: Uuid,
  pub roles:   BTreeSet<Role>,
  pub vet_id:  Option<Uuid>,
}

impl Actor {
  /// Build an actor from a resolved user and its vet profile id.
  pub fn from_user(user: &User, vet_id: Option<Uuid>) -> Self {
    Self { user_id: user.user_id, roles: user.roles.clone(), vet_id }
  }

  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

  pub fn is_admin(&self) -> bool { self.has_role(Role::Admin) }

  /// Whether the actor is the user identified by `user_id`.
  pub fn is_user(&self, user_id: Uuid) -> bool { self.user_id == user_id }
}
