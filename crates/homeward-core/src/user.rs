//! User — the account behind every actor.
//!
//! A user owns at most one shelter, vet, and visitor profile. The profiles
//! hold the owning side of the link; resolving user → profile goes through
//! the store's `*_by_user` queries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::role::Role;

/// An account in the shelter network. The password hash is opaque to the
/// core (hashing and verification live with the transport layer) and is
/// never serialised outward.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub roles:         BTreeSet<Role>,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

  pub fn is_admin(&self) -> bool { self.has_role(Role::Admin) }

  /// Add `role` if absent. Returns `true` if the set changed.
  pub fn grant(&mut self, role: Role) -> bool { self.roles.insert(role) }

  /// Flip membership of `role`. Returns whether the role is now held.
  pub fn toggle_role(&mut self, role: Role) -> bool {
    if self.roles.remove(&role) {
      false
    } else {
      self.roles.insert(role);
      true
    }
  }
}

/// Input to [`crate::ops::users::register`]. The hash is produced by the
/// caller; the core never sees a cleartext password.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}
