//! The closed set of roles a user can hold.
//!
//! Role names travel on the wire and in the database as the `ROLE_*` strings
//! below. Matching is exhaustive; there is no fall-through for an unknown
//! role name — parsing one is an error, not a silent deny.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A structural role. Seeded once at startup, never deleted; membership on a
/// user is mutable at runtime (toggled by admin actions).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
pub enum Role {
  #[serde(rename = "ROLE_USER")]
  #[strum(serialize = "ROLE_USER")]
  User,
  #[serde(rename = "ROLE_ADMIN")]
  #[strum(serialize = "ROLE_ADMIN")]
  Admin,
  #[serde(rename = "ROLE_VET")]
  #[strum(serialize = "ROLE_VET")]
  Vet,
  #[serde(rename = "ROLE_SHELTER")]
  #[strum(serialize = "ROLE_SHELTER")]
  Shelter,
  #[serde(rename = "ROLE_VISITOR")]
  #[strum(serialize = "ROLE_VISITOR")]
  Visitor,
}

impl Role {
  /// Every role, in seeding order.
  pub const ALL: [Role; 5] = [
    Role::User,
    Role::Admin,
    Role::Vet,
    Role::Shelter,
    Role::Visitor,
  ];

  /// The wire name, e.g. `ROLE_ADMIN`.
  pub fn name(self) -> &'static str {
    match self {
      Role::User => "ROLE_USER",
      Role::Admin => "ROLE_ADMIN",
      Role::Vet => "ROLE_VET",
      Role::Shelter => "ROLE_SHELTER",
      Role::Visitor => "ROLE_VISITOR",
    }
  }
}
