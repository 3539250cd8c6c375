//! Vet — a veterinarian profile owned by one user.
//!
//! The shelters assigned to a vet are the shelters whose `vet_id` points at
//! it, resolved through the store's `shelters_by_vet` query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invariant: an unauthorized vet has no assigned shelters — revoking
/// authorization severs every shelter's reference in the same commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vet {
  pub vet_id:     Uuid,
  pub first_name: String,
  pub last_name:  String,
  /// National identification number; unique when present.
  pub id_number:  Option<String>,
  pub authorized: bool,
  pub user_id:    Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// The editable fields accepted from the profile form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetProfile {
  pub first_name: String,
  pub last_name:  String,
  pub id_number:  Option<String>,
}

impl Vet {
  pub fn apply_profile(&mut self, profile: &VetProfile) {
    self.first_name = profile.first_name.clone();
    self.last_name = profile.last_name.clone();
    self.id_number = profile.id_number.clone();
  }
}
