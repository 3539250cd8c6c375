//! Shelter — an animal shelter operated by one owning user.
//!
//! A shelter holds no animal list; its animals are found through the
//! store's `animals_by_shelter` query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invariant: an unauthorized shelter never retains an assigned vet
/// (`!authorized ⟹ vet_id == None`), maintained by the authorization
/// toggle and the profile upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelter {
  pub shelter_id: Uuid,
  pub name:       String,
  pub address:    Option<String>,
  pub city:       Option<String>,
  pub phone:      Option<String>,
  /// Admin-controlled gate; false suppresses dependent associations.
  pub authorized: bool,
  /// Owning user; unique across shelters.
  pub user_id:    Option<Uuid>,
  /// Assigned vet, if any.
  pub vet_id:     Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// The editable fields accepted from the profile form. Authorization and
/// associations are never settable through this payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterProfile {
  pub name:    String,
  pub address: Option<String>,
  pub city:    Option<String>,
  pub phone:   Option<String>,
}

impl Shelter {
  /// Copy the editable fields from a submitted profile.
  pub fn apply_profile(&mut self, profile: &ShelterProfile) {
    self.name = profile.name.clone();
    self.address = profile.address.clone();
    self.city = profile.city.clone();
    self.phone = profile.phone.clone();
  }
}
