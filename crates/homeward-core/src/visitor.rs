//! Visitor — an adoption candidate profile owned by one user.
//!
//! Adopted animals and planned visits are computed relations: the store
//! answers `animals_adopted_by` and `animals_planned_by` by scanning the
//! references held on the animals themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animal::Sex;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
  pub visitor_id: Uuid,
  pub first_name: String,
  pub last_name:  String,
  /// Unique contact number.
  pub phone:      String,
  pub address:    String,
  pub sex:        Sex,
  pub age:        u8,
  pub bio:        Option<String>,
  pub user_id:    Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// The editable fields accepted from the profile form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorProfile {
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
  pub address:    String,
  pub sex:        Sex,
  pub age:        u8,
  pub bio:        Option<String>,
}

impl Visitor {
  pub fn apply_profile(&mut self, profile: &VisitorProfile) {
    self.first_name = profile.first_name.clone();
    self.last_name = profile.last_name.clone();
    self.phone = profile.phone.clone();
    self.address = profile.address.clone();
    self.sex = profile.sex;
    self.age = profile.age;
    self.bio = profile.bio.clone();
  }
}
