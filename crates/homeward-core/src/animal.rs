//! Animal — the record at the centre of the adoption workflow.
//!
//! An animal always belongs to exactly one shelter. Adoption status, the
//! vet sign-off gate, and the visit-request fields all live here; the
//! transition rules are in [`crate::lifecycle`] and [`crate::visit`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Adoption status. Transitions only move forward; there is no path back
/// from `Adopted`. The derived ordering is what the lifecycle check uses.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Available,
  Pending,
  Adopted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
  Unknown,
}

/// Invariants: `status == Adopted` implies all visit fields are cleared;
/// `visit_approved` implies `visit_requested`; `planned_visitor_id` is only
/// set while a request is active. [`crate::visit::visit_state`] reports a
/// violation as a data-integrity error instead of masking it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
  pub animal_id:   Uuid,
  pub name:        String,
  pub species:     String,
  pub breed:       Option<String>,
  pub age_years:   Option<u8>,
  pub age_months:  Option<u8>,
  pub sex:         Sex,
  pub status:      Status,
  pub vaccinated:  bool,
  pub neutered:    bool,
  pub photo_url:   Option<String>,
  pub description: Option<String>,
  /// Owning shelter; required, never cleared.
  pub shelter_id:  Uuid,
  /// Vet sign-off gate, independent of adoption status.
  pub accepted:    bool,
  /// The adopting visitor; set only when adoption consumed a planned visit.
  pub adopted_by:  Option<Uuid>,
  /// The visitor currently slated to visit, or none.
  pub planned_visitor_id: Option<Uuid>,
  /// A visitor has asked to visit.
  pub visit_requested:    bool,
  /// The shelter has approved the pending visit request.
  pub visit_approved:     bool,
  pub created_at:  DateTime<Utc>,
}

/// The descriptive fields a shelter owner edits, plus the requested status.
/// Workflow fields (`accepted`, adoption and visit references) are never
/// settable through this payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalDetails {
  pub name:        String,
  pub species:     String,
  pub breed:       Option<String>,
  pub age_years:   Option<u8>,
  pub age_months:  Option<u8>,
  pub sex:         Sex,
  pub status:      Status,
  pub vaccinated:  bool,
  pub neutered:    bool,
  pub photo_url:   Option<String>,
  pub description: Option<String>,
}

impl Animal {
  /// A fresh, unaccepted animal listed by `shelter_id`. Starts `Available`;
  /// the creating operation may advance the status through the lifecycle
  /// check.
  pub fn new(shelter_id: Uuid, details: &AnimalDetails) -> Self {
    let mut animal = Self {
      animal_id: Uuid::new_v4(),
      name: String::new(),
      species: String::new(),
      breed: None,
      age_years: None,
      age_months: None,
      sex: details.sex,
      status: Status::Available,
      vaccinated: false,
      neutered: false,
      photo_url: None,
      description: None,
      shelter_id,
      accepted: false,
      adopted_by: None,
      planned_visitor_id: None,
      visit_requested: false,
      visit_approved: false,
      created_at: Utc::now(),
    };
    animal.apply_details(details);
    animal
  }

  /// Copy the descriptive fields from a submitted payload. The status field
  /// is deliberately not copied here; it goes through the lifecycle check.
  pub fn apply_details(&mut self, details: &AnimalDetails) {
    self.name = details.name.clone();
    self.species = details.species.clone();
    self.breed = details.breed.clone();
    self.age_years = details.age_years;
    self.age_months = details.age_months;
    self.sex = details.sex;
    self.vaccinated = details.vaccinated;
    self.neutered = details.neutered;
    self.photo_url = details.photo_url.clone();
    self.description = details.description.clone();
  }
}
