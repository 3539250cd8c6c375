//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, enums as their wire discriminants. Booleans and small integers
//! map onto SQLite INTEGER directly.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use homeward_core::{
  animal::{Animal, Sex, Status},
  role::Role,
  shelter::Shelter,
  user::User,
  vet::Vet,
  visitor::Visitor,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_uuid_opt(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

pub fn decode_uuid_opt(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_status(s: Status) -> &'static str {
  match s {
    Status::Available => "available",
    Status::Pending => "pending",
    Status::Adopted => "adopted",
  }
}

pub fn decode_status(s: &str) -> Result<Status> {
  match s {
    "available" => Ok(Status::Available),
    "pending" => Ok(Status::Pending),
    "adopted" => Ok(Status::Adopted),
    other => Err(Error::Decode(format!("unknown status: {other:?}"))),
  }
}

pub fn encode_sex(s: Sex) -> &'static str {
  match s {
    Sex::Male => "male",
    Sex::Female => "female",
    Sex::Unknown => "unknown",
  }
}

pub fn decode_sex(s: &str) -> Result<Sex> {
  match s {
    "male" => Ok(Sex::Male),
    "female" => Ok(Sex::Female),
    "unknown" => Ok(Sex::Unknown),
    other => Err(Error::Decode(format!("unknown sex: {other:?}"))),
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `users` row; roles come from `user_roles`.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self, role_names: Vec<String>) -> Result<User> {
    let roles = role_names
      .iter()
      .map(|n| decode_role(n))
      .collect::<Result<_>>()?;
    Ok(User {
      user_id: decode_uuid(&self.user_id)?,
      username: self.username,
      email: self.email,
      password_hash: self.password_hash,
      roles,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawShelter {
  pub shelter_id: String,
  pub name:       String,
  pub address:    Option<String>,
  pub city:       Option<String>,
  pub phone:      Option<String>,
  pub authorized: bool,
  pub user_id:    Option<String>,
  pub vet_id:     Option<String>,
  pub created_at: String,
}

impl RawShelter {
  pub fn into_shelter(self) -> Result<Shelter> {
    Ok(Shelter {
      shelter_id: decode_uuid(&self.shelter_id)?,
      name: self.name,
      address: self.address,
      city: self.city,
      phone: self.phone,
      authorized: self.authorized,
      user_id: decode_uuid_opt(self.user_id.as_deref())?,
      vet_id: decode_uuid_opt(self.vet_id.as_deref())?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawVet {
  pub vet_id:     String,
  pub first_name: String,
  pub last_name:  String,
  pub id_number:  Option<String>,
  pub authorized: bool,
  pub user_id:    Option<String>,
  pub created_at: String,
}

impl RawVet {
  pub fn into_vet(self) -> Result<Vet> {
    Ok(Vet {
      vet_id: decode_uuid(&self.vet_id)?,
      first_name: self.first_name,
      last_name: self.last_name,
      id_number: self.id_number,
      authorized: self.authorized,
      user_id: decode_uuid_opt(self.user_id.as_deref())?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawVisitor {
  pub visitor_id: String,
  pub first_name: String,
  pub last_name:  String,
  pub phone:      String,
  pub address:    String,
  pub sex:        String,
  pub age:        u8,
  pub bio:        Option<String>,
  pub user_id:    Option<String>,
  pub created_at: String,
}

impl RawVisitor {
  pub fn into_visitor(self) -> Result<Visitor> {
    Ok(Visitor {
      visitor_id: decode_uuid(&self.visitor_id)?,
      first_name: self.first_name,
      last_name: self.last_name,
      phone: self.phone,
      address: self.address,
      sex: decode_sex(&self.sex)?,
      age: self.age,
      bio: self.bio,
      user_id: decode_uuid_opt(self.user_id.as_deref())?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAnimal {
  pub animal_id:          String,
  pub name:               String,
  pub species:            String,
  pub breed:              Option<String>,
  pub age_years:          Option<u8>,
  pub age_months:         Option<u8>,
  pub sex:                String,
  pub status:             String,
  pub vaccinated:         bool,
  pub neutered:           bool,
  pub photo_url:          Option<String>,
  pub description:        Option<String>,
  pub shelter_id:         String,
  pub accepted:           bool,
  pub adopted_by:         Option<String>,
  pub planned_visitor_id: Option<String>,
  pub visit_requested:    bool,
  pub visit_approved:     bool,
  pub created_at:         String,
}

impl RawAnimal {
  pub fn into_animal(self) -> Result<Animal> {
    Ok(Animal {
      animal_id: decode_uuid(&self.animal_id)?,
      name: self.name,
      species: self.species,
      breed: self.breed,
      age_years: self.age_years,
      age_months: self.age_months,
      sex: decode_sex(&self.sex)?,
      status: decode_status(&self.status)?,
      vaccinated: self.vaccinated,
      neutered: self.neutered,
      photo_url: self.photo_url,
      description: self.description,
      shelter_id: decode_uuid(&self.shelter_id)?,
      accepted: self.accepted,
      adopted_by: decode_uuid_opt(self.adopted_by.as_deref())?,
      planned_visitor_id: decode_uuid_opt(self.planned_visitor_id.as_deref())?,
      visit_requested: self.visit_requested,
      visit_approved: self.visit_approved,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
