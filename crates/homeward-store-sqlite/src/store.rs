//! [`SqliteStore`] — the SQLite implementation of [`EntityStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use homeward_core::{
  animal::Animal,
  role::Role,
  shelter::Shelter,
  store::{Commit, EntityStore},
  user::User,
  vet::Vet,
  visitor::Visitor,
};

use crate::{
  Error, Result,
  encode::{
    RawAnimal, RawShelter, RawUser, RawVet, RawVisitor, decode_role, encode_dt,
    encode_sex, encode_status, encode_uuid, encode_uuid_opt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Homeward entity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

const USER_COLS: &str = "user_id, username, email, password_hash, created_at";
const SHELTER_COLS: &str =
  "shelter_id, name, address, city, phone, authorized, user_id, vet_id, created_at";
const VET_COLS: &str =
  "vet_id, first_name, last_name, id_number, authorized, user_id, created_at";
const VISITOR_COLS: &str = "visitor_id, first_name, last_name, phone, address, \
                            sex, age, bio, user_id, created_at";
const ANIMAL_COLS: &str = "animal_id, name, species, breed, age_years, age_months, \
                           sex, status, vaccinated, neutered, photo_url, description, \
                           shelter_id, accepted, adopted_by, planned_visitor_id, \
                           visit_requested, visit_approved, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    username:      row.get(1)?,
    email:         row.get(2)?,
    password_hash: row.get(3)?,
    created_at:    row.get(4)?,
  })
}

fn shelter_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawShelter> {
  Ok(RawShelter {
    shelter_id: row.get(0)?,
    name:       row.get(1)?,
    address:    row.get(2)?,
    city:       row.get(3)?,
    phone:      row.get(4)?,
    authorized: row.get(5)?,
    user_id:    row.get(6)?,
    vet_id:     row.get(7)?,
    created_at: row.get(8)?,
  })
}

fn vet_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVet> {
  Ok(RawVet {
    vet_id:     row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    id_number:  row.get(3)?,
    authorized: row.get(4)?,
    user_id:    row.get(5)?,
    created_at: row.get(6)?,
  })
}

fn visitor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVisitor> {
  Ok(RawVisitor {
    visitor_id: row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    phone:      row.get(3)?,
    address:    row.get(4)?,
    sex:        row.get(5)?,
    age:        row.get(6)?,
    bio:        row.get(7)?,
    user_id:    row.get(8)?,
    created_at: row.get(9)?,
  })
}

fn animal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAnimal> {
  Ok(RawAnimal {
    animal_id:          row.get(0)?,
    name:               row.get(1)?,
    species:            row.get(2)?,
    breed:              row.get(3)?,
    age_years:          row.get(4)?,
    age_months:         row.get(5)?,
    sex:                row.get(6)?,
    status:             row.get(7)?,
    vaccinated:         row.get(8)?,
    neutered:           row.get(9)?,
    photo_url:          row.get(10)?,
    description:        row.get(11)?,
    shelter_id:         row.get(12)?,
    accepted:           row.get(13)?,
    adopted_by:         row.get(14)?,
    planned_visitor_id: row.get(15)?,
    visit_requested:    row.get(16)?,
    visit_approved:     row.get(17)?,
    created_at:         row.get(18)?,
  })
}

// ─── Clause-based SELECT helpers ─────────────────────────────────────────────

impl SqliteStore {
  /// Fetch a user row plus its role names; `clause` filters on one key.
  async fn users_where(
    &self,
    clause: &'static str,
    key: Option<String>,
  ) -> Result<Vec<User>> {
    let raws: Vec<(RawUser, Vec<String>)> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLS} FROM users {clause}");
        let mut stmt = conn.prepare(&sql)?;
        let users = match key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };

        let mut out = Vec::with_capacity(users.len());
        let mut role_stmt =
          conn.prepare("SELECT role_name FROM user_roles WHERE user_id = ?1")?;
        for raw in users {
          let roles = role_stmt
            .query_map(rusqlite::params![raw.user_id], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
          out.push((raw, roles));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(u, roles)| u.into_user(roles))
      .collect()
  }

  async fn shelters_where(
    &self,
    clause: &'static str,
    key: Option<String>,
  ) -> Result<Vec<Shelter>> {
    let raws: Vec<RawShelter> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {SHELTER_COLS} FROM shelters {clause}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], shelter_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], shelter_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawShelter::into_shelter).collect()
  }

  async fn vets_where(
    &self,
    clause: &'static str,
    key: Option<String>,
  ) -> Result<Vec<Vet>> {
    let raws: Vec<RawVet> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {VET_COLS} FROM vets {clause}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], vet_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], vet_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawVet::into_vet).collect()
  }

  async fn visitors_where(
    &self,
    clause: &'static str,
    key: Option<String>,
  ) -> Result<Vec<Visitor>> {
    let raws: Vec<RawVisitor> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {VISITOR_COLS} FROM visitors {clause}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], visitor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], visitor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawVisitor::into_visitor).collect()
  }

  async fn animals_where(
    &self,
    clause: &'static str,
    key: Option<String>,
  ) -> Result<Vec<Animal>> {
    let raws: Vec<RawAnimal> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {ANIMAL_COLS} FROM animals {clause}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match key {
          Some(k) => stmt
            .query_map(rusqlite::params![k], animal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], animal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAnimal::into_animal).collect()
  }
}

// ─── Encoded write rows ──────────────────────────────────────────────────────

struct UserRow {
  id:            String,
  username:      String,
  email:         String,
  password_hash: String,
  created_at:    String,
  roles:         Vec<String>,
}

fn encode_user(u: &User) -> UserRow {
  UserRow {
    id:            encode_uuid(u.user_id),
    username:      u.username.clone(),
    email:         u.email.clone(),
    password_hash: u.password_hash.clone(),
    created_at:    encode_dt(u.created_at),
    roles:         u.roles.iter().map(|r| r.name().to_owned()).collect(),
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  // ── Users & roles ─────────────────────────────────────────────────────────

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    Ok(
      self
        .users_where("WHERE user_id = ?1", Some(encode_uuid(id)))
        .await?
        .pop(),
    )
  }

  async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(
      self
        .users_where("WHERE username = ?1", Some(username.to_owned()))
        .await?
        .pop(),
    )
  }

  async fn list_users(&self) -> Result<Vec<User>> { self.users_where("", None).await }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
    let name = name.to_owned();
    let found: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name FROM roles WHERE name = ?1",
              rusqlite::params![name],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    found.as_deref().map(decode_role).transpose()
  }

  async fn insert_role(&self, role: Role) -> Result<()> {
    let name = role.name().to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO roles (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Shelters ──────────────────────────────────────────────────────────────

  async fn get_shelter(&self, id: Uuid) -> Result<Option<Shelter>> {
    Ok(
      self
        .shelters_where("WHERE shelter_id = ?1", Some(encode_uuid(id)))
        .await?
        .pop(),
    )
  }

  async fn list_shelters(&self) -> Result<Vec<Shelter>> {
    self.shelters_where("", None).await
  }

  async fn shelter_by_user(&self, user_id: Uuid) -> Result<Option<Shelter>> {
    Ok(
      self
        .shelters_where("WHERE user_id = ?1", Some(encode_uuid(user_id)))
        .await?
        .pop(),
    )
  }

  async fn shelters_by_vet(&self, vet_id: Uuid) -> Result<Vec<Shelter>> {
    self
      .shelters_where("WHERE vet_id = ?1", Some(encode_uuid(vet_id)))
      .await
  }

  // ── Vets ──────────────────────────────────────────────────────────────────

  async fn get_vet(&self, id: Uuid) -> Result<Option<Vet>> {
    Ok(
      self
        .vets_where("WHERE vet_id = ?1", Some(encode_uuid(id)))
        .await?
        .pop(),
    )
  }

  async fn list_vets(&self) -> Result<Vec<Vet>> { self.vets_where("", None).await }

  async fn vet_by_user(&self, user_id: Uuid) -> Result<Option<Vet>> {
    Ok(
      self
        .vets_where("WHERE user_id = ?1", Some(encode_uuid(user_id)))
        .await?
        .pop(),
    )
  }

  // ── Visitors ──────────────────────────────────────────────────────────────

  async fn get_visitor(&self, id: Uuid) -> Result<Option<Visitor>> {
    Ok(
      self
        .visitors_where("WHERE visitor_id = ?1", Some(encode_uuid(id)))
        .await?
        .pop(),
    )
  }

  async fn list_visitors(&self) -> Result<Vec<Visitor>> {
    self.visitors_where("", None).await
  }

  async fn visitor_by_user(&self, user_id: Uuid) -> Result<Option<Visitor>> {
    Ok(
      self
        .visitors_where("WHERE user_id = ?1", Some(encode_uuid(user_id)))
        .await?
        .pop(),
    )
  }

  // ── Animals ───────────────────────────────────────────────────────────────

  async fn get_animal(&self, id: Uuid) -> Result<Option<Animal>> {
    Ok(
      self
        .animals_where("WHERE animal_id = ?1", Some(encode_uuid(id)))
        .await?
        .pop(),
    )
  }

  async fn list_animals(&self) -> Result<Vec<Animal>> {
    self.animals_where("", None).await
  }

  async fn animals_by_shelter(&self, shelter_id: Uuid) -> Result<Vec<Animal>> {
    self
      .animals_where("WHERE shelter_id = ?1", Some(encode_uuid(shelter_id)))
      .await
  }

  async fn animals_planned_by(&self, visitor_id: Uuid) -> Result<Vec<Animal>> {
    self
      .animals_where(
        "WHERE planned_visitor_id = ?1",
        Some(encode_uuid(visitor_id)),
      )
      .await
  }

  async fn animals_adopted_by(&self, visitor_id: Uuid) -> Result<Vec<Animal>> {
    self
      .animals_where("WHERE adopted_by = ?1", Some(encode_uuid(visitor_id)))
      .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn apply(&self, commit: Commit) -> Result<()> {
    let users: Vec<UserRow> = commit.users.iter().map(encode_user).collect();
    let vets = commit.vets;
    let visitors = commit.visitors;
    let shelters = commit.shelters;
    let animals = commit.animals;

    self
      .conn
      .call(move |conn| {
        // One transaction per commit: either the whole batch lands or none
        // of it does. Parents are written before the rows that reference
        // them so in-commit foreign keys resolve.
        let tx = conn.transaction()?;

        for u in &users {
          tx.execute(
            "INSERT INTO users (user_id, username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
               username = excluded.username,
               email = excluded.email,
               password_hash = excluded.password_hash",
            rusqlite::params![u.id, u.username, u.email, u.password_hash, u.created_at],
          )?;
          // Role membership is replaced wholesale on every user write.
          tx.execute(
            "DELETE FROM user_roles WHERE user_id = ?1",
            rusqlite::params![u.id],
          )?;
          for role in &u.roles {
            tx.execute(
              "INSERT OR IGNORE INTO user_roles (user_id, role_name) VALUES (?1, ?2)",
              rusqlite::params![u.id, role],
            )?;
          }
        }

        for v in &vets {
          tx.execute(
            "INSERT INTO vets (vet_id, first_name, last_name, id_number, authorized, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(vet_id) DO UPDATE SET
               first_name = excluded.first_name,
               last_name = excluded.last_name,
               id_number = excluded.id_number,
               authorized = excluded.authorized,
               user_id = excluded.user_id",
            rusqlite::params![
              encode_uuid(v.vet_id),
              v.first_name,
              v.last_name,
              v.id_number,
              v.authorized,
              encode_uuid_opt(v.user_id),
              encode_dt(v.created_at),
            ],
          )?;
        }

        for v in &visitors {
          tx.execute(
            "INSERT INTO visitors (visitor_id, first_name, last_name, phone, address, sex, age, bio, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(visitor_id) DO UPDATE SET
               first_name = excluded.first_name,
               last_name = excluded.last_name,
               phone = excluded.phone,
               address = excluded.address,
               sex = excluded.sex,
               age = excluded.age,
               bio = excluded.bio,
               user_id = excluded.user_id",
            rusqlite::params![
              encode_uuid(v.visitor_id),
              v.first_name,
              v.last_name,
              v.phone,
              v.address,
              encode_sex(v.sex),
              v.age,
              v.bio,
              encode_uuid_opt(v.user_id),
              encode_dt(v.created_at),
            ],
          )?;
        }

        for s in &shelters {
          tx.execute(
            "INSERT INTO shelters (shelter_id, name, address, city, phone, authorized, user_id, vet_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(shelter_id) DO UPDATE SET
               name = excluded.name,
               address = excluded.address,
               city = excluded.city,
               phone = excluded.phone,
               authorized = excluded.authorized,
               user_id = excluded.user_id,
               vet_id = excluded.vet_id",
            rusqlite::params![
              encode_uuid(s.shelter_id),
              s.name,
              s.address,
              s.city,
              s.phone,
              s.authorized,
              encode_uuid_opt(s.user_id),
              encode_uuid_opt(s.vet_id),
              encode_dt(s.created_at),
            ],
          )?;
        }

        for a in &animals {
          tx.execute(
            "INSERT INTO animals (animal_id, name, species, breed, age_years, age_months, sex, status,
               vaccinated, neutered, photo_url, description, shelter_id, accepted,
               adopted_by, planned_visitor_id, visit_requested, visit_approved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
             ON CONFLICT(animal_id) DO UPDATE SET
               name = excluded.name,
               species = excluded.species,
               breed = excluded.breed,
               age_years = excluded.age_years,
               age_months = excluded.age_months,
               sex = excluded.sex,
               status = excluded.status,
               vaccinated = excluded.vaccinated,
               neutered = excluded.neutered,
               photo_url = excluded.photo_url,
               description = excluded.description,
               shelter_id = excluded.shelter_id,
               accepted = excluded.accepted,
               adopted_by = excluded.adopted_by,
               planned_visitor_id = excluded.planned_visitor_id,
               visit_requested = excluded.visit_requested,
               visit_approved = excluded.visit_approved",
            rusqlite::params![
              encode_uuid(a.animal_id),
              a.name,
              a.species,
              a.breed,
              a.age_years,
              a.age_months,
              encode_sex(a.sex),
              encode_status(a.status),
              a.vaccinated,
              a.neutered,
              a.photo_url,
              a.description,
              encode_uuid(a.shelter_id),
              a.accepted,
              encode_uuid_opt(a.adopted_by),
              encode_uuid_opt(a.planned_visitor_id),
              a.visit_requested,
              a.visit_approved,
              encode_dt(a.created_at),
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
