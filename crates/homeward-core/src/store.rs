//! The `EntityStore` trait and the atomic commit batch.
//!
//! The trait is implemented by storage backends (e.g.
//! `homeward-store-sqlite`). Higher layers depend on this abstraction, not
//! on any concrete backend. Reverse relations (shelter → animals, vet →
//! shelters, visitor → planned/adopted animals) are queries here instead of
//! lists kept in sync on the entities.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  animal::Animal, role::Role, shelter::Shelter, user::User, vet::Vet,
  visitor::Visitor,
};

// ─── Commit ──────────────────────────────────────────────────────────────────

/// A batch of entity upserts applied as one transactional unit: either the
/// whole commit lands or none of it does. Cascades and the adoption side
/// effect touch multiple entities, so they go through a single commit.
#[derive(Debug, Clone, Default)]
pub struct Commit {
  pub users:    Vec<User>,
  pub shelters: Vec<Shelter>,
  pub vets:     Vec<Vet>,
  pub visitors: Vec<Visitor>,
  pub animals:  Vec<Animal>,
}

impl Commit {
  pub fn new() -> Self { Self::default() }

  pub fn user(mut self, user: User) -> Self {
    self.users.push(user);
    self
  }

  pub fn shelter(mut self, shelter: Shelter) -> Self {
    self.shelters.push(shelter);
    self
  }

  pub fn vet(mut self, vet: Vet) -> Self {
    self.vets.push(vet);
    self
  }

  pub fn visitor(mut self, visitor: Visitor) -> Self {
    self.visitors.push(visitor);
    self
  }

  pub fn animal(mut self, animal: Animal) -> Self {
    self.animals.push(animal);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.users.is_empty()
      && self.shelters.is_empty()
      && self.vets.is_empty()
      && self.visitors.is_empty()
      && self.animals.is_empty()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Homeward entity store backend.
///
/// Upserts are keyed by entity identity; `apply` is the only write path and
/// is atomic per call.
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users & roles ─────────────────────────────────────────────────────

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Look up a seeded role by its wire name (`ROLE_ADMIN`, …).
  fn find_role_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + 'a;

  /// Insert a role if absent. Idempotent; used by startup seeding.
  fn insert_role(
    &self,
    role: Role,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Shelters ──────────────────────────────────────────────────────────

  fn get_shelter(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Shelter>, Self::Error>> + Send + '_;

  fn list_shelters(
    &self,
  ) -> impl Future<Output = Result<Vec<Shelter>, Self::Error>> + Send + '_;

  fn shelter_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Shelter>, Self::Error>> + Send + '_;

  /// All shelters currently assigned to `vet_id`.
  fn shelters_by_vet(
    &self,
    vet_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Shelter>, Self::Error>> + Send + '_;

  // ── Vets ──────────────────────────────────────────────────────────────

  fn get_vet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Vet>, Self::Error>> + Send + '_;

  fn list_vets(
    &self,
  ) -> impl Future<Output = Result<Vec<Vet>, Self::Error>> + Send + '_;

  fn vet_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vet>, Self::Error>> + Send + '_;

  // ── Visitors ──────────────────────────────────────────────────────────

  fn get_visitor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Visitor>, Self::Error>> + Send + '_;

  fn list_visitors(
    &self,
  ) -> impl Future<Output = Result<Vec<Visitor>, Self::Error>> + Send + '_;

  fn visitor_by_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Visitor>, Self::Error>> + Send + '_;

  // ── Animals ───────────────────────────────────────────────────────────

  fn get_animal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Animal>, Self::Error>> + Send + '_;

  fn list_animals(
    &self,
  ) -> impl Future<Output = Result<Vec<Animal>, Self::Error>> + Send + '_;

  fn animals_by_shelter(
    &self,
    shelter_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Animal>, Self::Error>> + Send + '_;

  /// Animals whose pending visit is planned by `visitor_id`.
  fn animals_planned_by(
    &self,
    visitor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Animal>, Self::Error>> + Send + '_;

  /// Animals adopted by `visitor_id`.
  fn animals_adopted_by(
    &self,
    visitor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Animal>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Atomically upsert every entity in `commit`.
  fn apply(
    &self,
    commit: Commit,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
