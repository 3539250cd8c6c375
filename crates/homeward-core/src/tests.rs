//! Workflow tests against an in-memory [`EntityStore`] double.

use std::{
  collections::{BTreeSet, HashMap},
  convert::Infallible,
  str::FromStr,
  sync::Mutex,
};

use uuid::Uuid;

use crate::{
  actor::Actor,
  animal::{Animal, AnimalDetails, Sex, Status},
  error::Error,
  ops,
  role::Role,
  shelter::{Shelter, ShelterProfile},
  store::{Commit, EntityStore},
  user::{NewUser, User},
  vet::{Vet, VetProfile},
  visit::VisitState,
  visitor::{Visitor, VisitorProfile},
};

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
  inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
  roles:    BTreeSet<String>,
  users:    HashMap<Uuid, User>,
  shelters: HashMap<Uuid, Shelter>,
  vets:     HashMap<Uuid, Vet>,
  visitors: HashMap<Uuid, Visitor>,
  animals:  HashMap<Uuid, Animal>,
}

impl EntityStore for MemoryStore {
  type Error = Infallible;

  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Infallible> {
    Ok(self.inner.lock().unwrap().users.get(&id).cloned())
  }

  async fn user_by_username(&self, username: &str) -> Result<Option<User>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.users.values().find(|u| u.username == username).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>, Infallible> {
    Ok(self.inner.lock().unwrap().users.values().cloned().collect())
  }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, Infallible> {
    let inner = self.inner.lock().unwrap();
    if inner.roles.contains(name) {
      Ok(Role::from_str(name).ok())
    } else {
      Ok(None)
    }
  }

  async fn insert_role(&self, role: Role) -> Result<(), Infallible> {
    self.inner.lock().unwrap().roles.insert(role.name().to_owned());
    Ok(())
  }

  async fn get_shelter(&self, id: Uuid) -> Result<Option<Shelter>, Infallible> {
    Ok(self.inner.lock().unwrap().shelters.get(&id).cloned())
  }

  async fn list_shelters(&self) -> Result<Vec<Shelter>, Infallible> {
    Ok(self.inner.lock().unwrap().shelters.values().cloned().collect())
  }

  async fn shelter_by_user(&self, user_id: Uuid) -> Result<Option<Shelter>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .shelters
        .values()
        .find(|s| s.user_id == Some(user_id))
        .cloned(),
    )
  }

  async fn shelters_by_vet(&self, vet_id: Uuid) -> Result<Vec<Shelter>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .shelters
        .values()
        .filter(|s| s.vet_id == Some(vet_id))
        .cloned()
        .collect(),
    )
  }

  async fn get_vet(&self, id: Uuid) -> Result<Option<Vet>, Infallible> {
    Ok(self.inner.lock().unwrap().vets.get(&id).cloned())
  }

  async fn list_vets(&self) -> Result<Vec<Vet>, Infallible> {
    Ok(self.inner.lock().unwrap().vets.values().cloned().collect())
  }

  async fn vet_by_user(&self, user_id: Uuid) -> Result<Option<Vet>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.vets.values().find(|v| v.user_id == Some(user_id)).cloned())
  }

  async fn get_visitor(&self, id: Uuid) -> Result<Option<Visitor>, Infallible> {
    Ok(self.inner.lock().unwrap().visitors.get(&id).cloned())
  }

  async fn list_visitors(&self) -> Result<Vec<Visitor>, Infallible> {
    Ok(self.inner.lock().unwrap().visitors.values().cloned().collect())
  }

  async fn visitor_by_user(&self, user_id: Uuid) -> Result<Option<Visitor>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .visitors
        .values()
        .find(|v| v.user_id == Some(user_id))
        .cloned(),
    )
  }

  async fn get_animal(&self, id: Uuid) -> Result<Option<Animal>, Infallible> {
    Ok(self.inner.lock().unwrap().animals.get(&id).cloned())
  }

  async fn list_animals(&self) -> Result<Vec<Animal>, Infallible> {
    Ok(self.inner.lock().unwrap().animals.values().cloned().collect())
  }

  async fn animals_by_shelter(&self, shelter_id: Uuid) -> Result<Vec<Animal>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .animals
        .values()
        .filter(|a| a.shelter_id == shelter_id)
        .cloned()
        .collect(),
    )
  }

  async fn animals_planned_by(&self, visitor_id: Uuid) -> Result<Vec<Animal>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .animals
        .values()
        .filter(|a| a.planned_visitor_id == Some(visitor_id))
        .cloned()
        .collect(),
    )
  }

  async fn animals_adopted_by(&self, visitor_id: Uuid) -> Result<Vec<Animal>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .animals
        .values()
        .filter(|a| a.adopted_by == Some(visitor_id))
        .cloned()
        .collect(),
    )
  }

  async fn apply(&self, commit: Commit) -> Result<(), Infallible> {
    let mut inner = self.inner.lock().unwrap();
    for user in commit.users {
      inner.users.insert(user.user_id, user);
    }
    for shelter in commit.shelters {
      inner.shelters.insert(shelter.shelter_id, shelter);
    }
    for vet in commit.vets {
      inner.vets.insert(vet.vet_id, vet);
    }
    for visitor in commit.visitors {
      inner.visitors.insert(visitor.visitor_id, visitor);
    }
    for animal in commit.animals {
      inner.animals.insert(animal.animal_id, animal);
    }
    Ok(())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn store() -> MemoryStore {
  let s = MemoryStore::default();
  ops::roles::seed(&s).await.unwrap();
  s
}

async fn register(store: &MemoryStore, username: &str) -> User {
  ops::users::register(store, NewUser {
    username:      username.to_owned(),
    email:         format!("{username}@example.com"),
    password_hash: "$argon2id$stub".to_owned(),
  })
  .await
  .unwrap()
}

fn actor_of(user: &User) -> Actor { Actor::from_user(user, None) }

/// Re-fetch the user (role sets change under admin actions) and rebuild the
/// actor, resolving the vet profile id the way the transport layer does.
async fn refresh_actor(store: &MemoryStore, user_id: Uuid) -> Actor {
  let user = store.get_user(user_id).await.unwrap().unwrap();
  let vet_id = store.vet_by_user(user_id).await.unwrap().map(|v| v.vet_id);
  Actor::from_user(&user, vet_id)
}

async fn admin(store: &MemoryStore) -> Actor {
  let mut user = register(store, "admin").await;
  user.grant(Role::Admin);
  store.apply(Commit::new().user(user.clone())).await.unwrap();
  actor_of(&user)
}

fn shelter_profile(name: &str) -> ShelterProfile {
  ShelterProfile {
    name:    name.to_owned(),
    address: Some("1 Harbour Rd".to_owned()),
    city:    Some("Patras".to_owned()),
    phone:   Some("2610555000".to_owned()),
  }
}

fn visitor_profile(phone: &str) -> VisitorProfile {
  VisitorProfile {
    first_name: "Ada".to_owned(),
    last_name:  "Klein".to_owned(),
    phone:      phone.to_owned(),
    address:    "12 Elm St".to_owned(),
    sex:        Sex::Female,
    age:        34,
    bio:        None,
  }
}

fn animal_details(name: &str, status: Status) -> AnimalDetails {
  AnimalDetails {
    name: name.to_owned(),
    species: "Dog".to_owned(),
    breed: Some("Collie".to_owned()),
    age_years: Some(2),
    age_months: Some(6),
    sex: Sex::Male,
    status,
    vaccinated: true,
    neutered: false,
    photo_url: None,
    description: None,
  }
}

/// Register a user, save a shelter profile, and have the admin authorize it
/// (granting the shelter role). Returns the owner's refreshed actor and the
/// authorized shelter.
async fn authorized_shelter(
  store: &MemoryStore,
  admin: &Actor,
  username: &str,
) -> (Actor, Shelter) {
  let owner = register(store, username).await;
  ops::shelters::upsert_profile(
    store,
    &actor_of(&owner),
    owner.user_id,
    shelter_profile(&format!("{username} shelter")),
  )
  .await
  .unwrap();
  let shelter = ops::shelters::toggle_authorization(store, admin, owner.user_id)
    .await
    .unwrap();
  (refresh_actor(store, owner.user_id).await, shelter)
}

/// Register a user with a visitor profile. Returns the refreshed actor and
/// the visitor.
async fn visitor_user(store: &MemoryStore, username: &str, phone: &str) -> (Actor, Visitor) {
  let user = register(store, username).await;
  let visitor =
    ops::visitors::upsert_profile(store, &actor_of(&user), user.user_id, visitor_profile(phone))
      .await
      .unwrap();
  (refresh_actor(store, user.user_id).await, visitor)
}

/// Register a user with a vet profile, authorize it, and assign it to
/// `shelter`. Returns the refreshed actor and the vet.
async fn assigned_vet(
  store: &MemoryStore,
  admin: &Actor,
  username: &str,
  shelter: &Shelter,
) -> (Actor, Vet) {
  let user = register(store, username).await;
  ops::vets::upsert_profile(store, &actor_of(&user), user.user_id, VetProfile {
    first_name: "Jo".to_owned(),
    last_name:  "Stavros".to_owned(),
    id_number:  None,
  })
  .await
  .unwrap();
  let vet = ops::vets::toggle_authorization(store, admin, user.user_id)
    .await
    .unwrap();
  ops::vets::assign_shelter(store, admin, vet.vet_id, shelter.shelter_id)
    .await
    .unwrap();
  (refresh_actor(store, user.user_id).await, vet)
}

// ─── Role seeding & registration ─────────────────────────────────────────────

#[tokio::test]
async fn role_seeding_is_idempotent() {
  let s = store().await;
  ops::roles::seed(&s).await.unwrap();
  for role in Role::ALL {
    assert_eq!(s.find_role_by_name(role.name()).await.unwrap(), Some(role));
  }
}

#[tokio::test]
async fn register_grants_the_base_role() {
  let s = store().await;
  let user = register(&s, "nikos").await;
  assert!(user.has_role(Role::User));
  assert!(!user.is_admin());
}

#[tokio::test]
async fn register_rejects_a_taken_username() {
  let s = store().await;
  register(&s, "nikos").await;
  let err = ops::users::register(&s, NewUser {
    username:      "nikos".to_owned(),
    email:         "other@example.com".to_owned(),
    password_hash: "$argon2id$stub".to_owned(),
  })
  .await
  .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));
}

// ─── Profile upserts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn shelter_profile_upsert_creates_once_then_updates_in_place() {
  let s = store().await;
  let user = register(&s, "maria").await;
  let actor = actor_of(&user);

  let first = ops::shelters::upsert_profile(&s, &actor, user.user_id, shelter_profile("Paws"))
    .await
    .unwrap();
  let second = ops::shelters::upsert_profile(&s, &actor, user.user_id, shelter_profile("Paws"))
    .await
    .unwrap();
  assert_eq!(first.shelter_id, second.shelter_id);
  assert_eq!(s.list_shelters().await.unwrap().len(), 1);

  let renamed =
    ops::shelters::upsert_profile(&s, &actor, user.user_id, shelter_profile("Paws & Claws"))
      .await
      .unwrap();
  assert_eq!(renamed.shelter_id, first.shelter_id);
  assert_eq!(renamed.name, "Paws & Claws");
}

#[tokio::test]
async fn shelter_profile_upsert_is_owner_only() {
  let s = store().await;
  let user = register(&s, "maria").await;
  let other = register(&s, "petros").await;

  let err =
    ops::shelters::upsert_profile(&s, &actor_of(&other), user.user_id, shelter_profile("X"))
      .await
      .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn visitor_profile_upsert_grants_the_role_once() {
  let s = store().await;
  let user = register(&s, "ada").await;
  let actor = actor_of(&user);

  ops::visitors::upsert_profile(&s, &actor, user.user_id, visitor_profile("5550100"))
    .await
    .unwrap();
  let refreshed = s.get_user(user.user_id).await.unwrap().unwrap();
  assert!(refreshed.has_role(Role::Visitor));

  // A second save keeps the role; it is a grant, not a toggle.
  ops::visitors::upsert_profile(&s, &actor, user.user_id, visitor_profile("5550101"))
    .await
    .unwrap();
  let refreshed = s.get_user(user.user_id).await.unwrap().unwrap();
  assert!(refreshed.has_role(Role::Visitor));
  assert_eq!(s.list_visitors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn vet_profile_upsert_preserves_authorization() {
  let s = store().await;
  let a = admin(&s).await;
  let user = register(&s, "jo").await;
  let actor = actor_of(&user);

  ops::vets::upsert_profile(&s, &actor, user.user_id, VetProfile {
    first_name: "Jo".to_owned(),
    last_name:  "Stavros".to_owned(),
    id_number:  Some("0123456789".to_owned()),
  })
  .await
  .unwrap();
  let vet = ops::vets::toggle_authorization(&s, &a, user.user_id).await.unwrap();
  assert!(vet.authorized);

  let saved = ops::vets::upsert_profile(&s, &actor, user.user_id, VetProfile {
    first_name: "Joanna".to_owned(),
    last_name:  "Stavros".to_owned(),
    id_number:  Some("0123456789".to_owned()),
  })
  .await
  .unwrap();
  assert!(saved.authorized);
  assert_eq!(saved.vet_id, vet.vet_id);
}

// ─── Authorization toggles & cascades ────────────────────────────────────────

#[tokio::test]
async fn authorize_toggle_fails_before_mutation_without_a_profile() {
  let s = store().await;
  let a = admin(&s).await;
  let user = register(&s, "maria").await;

  let err = ops::shelters::toggle_authorization(&s, &a, user.user_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileMissing(_)));

  // All-or-nothing: the paired role toggle must not have happened.
  let unchanged = s.get_user(user.user_id).await.unwrap().unwrap();
  assert!(!unchanged.has_role(Role::Shelter));
}

#[tokio::test]
async fn shelter_authorization_pairs_with_the_role_toggle() {
  let s = store().await;
  let a = admin(&s).await;
  let user = register(&s, "maria").await;
  ops::shelters::upsert_profile(&s, &actor_of(&user), user.user_id, shelter_profile("Paws"))
    .await
    .unwrap();

  let shelter = ops::shelters::toggle_authorization(&s, &a, user.user_id)
    .await
    .unwrap();
  assert!(shelter.authorized);
  let owner = s.get_user(user.user_id).await.unwrap().unwrap();
  assert!(owner.has_role(Role::Shelter));

  let shelter = ops::shelters::toggle_authorization(&s, &a, user.user_id)
    .await
    .unwrap();
  assert!(!shelter.authorized);
  let owner = s.get_user(user.user_id).await.unwrap().unwrap();
  assert!(!owner.has_role(Role::Shelter));
}

#[tokio::test]
async fn deauthorizing_a_shelter_clears_its_vet() {
  let s = store().await;
  let a = admin(&s).await;
  let (_, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (_, vet) = assigned_vet(&s, &a, "jo", &shelter).await;

  let shelter = s.get_shelter(shelter.shelter_id).await.unwrap().unwrap();
  assert_eq!(shelter.vet_id, Some(vet.vet_id));

  let shelter = ops::shelters::toggle_authorization(&s, &a, shelter.user_id.unwrap())
    .await
    .unwrap();
  assert!(!shelter.authorized);
  assert_eq!(shelter.vet_id, None);
}

#[tokio::test]
async fn deauthorizing_a_vet_severs_every_assignment() {
  let s = store().await;
  let a = admin(&s).await;
  let (_, first) = authorized_shelter(&s, &a, "maria").await;
  let (_, second) = authorized_shelter(&s, &a, "petros").await;
  let (_, vet) = assigned_vet(&s, &a, "jo", &first).await;
  ops::vets::assign_shelter(&s, &a, vet.vet_id, second.shelter_id)
    .await
    .unwrap();
  assert_eq!(s.shelters_by_vet(vet.vet_id).await.unwrap().len(), 2);

  let vet = ops::vets::toggle_authorization(&s, &a, vet.user_id.unwrap())
    .await
    .unwrap();

  assert!(!vet.authorized);
  assert!(s.shelters_by_vet(vet.vet_id).await.unwrap().is_empty());
  for id in [first.shelter_id, second.shelter_id] {
    assert_eq!(s.get_shelter(id).await.unwrap().unwrap().vet_id, None);
  }
}

#[tokio::test]
async fn assign_shelter_rejects_a_redundant_assignment() {
  let s = store().await;
  let a = admin(&s).await;
  let (_, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (_, vet) = assigned_vet(&s, &a, "jo", &shelter).await;

  let err = ops::vets::assign_shelter(&s, &a, vet.vet_id, shelter.shelter_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));
}

#[tokio::test]
async fn assign_shelter_is_admin_only() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (_, vet) = assigned_vet(&s, &a, "jo", &shelter).await;

  let err = ops::vets::assign_shelter(&s, &owner, vet.vet_id, shelter.shelter_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

// ─── Animal lifecycle through the ops layer ──────────────────────────────────

#[tokio::test]
async fn create_requires_a_shelter_profile() {
  let s = store().await;
  let user = register(&s, "maria").await;
  let err = ops::animals::create(&s, &actor_of(&user), animal_details("Rex", Status::Available))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileMissing(_)));
}

#[tokio::test]
async fn owner_lists_and_edits_animals() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;

  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  assert_eq!(animal.shelter_id, shelter.shelter_id);
  assert_eq!(animal.status, Status::Available);
  assert!(!animal.accepted);

  let updated = ops::animals::update(
    &s,
    &owner,
    animal.animal_id,
    animal_details("Rex II", Status::Pending),
  )
  .await
  .unwrap();
  assert_eq!(updated.name, "Rex II");
  assert_eq!(updated.status, Status::Pending);
}

#[tokio::test]
async fn status_never_moves_backward() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  ops::animals::update(&s, &owner, animal.animal_id, animal_details("Rex", Status::Adopted))
    .await
    .unwrap();

  let err = ops::animals::update(
    &s,
    &owner,
    animal.animal_id,
    animal_details("Rex", Status::Available),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));
}

#[tokio::test]
async fn vet_toggles_acceptance_but_cannot_edit() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (vet_actor, _) = assigned_vet(&s, &a, "jo", &shelter).await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  let signed = ops::animals::toggle_accepted(&s, &vet_actor, animal.animal_id)
    .await
    .unwrap();
  assert!(signed.accepted);
  assert_eq!(signed.name, "Rex");

  let err = ops::animals::update(
    &s,
    &vet_actor,
    animal.animal_id,
    animal_details("Hijacked", Status::Available),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let back = ops::animals::toggle_accepted(&s, &vet_actor, animal.animal_id)
    .await
    .unwrap();
  assert!(!back.accepted);
}

#[tokio::test]
async fn owner_cannot_toggle_acceptance() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  let err = ops::animals::toggle_accepted(&s, &owner, animal.animal_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

// ─── Visit request protocol through the ops layer ────────────────────────────

#[tokio::test]
async fn visit_request_toggles_on_and_off() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let (visitor_actor, visitor) = visitor_user(&s, "ada", "5550100").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  let requested = ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();
  assert!(requested.visit_requested);
  assert_eq!(requested.planned_visitor_id, Some(visitor.visitor_id));

  let withdrawn = ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();
  assert!(!withdrawn.visit_requested);
  assert_eq!(withdrawn.planned_visitor_id, None);
  assert!(!withdrawn.visit_approved);
}

#[tokio::test]
async fn approve_requires_a_request_and_deny_resets() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (visitor_actor, _) = visitor_user(&s, "ada", "5550100").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  let err = ops::animals::approve_visit(&s, &owner, shelter.shelter_id, animal.animal_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));

  ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();
  let approved = ops::animals::approve_visit(&s, &owner, shelter.shelter_id, animal.animal_id)
    .await
    .unwrap();
  assert!(approved.visit_approved);
  assert!(approved.visit_requested);

  let denied = ops::animals::deny_visit(&s, &owner, shelter.shelter_id, animal.animal_id)
    .await
    .unwrap();
  assert!(!denied.visit_requested);
  assert!(!denied.visit_approved);
  assert_eq!(denied.planned_visitor_id, None);
}

#[tokio::test]
async fn visit_review_is_scoped_to_the_pair() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let (other_owner, other_shelter) = authorized_shelter(&s, &a, "petros").await;
  let (visitor_actor, _) = visitor_user(&s, "ada", "5550100").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();

  // The animal lives in maria's shelter, not petros's.
  let err =
    ops::animals::approve_visit(&s, &other_owner, other_shelter.shelter_id, animal.animal_id)
      .await
      .unwrap_err();
  assert!(matches!(err, Error::AnimalNotFound(_)));
}

#[tokio::test]
async fn adoption_consumes_the_planned_visit() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (visitor_actor, visitor) = visitor_user(&s, "ada", "5550100").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();
  ops::animals::approve_visit(&s, &owner, shelter.shelter_id, animal.animal_id)
    .await
    .unwrap();

  let adopted = ops::animals::update(
    &s,
    &owner,
    animal.animal_id,
    animal_details("Rex", Status::Adopted),
  )
  .await
  .unwrap();

  assert_eq!(adopted.status, Status::Adopted);
  assert_eq!(adopted.adopted_by, Some(visitor.visitor_id));
  assert_eq!(adopted.planned_visitor_id, None);
  assert!(!adopted.visit_requested);
  assert!(!adopted.visit_approved);

  let adoptions = s.animals_adopted_by(visitor.visitor_id).await.unwrap();
  assert_eq!(adoptions.len(), 1);
}

#[tokio::test]
async fn pending_visits_pairs_animals_with_requesting_users() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (visitor_actor, visitor) = visitor_user(&s, "ada", "5550100").await;
  let requested = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  ops::animals::create(&s, &owner, animal_details("Mika", Status::Available))
    .await
    .unwrap();
  ops::animals::toggle_visit_request(&s, &visitor_actor, requested.animal_id)
    .await
    .unwrap();

  let rows = ops::animals::pending_visits(&s, &owner, shelter.shelter_id)
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].animal.animal_id, requested.animal_id);
  assert_eq!(rows[0].visitor.visitor_id, visitor.visitor_id);
  assert_eq!(rows[0].user_id, visitor_actor.user_id);
}

#[tokio::test]
async fn pending_visits_fails_loudly_on_a_hollow_request() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let mut animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  // Corrupt the record behind the ops layer's back.
  animal.visit_requested = true;
  s.apply(Commit::new().animal(animal)).await.unwrap();

  let err = ops::animals::pending_visits(&s, &owner, shelter.shelter_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DataIntegrity(_)));
}

// ─── Browse filters ──────────────────────────────────────────────────────────

#[tokio::test]
async fn browse_hides_unadoptable_and_contested_animals() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (vet_actor, _) = assigned_vet(&s, &a, "jo", &shelter).await;
  let (first_visitor, _) = visitor_user(&s, "ada", "5550100").await;
  let (second_visitor, _) = visitor_user(&s, "leo", "5550101").await;

  let unsigned = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  let open = ops::animals::create(&s, &owner, animal_details("Mika", Status::Available))
    .await
    .unwrap();
  let contested = ops::animals::create(&s, &owner, animal_details("Biscuit", Status::Available))
    .await
    .unwrap();
  let gone = ops::animals::create(&s, &owner, animal_details("Shadow", Status::Available))
    .await
    .unwrap();

  // Sign off everything except `unsigned`, adopt `gone`, and let the first
  // visitor claim `contested`.
  for id in [open.animal_id, contested.animal_id, gone.animal_id] {
    ops::animals::toggle_accepted(&s, &vet_actor, id).await.unwrap();
  }
  ops::animals::update(&s, &owner, gone.animal_id, animal_details("Shadow", Status::Adopted))
    .await
    .unwrap();
  ops::animals::toggle_visit_request(&s, &first_visitor, contested.animal_id)
    .await
    .unwrap();

  let seen_by_second: Vec<Uuid> = ops::animals::browse(&s, &second_visitor)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.animal_id)
    .collect();
  assert!(seen_by_second.contains(&open.animal_id));
  assert!(!seen_by_second.contains(&unsigned.animal_id));
  assert!(!seen_by_second.contains(&contested.animal_id));
  assert!(!seen_by_second.contains(&gone.animal_id));

  // The requester still sees the animal it claimed.
  let seen_by_first: Vec<Uuid> = ops::animals::browse(&s, &first_visitor)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.animal_id)
    .collect();
  assert!(seen_by_first.contains(&contested.animal_id));
}

#[tokio::test]
async fn planned_visits_lists_the_visitors_claims() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, shelter) = authorized_shelter(&s, &a, "maria").await;
  let (vet_actor, _) = assigned_vet(&s, &a, "jo", &shelter).await;
  let (visitor_actor, _) = visitor_user(&s, "ada", "5550100").await;

  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();
  ops::animals::toggle_accepted(&s, &vet_actor, animal.animal_id)
    .await
    .unwrap();
  ops::animals::toggle_visit_request(&s, &visitor_actor, animal.animal_id)
    .await
    .unwrap();

  let planned = ops::visitors::planned_visits(&s, &visitor_actor, visitor_actor.user_id)
    .await
    .unwrap();
  assert_eq!(planned.len(), 1);
  assert_eq!(planned[0].animal_id, animal.animal_id);
}

// ─── NotFound / Forbidden ordering ───────────────────────────────────────────

#[tokio::test]
async fn missing_targets_are_not_found_not_forbidden() {
  let s = store().await;
  let stranger = register(&s, "nobody").await;

  let err = ops::animals::get(&s, &actor_of(&stranger), Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AnimalNotFound(_)));

  let err = ops::shelters::get(&s, &actor_of(&stranger), Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ShelterNotFound(_)));
}

#[tokio::test]
async fn denied_edits_leave_the_record_untouched() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let (other_owner, _) = authorized_shelter(&s, &a, "petros").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  // A shelter-role actor that owns a different shelter has no access path.
  let err = ops::animals::update(
    &s,
    &other_owner,
    animal.animal_id,
    animal_details("Stolen", Status::Pending),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let unchanged = s.get_animal(animal.animal_id).await.unwrap().unwrap();
  assert_eq!(unchanged.name, "Rex");
  assert_eq!(unchanged.status, Status::Available);
}

#[tokio::test]
async fn second_visitor_cannot_flip_anothers_request() {
  let s = store().await;
  let a = admin(&s).await;
  let (owner, _) = authorized_shelter(&s, &a, "maria").await;
  let (first_visitor, first) = visitor_user(&s, "ada", "5550100").await;
  let (second_visitor, _) = visitor_user(&s, "leo", "5550101").await;
  let animal = ops::animals::create(&s, &owner, animal_details("Rex", Status::Available))
    .await
    .unwrap();

  ops::animals::toggle_visit_request(&s, &first_visitor, animal.animal_id)
    .await
    .unwrap();
  let err = ops::animals::toggle_visit_request(&s, &second_visitor, animal.animal_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));

  let unchanged = s.get_animal(animal.animal_id).await.unwrap().unwrap();
  assert_eq!(unchanged.planned_visitor_id, Some(first.visitor_id));
  assert_eq!(crate::visit::visit_state(&unchanged).unwrap(), VisitState::Requested);
}
