//! Account operations.

use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  actor::Actor,
  error::{Error, Result},
  role::Role,
  store::{Commit, EntityStore},
  user::{NewUser, User},
};

use super::{require_admin, require_admin_or_self, require_user};

/// Create an account holding the base role. The username must be free; the
/// caller has already hashed the password.
pub async fn register<S: EntityStore>(store: &S, new: NewUser) -> Result<User> {
  if store
    .user_by_username(&new.username)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    return Err(Error::InvalidState(format!(
      "username {:?} is already taken",
      new.username
    )));
  }

  // The base role must have been seeded before accounts are created.
  store
    .find_role_by_name(Role::User.name())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::RoleNotFound(Role::User.name().to_owned()))?;

  let user = User {
    user_id:       Uuid::new_v4(),
    username:      new.username,
    email:         new.email,
    password_hash: new.password_hash,
    roles:         BTreeSet::from([Role::User]),
    created_at:    Utc::now(),
  };

  store
    .apply(Commit::new().user(user.clone()))
    .await
    .map_err(Error::store)?;
  tracing::info!(user = %user.user_id, username = %user.username, "account registered");
  Ok(user)
}

/// Fetch an account. Admins may read any; everyone else only their own.
pub async fn get<S: EntityStore>(store: &S, actor: &Actor, user_id: Uuid) -> Result<User> {
  let user = require_user(store, user_id).await?;
  require_admin_or_self(actor, user_id, "view this account")?;
  Ok(user)
}

/// List every account. Admin only.
pub async fn list<S: EntityStore>(store: &S, actor: &Actor) -> Result<Vec<User>> {
  require_admin(actor, "list accounts")?;
  store.list_users().await.map_err(Error::store)
}
