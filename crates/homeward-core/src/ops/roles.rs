//! Role seeding — an explicit, idempotent initialisation step.
//!
//! Invoked once at startup before any policy or workflow operation runs;
//! safe to call again on every boot.

use crate::{
  error::{Error, Result},
  role::Role,
  store::EntityStore,
};

/// Insert every structural role, skipping the ones already present.
pub async fn seed<S: EntityStore>(store: &S) -> Result<()> {
  for role in Role::ALL {
    store.insert_role(role).await.map_err(Error::store)?;
  }
  tracing::debug!("roles seeded");
  Ok(())
}
