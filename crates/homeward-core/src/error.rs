//! Error types for `homeward-core`.
//!
//! The variants follow the failure taxonomy of the workflow: missing
//! entities, policy denials, meaningless transitions, and invariant
//! violations observed at read time. NotFound and Forbidden always abort an
//! operation before any store write.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("shelter not found: {0}")]
  ShelterNotFound(Uuid),

  #[error("vet not found: {0}")]
  VetNotFound(Uuid),

  #[error("visitor not found: {0}")]
  VisitorNotFound(Uuid),

  #[error("animal not found: {0}")]
  AnimalNotFound(Uuid),

  #[error("role not found: {0:?}")]
  RoleNotFound(String),

  /// The target user has never created the profile the operation acts on.
  #[error("user {0} has not created this profile yet")]
  ProfileMissing(Uuid),

  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  /// The target's current state makes the requested transition meaningless.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// A stored record violates a protocol invariant. Reported, never masked.
  #[error("data integrity: {0}")]
  DataIntegrity(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error from an [`crate::store::EntityStore`] impl.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Whether this error is one of the not-found conditions.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::UserNotFound(_)
        | Self::ShelterNotFound(_)
        | Self::VetNotFound(_)
        | Self::VisitorNotFound(_)
        | Self::AnimalNotFound(_)
        | Self::RoleNotFound(_)
        | Self::ProfileMissing(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
