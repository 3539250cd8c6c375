//! SQLite backend for the Homeward entity store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. `apply` batches run inside a
//! single transaction, which is what gives the workflow its cascade
//! atomicity.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
