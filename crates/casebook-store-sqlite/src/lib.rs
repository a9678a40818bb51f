//! SQLite backend for the Casebook case register.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Connection changes and assignments run
//! inside `IMMEDIATE` transactions and replay the `casebook-core` state
//! machine on the freshly read row.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
