//! Core types and trait definitions for the Casebook case register.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the filing connection state machine and the assignment gate; storage
//! backends replay those rules inside their own transactions.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod error;
pub mod filing;
pub mod id;
pub mod matter;
pub mod party;
pub mod principal;
pub mod store;

pub use error::{Error, Record, Result};
