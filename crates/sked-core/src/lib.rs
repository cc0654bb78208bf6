//! Core types and trait definitions for the sked schedule manager.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! The storage backend, the exporter and the binary all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod draft;
pub mod entry;
pub mod error;
pub mod reminder;
pub mod store;

pub use error::{Error, Result};
