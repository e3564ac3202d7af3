//! Core types and trait definitions for the Neko cat profile store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod cat;
pub mod error;
pub mod poop_log;
pub mod store;

pub use error::{Error, Result};
