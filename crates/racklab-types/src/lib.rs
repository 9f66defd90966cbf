//! Foundation types for the racklab training engine.
//!
//! This crate contains the shared error type used by all racklab crates.
//! It has no engine logic of its own.

pub mod error;

pub use error::{RacklabError, Result};
