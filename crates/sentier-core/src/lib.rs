//! # Sentier Core
//!
//! Shared building blocks for the Sentier crates. At the moment this is the
//! error taxonomy used by routing, dispatch and pagination.

pub mod exception;

pub use exception::{Error, Result};
