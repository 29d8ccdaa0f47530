//! # Shared Types Crate
//!
//! Identifiers and small value types used by every Cellar Market crate.
//!
//! ## Design Principles
//!
//! - **Validated at the edge**: a `UserId` that exists is safe to embed in
//!   catalog lines, credential lines and file names.
//! - **No secrets**: nothing here holds key material.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
