//! # Domain Layer
//!
//! Records, line formats, layout and errors. No I/O happens here.

pub mod codec;
pub mod config;
pub mod entities;
pub mod errors;

pub use codec::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
