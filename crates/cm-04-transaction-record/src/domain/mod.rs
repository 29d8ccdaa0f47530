//! Domain layer of the transaction record.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
