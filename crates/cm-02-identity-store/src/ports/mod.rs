//! Ports of the Identity Record Store.

pub mod outbound;

pub use outbound::*;
