//! # Market Runtime Library
//!
//! Configuration and server loop behind the `market-runtime` binary,
//! exposed for integration tests.

pub mod container;
pub mod server;

pub use container::{ConfigError, RuntimeConfig};
pub use server::MarketRuntime;
