//! # Cellar Market Test Suite
//!
//! Cross-crate scenarios that no single crate can exercise alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── alice_scenario.rs      # register, re-login, foreign key, transactions
//!     ├── registration_race.rs   # concurrent first-contact for one identifier
//!     └── persistence.rs         # restart, tamper, lock
//! tests/benches/
//! └── core_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cm-tests
//! cargo test -p cm-tests integration::registration_race
//! cargo bench -p cm-tests
//! ```

pub mod integration;
