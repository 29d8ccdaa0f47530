//! Adapters for the transaction record.

pub mod directory;
