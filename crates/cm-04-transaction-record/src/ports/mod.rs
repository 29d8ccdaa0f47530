//! Ports of the transaction record.

pub mod outbound;

pub use outbound::SignerKeyDirectory;
