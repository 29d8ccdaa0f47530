//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the handshake and transaction validation call

pub mod inbound;
