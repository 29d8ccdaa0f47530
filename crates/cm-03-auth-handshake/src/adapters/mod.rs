//! Adapters: the store-backed directory and the frame channel.

pub mod directory;
pub mod framing;

pub use framing::{FramedChannel, MAX_FRAME_LEN};
