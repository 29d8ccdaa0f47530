//! # Frame Channel
//!
//! `[len: u32 BE][bincode(HandshakeMessage)]` over any async byte stream.
//! Frames above [`MAX_FRAME_LEN`] are refused in both directions before any
//! payload is buffered.

use crate::domain::errors::HandshakeError;
use crate::domain::messages::HandshakeMessage;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted frame payload (64 KiB).
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Framed message channel over `S`.
#[derive(Debug)]
pub struct FramedChannel<S> {
    stream: S,
    read_timeout: Option<Duration>,
}

impl<S> FramedChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, read_timeout: Option<Duration>) -> Self {
        Self {
            stream,
            read_timeout,
        }
    }

    /// Give the stream back.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Encode and write one frame.
    pub async fn send(&mut self, message: &HandshakeMessage) -> Result<(), HandshakeError> {
        let payload =
            bincode::serialize(message).map_err(|e| HandshakeError::Protocol(e.to_string()))?;
        if payload.len() > MAX_FRAME_LEN {
            return Err(HandshakeError::Protocol(format!(
                "outgoing {} frame of {} bytes exceeds {}",
                message.kind(),
                payload.len(),
                MAX_FRAME_LEN
            )));
        }

        self.stream.write_u32(payload.len() as u32).await?;
        self.stream.write_all(&payload).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Read one frame, honouring the read timeout.
    pub async fn recv(&mut self) -> Result<HandshakeMessage, HandshakeError> {
        match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_frame())
                .await
                .map_err(|_| HandshakeError::Timeout)?,
            None => self.read_frame().await,
        }
    }

    async fn read_frame(&mut self) -> Result<HandshakeMessage, HandshakeError> {
        let len = self.stream.read_u32().await? as usize;
        if len > MAX_FRAME_LEN {
            return Err(HandshakeError::Protocol(format!(
                "incoming frame of {} bytes exceeds {}",
                len, MAX_FRAME_LEN
            )));
        }

        let mut payload = vec![0u8; len];
        self.stream.read_exact(&mut payload).await?;
        bincode::deserialize(&payload).map_err(|e| HandshakeError::Protocol(e.to_string()))
    }
}
