//! Error types for the chat relay
//!
//! Defines connection-level errors and event send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::codec::CodecError;

/// Connection-level errors
///
/// All of these are fatal for the session they occur on, and only for that
/// session: the listener and the relay actor keep running.
#[derive(Debug, Error)]
pub enum AppError {
    /// Line framing or I/O failure on the client's stream (the codec wraps
    /// the underlying `std::io::Error`)
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Relay actor channel is gone (server shutting down)
    #[error("relay channel closed")]
    ChannelSend,
}

/// Event send errors
///
/// Occurs when attempting to push an event to a disconnected session.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("channel closed")]
    ChannelClosed,
}
