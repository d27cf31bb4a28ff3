//! Session error types
//!
//! These errors abstract over transport and protocol failures so callers of
//! `ChatSession` only deal with one type.

use chatline_shared::DecodeError;

use crate::ports::outbound::TransportError;

/// Errors that can occur in session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `send`/`listen` called before `connect` installed a handle
    #[error("not connected: call connect() before sending or listening")]
    NotConnected,

    /// An inbound frame could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An outbound action could not be serialized
    #[error("failed to encode outbound action: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SessionError {
    /// True for errors caused by the connection being down, which clear up on
    /// their own once the transport reconnects.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionError::Transport(TransportError::NotOpen))
    }
}
