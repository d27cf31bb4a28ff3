//! Transport Port - the auto-reconnecting socket collaborator
//!
//! A transport owns its own retry policy. The session only reacts to the two
//! signals it exposes: "frame received" and "connection opened", the latter
//! firing again after every successful reconnect.

use std::sync::Arc;

use url::Url;

/// Handler for one inbound text frame
pub type MessageHandler = Box<dyn Fn(String) + Send + Sync + 'static>;

/// Handler for a (re)opened connection
pub type OpenHandler = Box<dyn Fn() + Send + Sync + 'static>;

/// Errors surfaced by a transport when writing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The socket is between connections (dialing or backing off)
    #[error("socket is not open")]
    NotOpen,
    /// The socket was closed and will not reconnect
    #[error("socket is closed")]
    Closed,
}

/// One logical, auto-reconnecting connection.
///
/// Handlers are invoked one at a time, never concurrently with each other.
/// Setting a handler replaces the previous one.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Transport: Send + Sync {
    fn set_on_message(&self, handler: MessageHandler);

    fn set_on_open(&self, handler: OpenHandler);

    /// Write one text frame to the current connection
    fn send(&self, text: String) -> Result<(), TransportError>;

    /// Stop reconnecting and drop the connection
    fn close(&self);
}

/// Opens transports. One call yields one logical connection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Connector: Send + Sync {
    fn open(&self, url: &Url) -> Arc<dyn Transport>;
}
