//! Outbound ports used by the chat session.
//!
//! The session talks to three collaborators through these traits:
//! - `Transport` / `Connector`: the auto-reconnecting socket
//! - `Store`: the unidirectional state container
//! - `Outbound`: anything that can put a `ClientMessage` on the wire
//!
//! Each trait is mockable under `cfg(test)` or the `testing` feature.

pub mod chat_actions;
pub mod outbound_port;
pub mod store_port;
pub mod transport_port;

pub use chat_actions::ChatAction;
pub use outbound_port::Outbound;
pub use store_port::Store;
pub use transport_port::{Connector, MessageHandler, OpenHandler, Transport, TransportError};

#[cfg(any(test, feature = "testing"))]
pub use outbound_port::MockOutbound;
#[cfg(any(test, feature = "testing"))]
pub use store_port::MockStore;
#[cfg(any(test, feature = "testing"))]
pub use transport_port::{MockConnector, MockTransport};
