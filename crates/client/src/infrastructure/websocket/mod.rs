//! WebSocket transport for the chat server connection
//!
//! - `core`: runtime-agnostic reconnection backoff math
//! - `protocol`: connection state shared with observers
//! - `client`: tokio-tungstenite reconnecting socket and its connector

mod client;
mod core;
mod protocol;

pub use client::{ReconnectingSocket, TungsteniteConnector};
pub use self::core::{BackoffPolicy, BackoffState};
pub use protocol::ConnectionState;
