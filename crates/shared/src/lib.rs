//! Chatline Shared - wire types for the chat server connection
//!
//! This crate contains the types exchanged over the `/chat` WebSocket:
//! - Outbound frames (`ClientMessage`)
//! - Inbound frames (`ServerMessage`) plus the raw pass-through form
//! - Frame decoding with an explicit error type
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, thiserror and tracing
//! 2. **No client state** - Pure data types and serialization
//! 3. **Tagged frames** - Every frame is a JSON object with a `type` discriminator

pub mod frame;
pub mod messages;

pub use frame::{decode_frame, DecodeError, InboundFrame};
pub use messages::{ClientMessage, MessageData, RoomData, ServerMessage};
