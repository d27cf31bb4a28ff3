//! Application layer: the chat session adapter and the action creators it
//! runs as side effects.

pub mod actions;
pub mod error;
pub mod session;

pub use actions::Thunk;
pub use error::SessionError;
pub use session::{ChatSession, ReconnectSequencing, UnknownSequencing};
