//! Local state-update vocabulary.
//!
//! These are the actions the store understands. They are deliberately separate
//! from the wire types in `chatline_shared`; `message_translator` maps between
//! the two.

use chatline_shared::{MessageData, RoomData};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// The local user asked to log in as `user`
    LoginRequested { user: String },
    /// The server confirmed the login
    LoginSucceeded { user: String },
    RoomsReceived { rooms: Vec<RoomData> },
    RoomSelected { room_id: u64 },
    MessagesReceived { messages: Vec<MessageData> },
    /// An inbound frame with no local meaning, forwarded as received
    Passthrough(Value),
}

impl ChatAction {
    pub fn name(&self) -> &'static str {
        match self {
            ChatAction::LoginRequested { .. } => "LoginRequested",
            ChatAction::LoginSucceeded { .. } => "LoginSucceeded",
            ChatAction::RoomsReceived { .. } => "RoomsReceived",
            ChatAction::RoomSelected { .. } => "RoomSelected",
            ChatAction::MessagesReceived { .. } => "MessagesReceived",
            ChatAction::Passthrough(_) => "Passthrough",
        }
    }
}
