//! WebSocket message types for client-server chat communication
//!
//! Frames are JSON objects tagged with a `type` field in SCREAMING_SNAKE_CASE.
//! Payload fields use camelCase to match the server.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown inbound tags are never rejected; see [`crate::frame::InboundFrame`]

use serde::{Deserialize, Serialize};

// =============================================================================
// Shared records
// =============================================================================

/// A chat room as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomData {
    pub id: u64,
    /// Display name relative to the logged-in user (the other participant).
    #[serde(default)]
    pub name: String,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub id: u64,
    pub room_id: u64,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub user: String,
}

// =============================================================================
// Client Messages (Client → Server)
// =============================================================================

/// Messages from the client to the chat server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Bind this connection to a user. The server answers with `LOGIN_SUCCESS`
    /// followed by `RECEIVE_ROOMS`.
    Login { user: String },

    /// Post a message into a room
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: u64, content: String },

    /// Ask for message history. Every filter is optional and absent filters
    /// are omitted from the frame.
    #[serde(rename_all = "camelCase")]
    RequestMessages {
        /// Messages at or after this message
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_message_id: Option<u64>,
        /// Messages at or before this message (history paging)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        first_message_id: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
    },
}

impl ClientMessage {
    /// Wire tag of this message, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            ClientMessage::Login { .. } => "LOGIN",
            ClientMessage::SendMessage { .. } => "SEND_MESSAGE",
            ClientMessage::RequestMessages { .. } => "REQUEST_MESSAGES",
        }
    }

    /// Catch-up request sent after a reconnect.
    pub fn request_messages_since(last_message_id: u64, user: impl Into<String>) -> Self {
        ClientMessage::RequestMessages {
            last_message_id: Some(last_message_id),
            first_message_id: None,
            room_id: None,
            user: Some(user.into()),
        }
    }
}

// =============================================================================
// Server Messages (Server → Client)
// =============================================================================

/// Messages from the chat server that the client understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Echo of a successful `LOGIN`
    LoginSuccess { user: String },
    /// The rooms visible to the logged-in user, in server order
    ReceiveRooms { rooms: Vec<RoomData> },
    /// A batch of messages, ascending by timestamp
    ReceiveMessages { messages: Vec<MessageData> },
}

impl ServerMessage {
    /// Tags that decode into a `ServerMessage` variant.
    pub const TAGS: &'static [&'static str] =
        &["LOGIN_SUCCESS", "RECEIVE_ROOMS", "RECEIVE_MESSAGES"];

    pub fn is_known_tag(tag: &str) -> bool {
        Self::TAGS.contains(&tag)
    }
}

#[cfg(test)]
mod serde_tests {
    use super::{ClientMessage, MessageData, RoomData, ServerMessage};
    use serde_json::json;

    #[test]
    fn request_messages_since_omits_absent_filters() {
        let msg = ClientMessage::request_messages_since(7, "bob");

        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({ "type": "REQUEST_MESSAGES", "lastMessageId": 7, "user": "bob" })
        );
    }

    #[test]
    fn send_message_uses_camel_case_fields() {
        let msg = ClientMessage::SendMessage {
            room_id: 3,
            content: "hello world".to_string(),
        };

        let value = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            value,
            json!({ "type": "SEND_MESSAGE", "roomId": 3, "content": "hello world" })
        );
    }

    #[test]
    fn receive_messages_decodes_server_payload() {
        let text = r#"{
            "type": "RECEIVE_MESSAGES",
            "messages": [
                {"id": 12, "roomId": 2, "content": "hi", "timestamp": 1468461958836, "user": "alice"}
            ]
        }"#;

        let msg: ServerMessage = serde_json::from_str(text).expect("deserialize");
        assert_eq!(
            msg,
            ServerMessage::ReceiveMessages {
                messages: vec![MessageData {
                    id: 12,
                    room_id: 2,
                    content: "hi".to_string(),
                    timestamp: 1_468_461_958_836,
                    user: "alice".to_string(),
                }]
            }
        );
    }

    #[test]
    fn room_without_name_defaults_to_empty() {
        let room: RoomData = serde_json::from_str(r#"{"id": 4}"#).expect("deserialize");
        assert_eq!(room.id, 4);
        assert!(room.name.is_empty());
    }

    #[test]
    fn known_tags_match_variants() {
        assert!(ServerMessage::is_known_tag("RECEIVE_ROOMS"));
        assert!(ServerMessage::is_known_tag("LOGIN_SUCCESS"));
        assert!(!ServerMessage::is_known_tag("USER_TYPING"));
        assert_eq!(ClientMessage::request_messages_since(0, "x").tag(), "REQUEST_MESSAGES");
    }
}
