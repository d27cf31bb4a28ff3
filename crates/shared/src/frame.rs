//! Inbound frame decoding.
//!
//! A frame is accepted as long as it is a JSON object with a string `type`.
//! Known tags are decoded into [`ServerMessage`]; everything else is kept as the
//! raw JSON value so the caller can forward it untouched.

use serde_json::Value;

use crate::messages::ServerMessage;

/// One decoded inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Known(ServerMessage),
    /// A frame whose tag this crate has no variant for.
    Unrecognized { tag: String, raw: Value },
}

impl InboundFrame {
    pub fn tag(&self) -> &str {
        match self {
            InboundFrame::Known(ServerMessage::LoginSuccess { .. }) => "LOGIN_SUCCESS",
            InboundFrame::Known(ServerMessage::ReceiveRooms { .. }) => "RECEIVE_ROOMS",
            InboundFrame::Known(ServerMessage::ReceiveMessages { .. }) => "RECEIVE_MESSAGES",
            InboundFrame::Unrecognized { tag, .. } => tag,
        }
    }
}

/// Errors produced while decoding an inbound frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("frame has no string `type` tag")]
    MissingTag,

    #[error("frame tagged {tag} has invalid fields: {source}")]
    Malformed {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one inbound text frame.
pub fn decode_frame(text: &str) -> Result<InboundFrame, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Json)?;

    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingTag)?
        .to_owned();

    if !ServerMessage::is_known_tag(&tag) {
        tracing::trace!(tag = %tag, "Passing through unrecognized frame");
        return Ok(InboundFrame::Unrecognized { tag, raw: value });
    }

    serde_json::from_value(value)
        .map(InboundFrame::Known)
        .map_err(|source| DecodeError::Malformed { tag, source })
}
