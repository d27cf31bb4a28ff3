//! Translates inbound wire frames into local [`ChatAction`]s
//!
//! This is the only place that knows both vocabularies. The wire protocol
//! (`chatline_shared::ServerMessage`) and the store's actions can evolve
//! independently as long as this table is kept in step.
//!
//! Frames with unrecognized tags are forwarded as `ChatAction::Passthrough`
//! carrying the exact JSON value received.

use chatline_shared::{InboundFrame, ServerMessage};

use crate::ports::outbound::ChatAction;

/// Translate a decoded frame into a ChatAction
pub fn translate(frame: InboundFrame) -> ChatAction {
    match frame {
        InboundFrame::Known(msg) => translate_known(msg),
        InboundFrame::Unrecognized { raw, .. } => ChatAction::Passthrough(raw),
    }
}

fn translate_known(msg: ServerMessage) -> ChatAction {
    match msg {
        ServerMessage::LoginSuccess { user } => ChatAction::LoginSucceeded { user },
        ServerMessage::ReceiveRooms { rooms } => ChatAction::RoomsReceived { rooms },
        ServerMessage::ReceiveMessages { messages } => ChatAction::MessagesReceived { messages },
    }
}
