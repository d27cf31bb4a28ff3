use chatline_shared::{MessageData, RoomData};

/// Snapshot of everything the chat client knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Identity this client logged in as; `None` until the first login
    pub current_user: Option<String>,
    pub current_room_id: Option<u64>,
    /// Rooms in the order the server first listed them
    pub rooms: Vec<RoomData>,
    /// All known messages across rooms, ascending by `(timestamp, id)`
    pub messages: Vec<MessageData>,
}

impl ChatState {
    /// Highest message id held, or `0` when there are none.
    pub fn last_message_id(&self) -> u64 {
        self.messages.iter().map(|m| m.id).max().unwrap_or(0)
    }

    pub fn room(&self, room_id: u64) -> Option<&RoomData> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn current_room(&self) -> Option<&RoomData> {
        self.current_room_id.and_then(|id| self.room(id))
    }

    pub fn room_messages(&self, room_id: u64) -> impl Iterator<Item = &MessageData> {
        self.messages.iter().filter(move |m| m.room_id == room_id)
    }

    /// Oldest message held for a room, used to page history backwards.
    pub fn first_message_id_in(&self, room_id: u64) -> Option<u64> {
        self.room_messages(room_id).next().map(|m| m.id)
    }
}
