//! Pure state transitions for [`ChatAction`]s.

use std::collections::HashSet;

use chatline_shared::{MessageData, RoomData};

use crate::ports::outbound::ChatAction;
use crate::state::ChatState;

/// Apply one action to the state in place.
pub fn reduce(state: &mut ChatState, action: &ChatAction) {
    match action {
        ChatAction::LoginRequested { user } | ChatAction::LoginSucceeded { user } => {
            state.current_user = Some(user.clone());
        }
        ChatAction::RoomsReceived { rooms } => merge_rooms(&mut state.rooms, rooms),
        ChatAction::RoomSelected { room_id } => state.current_room_id = Some(*room_id),
        ChatAction::MessagesReceived { messages } => merge_messages(&mut state.messages, messages),
        ChatAction::Passthrough(_) => {}
    }
}

/// Update known rooms in place and append new ones in server order.
fn merge_rooms(known: &mut Vec<RoomData>, incoming: &[RoomData]) {
    for room in incoming {
        match known.iter_mut().find(|r| r.id == room.id) {
            Some(existing) => *existing = room.clone(),
            None => known.push(room.clone()),
        }
    }
}

/// Messages can arrive twice (a catch-up request overlaps what was already
/// broadcast), so dedupe by id before re-sorting.
fn merge_messages(known: &mut Vec<MessageData>, incoming: &[MessageData]) {
    let mut seen: HashSet<u64> = known.iter().map(|m| m.id).collect();
    for message in incoming {
        if seen.insert(message.id) {
            known.push(message.clone());
        }
    }
    known.sort_by_key(|m| (m.timestamp, m.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(id: u64, timestamp: i64) -> MessageData {
        MessageData {
            id,
            room_id: 1,
            content: format!("m{id}"),
            timestamp,
            user: "alice".to_string(),
        }
    }

    fn room(id: u64, name: &str) -> RoomData {
        RoomData {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn login_sets_current_user() {
        let mut state = ChatState::default();
        reduce(
            &mut state,
            &ChatAction::LoginRequested {
                user: "bob".to_string(),
            },
        );
        assert_eq!(state.current_user.as_deref(), Some("bob"));
    }

    #[test]
    fn rooms_merge_by_id_and_keep_first_seen_order() {
        let mut state = ChatState::default();
        reduce(
            &mut state,
            &ChatAction::RoomsReceived {
                rooms: vec![room(2, "alice"), room(1, "carol")],
            },
        );
        reduce(
            &mut state,
            &ChatAction::RoomsReceived {
                rooms: vec![room(3, "dave"), room(1, "carol (renamed)")],
            },
        );

        assert_eq!(
            state.rooms,
            vec![room(2, "alice"), room(1, "carol (renamed)"), room(3, "dave")]
        );
    }

    #[test]
    fn messages_dedupe_and_sort_by_timestamp_then_id() {
        let mut state = ChatState::default();
        reduce(
            &mut state,
            &ChatAction::MessagesReceived {
                messages: vec![message(5, 300), message(2, 100)],
            },
        );
        reduce(
            &mut state,
            &ChatAction::MessagesReceived {
                messages: vec![message(5, 300), message(4, 100), message(9, 200)],
            },
        );

        let ids: Vec<u64> = state.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4, 9, 5]);
    }

    #[test]
    fn passthrough_leaves_state_untouched() {
        let mut state = ChatState {
            current_room_id: Some(1),
            ..Default::default()
        };
        let before = state.clone();
        reduce(&mut state, &ChatAction::Passthrough(json!({"type": "PING"})));
        assert_eq!(state, before);
    }
}
