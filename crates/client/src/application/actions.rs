//! Action creators.
//!
//! Each creator returns a [`Thunk`]: a deferred effect that, when run against a
//! store and an outbound channel, dispatches local actions and/or sends frames.

use chatline_shared::{ClientMessage, RoomData};

use crate::application::error::SessionError;
use crate::ports::outbound::{ChatAction, Outbound, Store};

pub type Thunk =
    Box<dyn FnOnce(&dyn Store, &dyn Outbound) -> Result<(), SessionError> + Send + 'static>;

/// Record the identity locally and bind the connection to it server-side.
pub fn login_user(user: &str) -> Thunk {
    let user = user.to_owned();
    Box::new(move |store, outbound| {
        store.dispatch(ChatAction::LoginRequested { user: user.clone() });
        outbound.send_message(&ClientMessage::Login { user })
    })
}

/// Open a room and load its recent history.
pub fn select_room(room: &RoomData) -> Thunk {
    let room_id = room.id;
    Box::new(move |store, outbound| {
        store.dispatch(ChatAction::RoomSelected { room_id });
        outbound.send_message(&ClientMessage::RequestMessages {
            last_message_id: None,
            first_message_id: None,
            room_id: Some(room_id),
            user: None,
        })
    })
}

/// Post a message. Nothing is dispatched; the server broadcasts it back.
pub fn send_chat_message(room_id: u64, content: &str) -> Thunk {
    let content = content.to_owned();
    Box::new(move |_store, outbound| {
        outbound.send_message(&ClientMessage::SendMessage { room_id, content })
    })
}

/// Page history backwards from the oldest message held for `room_id`.
pub fn request_older_messages(room_id: u64, first_message_id: u64) -> Thunk {
    Box::new(move |_store, outbound| {
        outbound.send_message(&ClientMessage::RequestMessages {
            last_message_id: None,
            first_message_id: Some(first_message_id),
            room_id: Some(room_id),
            user: None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{MockOutbound, MockStore, TransportError};
    use mockall::predicate::eq;

    #[test]
    fn login_dispatches_then_sends() {
        let mut store = MockStore::new();
        store
            .expect_dispatch()
            .with(eq(ChatAction::LoginRequested {
                user: "bob".to_string(),
            }))
            .times(1)
            .return_const(());

        let mut outbound = MockOutbound::new();
        outbound
            .expect_send_message()
            .withf(|msg| {
                *msg == ClientMessage::Login {
                    user: "bob".to_string(),
                }
            })
            .times(1)
            .returning(|_| Ok(()));

        login_user("bob")(&store, &outbound).unwrap();
    }

    #[test]
    fn select_room_requests_that_rooms_history() {
        let mut store = MockStore::new();
        store
            .expect_dispatch()
            .with(eq(ChatAction::RoomSelected { room_id: 8 }))
            .times(1)
            .return_const(());

        let mut outbound = MockOutbound::new();
        outbound
            .expect_send_message()
            .withf(|msg| {
                matches!(
                    msg,
                    ClientMessage::RequestMessages {
                        room_id: Some(8),
                        last_message_id: None,
                        first_message_id: None,
                        user: None,
                    }
                )
            })
            .times(1)
            .returning(|_| Ok(()));

        let room = RoomData {
            id: 8,
            name: "alice".to_string(),
        };
        select_room(&room)(&store, &outbound).unwrap();
    }

    #[test]
    fn send_chat_message_only_sends() {
        let store = MockStore::new();
        let mut outbound = MockOutbound::new();
        outbound
            .expect_send_message()
            .withf(|msg| {
                *msg == ClientMessage::SendMessage {
                    room_id: 2,
                    content: "hi".to_string(),
                }
            })
            .times(1)
            .returning(|_| Ok(()));

        send_chat_message(2, "hi")(&store, &outbound).unwrap();
    }

    #[test]
    fn send_failure_is_returned_to_the_caller() {
        let store = MockStore::new();
        let mut outbound = MockOutbound::new();
        outbound
            .expect_send_message()
            .returning(|_| Err(SessionError::Transport(TransportError::NotOpen)));

        let err = request_older_messages(2, 40)(&store, &outbound).unwrap_err();
        assert!(err.is_transient());
    }
}
