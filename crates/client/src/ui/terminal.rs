//! Line-oriented terminal commands.

use chrono::FixedOffset;
use thiserror::Error;

use crate::application::actions::{self, Thunk};
use crate::ports::outbound::ChatAction;
use crate::state::ChatState;
use crate::ui::message::render_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text; post it to the current room
    Say(String),
    /// `/login <user>`
    Login(String),
    /// `/room <id>`
    SelectRoom(u64),
    /// `/older`
    Older,
    /// `/rooms`
    Rooms,
    /// `/quit`
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '/{0}'")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a room id")]
    InvalidRoomId(String),
    #[error("no room {0}; try /rooms")]
    UnknownRoom(u64),
    #[error("no room selected")]
    NoRoomSelected,
    #[error("no messages loaded for this room yet")]
    NoHistory,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name {
        "login" if arg.is_empty() => return Err(CommandError::MissingArgument("login")),
        "login" => Command::Login(arg.to_string()),
        "room" if arg.is_empty() => return Err(CommandError::MissingArgument("room")),
        "room" => Command::SelectRoom(
            arg.parse()
                .map_err(|_| CommandError::InvalidRoomId(arg.to_string()))?,
        ),
        "older" => Command::Older,
        "rooms" => Command::Rooms,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// The side effect a command runs against the session, if any.
///
/// `/rooms` and `/quit` are handled by the caller and yield `None`.
pub fn thunk_for(command: &Command, state: &ChatState) -> Result<Option<Thunk>, CommandError> {
    let thunk = match command {
        Command::Say(text) => {
            let room_id = state.current_room_id.ok_or(CommandError::NoRoomSelected)?;
            actions::send_chat_message(room_id, text)
        }
        Command::Login(user) => actions::login_user(user),
        Command::SelectRoom(room_id) => {
            let room = state
                .room(*room_id)
                .ok_or(CommandError::UnknownRoom(*room_id))?;
            actions::select_room(room)
        }
        Command::Older => {
            let room_id = state.current_room_id.ok_or(CommandError::NoRoomSelected)?;
            let first = state
                .first_message_id_in(room_id)
                .ok_or(CommandError::NoHistory)?;
            actions::request_older_messages(room_id, first)
        }
        Command::Rooms | Command::Quit => return Ok(None),
    };
    Ok(Some(thunk))
}

/// One line per known room; the open room is marked with `*`.
pub fn room_list(state: &ChatState) -> Vec<String> {
    state
        .rooms
        .iter()
        .map(|room| {
            let marker = if state.current_room_id == Some(room.id) {
                '*'
            } else {
                ' '
            };
            format!("{marker} {:>4}  {}", room.id, room.name)
        })
        .collect()
}

/// Lines to print after `action` has been applied to `state`.
pub fn render_update(action: &ChatAction, state: &ChatState, offset: FixedOffset) -> Vec<String> {
    match action {
        ChatAction::LoginSucceeded { user } => vec![format!("-- logged in as {user}")],
        ChatAction::RoomsReceived { .. } => {
            let mut lines = vec!["-- rooms".to_string()];
            lines.extend(room_list(state));
            lines
        }
        ChatAction::RoomSelected { room_id } => {
            let name = state.current_room().map_or("?", |r| r.name.as_str());
            vec![format!("-- now in #{name} ({room_id})")]
        }
        ChatAction::MessagesReceived { messages } => {
            let Some(room_id) = state.current_room_id else {
                return Vec::new();
            };
            messages
                .iter()
                .filter(|m| m.room_id == room_id)
                .map(|m| render_message(&m.user, &m.content, m.timestamp, offset).to_string())
                .collect()
        }
        ChatAction::LoginRequested { .. } | ChatAction::Passthrough(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SessionError;
    use crate::ports::outbound::{MockOutbound, MockStore};
    use chatline_shared::{ClientMessage, MessageData, RoomData};

    fn state() -> ChatState {
        ChatState {
            current_user: Some("bob".to_string()),
            current_room_id: Some(1),
            rooms: vec![
                RoomData {
                    id: 1,
                    name: "general".to_string(),
                },
                RoomData {
                    id: 2,
                    name: "random".to_string(),
                },
            ],
            messages: vec![MessageData {
                id: 17,
                room_id: 1,
                content: "hi".to_string(),
                timestamp: 0,
                user: "alice".to_string(),
            }],
        }
    }

    fn run(thunk: Thunk) -> Vec<ClientMessage> {
        let sent = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut store = MockStore::new();
        store.expect_dispatch().return_const(());
        let mut outbound = MockOutbound::new();
        let sink = std::sync::Arc::clone(&sent);
        outbound.expect_send_message().returning(move |msg| {
            sink.lock().unwrap().push(msg.clone());
            Ok::<(), SessionError>(())
        });
        thunk(&store, &outbound).unwrap();
        let frames = sent.lock().unwrap().clone();
        frames
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command(" hello there "),
            Ok(Some(Command::Say("hello there".to_string())))
        );
        assert_eq!(parse_command("/room 12"), Ok(Some(Command::SelectRoom(12))));
        assert_eq!(
            parse_command("/login  carol"),
            Ok(Some(Command::Login("carol".to_string())))
        );
        assert_eq!(parse_command("/older"), Ok(Some(Command::Older)));
        assert_eq!(parse_command("/rooms"), Ok(Some(Command::Rooms)));
        assert_eq!(parse_command("/quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(
            parse_command("/room"),
            Err(CommandError::MissingArgument("room"))
        );
        assert_eq!(
            parse_command("/room lobby"),
            Err(CommandError::InvalidRoomId("lobby".to_string()))
        );
        assert_eq!(
            parse_command("/dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn say_posts_to_current_room() {
        let thunk = thunk_for(&Command::Say("yo".to_string()), &state())
            .unwrap()
            .unwrap();
        assert_eq!(
            run(thunk),
            vec![ClientMessage::SendMessage {
                room_id: 1,
                content: "yo".to_string(),
            }]
        );
    }

    #[test]
    fn say_without_room_is_rejected() {
        let state = ChatState {
            current_room_id: None,
            ..state()
        };
        assert!(matches!(
            thunk_for(&Command::Say("yo".to_string()), &state),
            Err(CommandError::NoRoomSelected)
        ));
    }

    #[test]
    fn older_pages_from_first_loaded_message() {
        let thunk = thunk_for(&Command::Older, &state()).unwrap().unwrap();
        assert_eq!(
            run(thunk),
            vec![ClientMessage::RequestMessages {
                last_message_id: None,
                first_message_id: Some(17),
                room_id: Some(1),
                user: None,
            }]
        );
    }

    #[test]
    fn older_without_history_is_rejected() {
        let state = ChatState {
            current_room_id: Some(2),
            ..state()
        };
        assert!(matches!(
            thunk_for(&Command::Older, &state),
            Err(CommandError::NoHistory)
        ));
    }

    #[test]
    fn selecting_unknown_room_is_rejected() {
        assert!(matches!(
            thunk_for(&Command::SelectRoom(99), &state()),
            Err(CommandError::UnknownRoom(99))
        ));
    }

    #[test]
    fn rooms_and_quit_have_no_side_effect() {
        assert!(thunk_for(&Command::Rooms, &state()).unwrap().is_none());
        assert!(thunk_for(&Command::Quit, &state()).unwrap().is_none());
    }

    #[test]
    fn only_messages_for_the_open_room_are_printed() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let action = ChatAction::MessagesReceived {
            messages: vec![
                MessageData {
                    id: 20,
                    room_id: 1,
                    content: "here".to_string(),
                    timestamp: 1_474_026_000_000,
                    user: "alice".to_string(),
                },
                MessageData {
                    id: 21,
                    room_id: 2,
                    content: "elsewhere".to_string(),
                    timestamp: 1_474_026_000_000,
                    user: "alice".to_string(),
                },
            ],
        };

        assert_eq!(
            render_update(&action, &state(), offset),
            vec!["[September 16th, 11:40 AM] alice: here".to_string()]
        );
    }

    #[test]
    fn room_selection_names_the_room() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let selected = ChatState {
            current_room_id: Some(2),
            ..state()
        };
        assert_eq!(
            render_update(&ChatAction::RoomSelected { room_id: 2 }, &selected, offset),
            vec!["-- now in #random (2)".to_string()]
        );
    }

    #[test]
    fn room_list_marks_the_open_room() {
        assert_eq!(
            room_list(&state()),
            vec!["*    1  general".to_string(), "     2  random".to_string()]
        );
    }
}
