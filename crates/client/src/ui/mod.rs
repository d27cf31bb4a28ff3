//! Terminal presentation: message rendering and line commands.

pub mod message;
pub mod terminal;

pub use message::{format_timestamp, render_message, MessageView};
pub use terminal::{parse_command, render_update, room_list, thunk_for, Command, CommandError};
