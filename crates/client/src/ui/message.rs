//! Message rendering.
//!
//! Turns a message's fields into display text: `"<user>:"` for the author and
//! a long-form timestamp such as `September 16th, 11:40 AM`.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset};

const INVALID_DATE: &str = "Invalid date";

/// Display-ready pieces of a single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub user: String,
    pub timestamp: String,
    pub content: String,
}

impl fmt::Display for MessageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.timestamp, self.user, self.content)
    }
}

/// Render one message. `timestamp_ms` is milliseconds since the Unix epoch,
/// shown in `offset`.
pub fn render_message(
    user: &str,
    content: &str,
    timestamp_ms: i64,
    offset: FixedOffset,
) -> MessageView {
    MessageView {
        user: format!("{user}:"),
        timestamp: format_timestamp(timestamp_ms, offset),
        content: content.to_owned(),
    }
}

/// `MMMM Do, h:mm A`, e.g. `September 16th, 11:40 AM`.
pub fn format_timestamp(timestamp_ms: i64, offset: FixedOffset) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(timestamp_ms) else {
        return INVALID_DATE.to_string();
    };
    let local = utc.with_timezone(&offset);
    let day = local.day();
    format!(
        "{} {}{}, {}",
        local.format("%B"),
        day,
        ordinal_suffix(day),
        local.format("%-I:%M %p")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
