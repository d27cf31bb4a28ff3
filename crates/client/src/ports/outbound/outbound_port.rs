use chatline_shared::ClientMessage;

use crate::application::error::SessionError;

/// Anything that can serialize a `ClientMessage` onto the live connection.
///
/// Action creators depend on this rather than on `ChatSession` so they can be
/// exercised against a mock.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Outbound: Send + Sync {
    fn send_message(&self, message: &ClientMessage) -> Result<(), SessionError>;
}
