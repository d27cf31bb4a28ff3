//! Store Port - the state container the session reads and dispatches into.

use crate::ports::outbound::ChatAction;
use crate::state::ChatState;

/// Unidirectional state container.
///
/// `dispatch` must apply the action before returning: the session reads
/// `state()` right after dispatching rooms to decide on auto-selection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Store: Send + Sync {
    /// Snapshot of the current state
    fn state(&self) -> ChatState;

    /// Apply an action synchronously
    fn dispatch(&self, action: ChatAction);
}
