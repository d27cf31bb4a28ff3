//! Reducer-backed store.
//!
//! Push-based: subscribers register callbacks that are invoked after every
//! dispatch with the action and the resulting state.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::ports::outbound::{ChatAction, Store};
use crate::state::{reduce, ChatState};

type Subscriber = Arc<dyn Fn(&ChatAction, &ChatState) + Send + Sync + 'static>;

#[derive(Default)]
struct StoreInner {
    state: RwLock<ChatState>,
    subscribers: Mutex<Vec<Subscriber>>,
}

/// Thread-safe chat store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct ChatStore {
    inner: Arc<StoreInner>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, e.g. one restored after a restart.
    pub fn with_state(state: ChatState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Subscribe to every applied action.
    ///
    /// Callbacks run on the dispatching thread after the state lock has been
    /// released, so they may read the store or dispatch again.
    pub fn subscribe(&self, callback: impl Fn(&ChatAction, &ChatState) + Send + Sync + 'static) {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Store for ChatStore {
    fn state(&self) -> ChatState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, action: ChatAction) {
        let snapshot = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            reduce(&mut state, &action);
            state.clone()
        };
        tracing::debug!(action = action.name(), "Dispatched");

        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in subscribers {
            subscriber(&action, &snapshot);
        }
    }
}

impl std::fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStore")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn dispatch_is_visible_immediately() {
        let store = ChatStore::new();
        store.dispatch(ChatAction::RoomSelected { room_id: 4 });
        assert_eq!(store.state().current_room_id, Some(4));
    }

    #[test]
    fn subscribers_see_post_dispatch_state() {
        let store = ChatStore::new();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        store.subscribe(move |action, state| {
            assert!(matches!(action, ChatAction::RoomSelected { room_id: 2 }));
            assert_eq!(state.current_room_id, Some(2));
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(store.subscriber_count(), 1);
        store.dispatch(ChatAction::RoomSelected { room_id: 2 });
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriber_may_dispatch_again() {
        let store = ChatStore::new();
        let inner = store.clone();
        store.subscribe(move |action, _state| {
            if let ChatAction::LoginSucceeded { .. } = action {
                inner.dispatch(ChatAction::RoomSelected { room_id: 1 });
            }
        });

        store.dispatch(ChatAction::LoginSucceeded {
            user: "bob".to_string(),
        });

        let state = store.state();
        assert_eq!(state.current_user.as_deref(), Some("bob"));
        assert_eq!(state.current_room_id, Some(1));
    }

    #[test]
    fn with_state_starts_from_given_snapshot() {
        let store = ChatStore::with_state(ChatState {
            current_user: Some("carol".to_string()),
            ..Default::default()
        });
        assert_eq!(store.state().current_user.as_deref(), Some("carol"));
    }
}
