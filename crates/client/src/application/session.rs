//! Chat session adapter.
//!
//! Owns the single logical connection to the chat server: opening it, wiring
//! its inbound/open signals into a [`Store`], and writing outbound actions.
//! Retry and backoff belong to the transport; this type only reacts to the
//! transport's "opened" signal to re-authenticate after a reconnect.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use chatline_shared::{decode_frame, ClientMessage, RoomData};
use url::Url;

use crate::application::actions;
use crate::application::error::SessionError;
use crate::infrastructure::message_translator;
use crate::infrastructure::page_location::PageLocation;
use crate::ports::outbound::{ChatAction, Connector, Outbound, Store, Transport};

/// How the post-reconnect catch-up request is ordered against the re-login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconnectSequencing {
    /// Send `LOGIN` and `REQUEST_MESSAGES` back to back. The request may reach
    /// the server before the login has been processed.
    #[default]
    Immediate,
    /// Hold `REQUEST_MESSAGES` until the server answers with `LOGIN_SUCCESS`.
    AwaitLoginAck,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reconnect sequencing '{0}' (expected 'immediate' or 'await-login')")]
pub struct UnknownSequencing(pub String);

impl FromStr for ReconnectSequencing {
    type Err = UnknownSequencing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "await-login" | "await_login" | "await-login-ack" => Ok(Self::AwaitLoginAck),
            other => Err(UnknownSequencing(other.to_string())),
        }
    }
}

/// A catch-up request held until the named user's login is acknowledged.
struct DeferredRequest {
    user: String,
    request: ClientMessage,
}

struct SessionInner {
    location: PageLocation,
    connector: Arc<dyn Connector>,
    sequencing: ReconnectSequencing,
    /// The one live transport handle
    handle: RwLock<Option<Arc<dyn Transport>>>,
    /// Catch-up request waiting for `LOGIN_SUCCESS` (AwaitLoginAck only)
    deferred_request: Mutex<Option<DeferredRequest>>,
}

/// One logical chat connection. Cheap to clone; clones share the handle.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

impl ChatSession {
    pub fn new(
        location: PageLocation,
        connector: Arc<dyn Connector>,
        sequencing: ReconnectSequencing,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                location,
                connector,
                sequencing,
                handle: RwLock::new(None),
                deferred_request: Mutex::new(None),
            }),
        }
    }

    /// `ws[s]://<page host>/chat`
    pub fn url(&self) -> &Url {
        self.inner.location.chat_url()
    }

    pub fn sequencing(&self) -> ReconnectSequencing {
        self.inner.sequencing
    }

    pub fn is_connected(&self) -> bool {
        self.read_handle().is_some()
    }

    /// Open a new transport handle, replacing (and closing) any previous one.
    ///
    /// Handlers are bound to a handle, so call [`listen`](Self::listen) again
    /// after reconnecting this way.
    pub fn connect(&self) {
        let url = self.url();
        let transport = self.inner.connector.open(url);
        let previous = self
            .inner
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(transport);

        if let Some(previous) = previous {
            tracing::debug!("Replacing previous chat transport");
            previous.close();
        }
        tracing::info!(url = %url, "Chat session connecting");
    }

    /// Drop the current handle and stop its reconnect loop.
    pub fn disconnect(&self) {
        let previous = self
            .inner
            .handle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(transport) = previous {
            transport.close();
            tracing::info!("Chat session disconnected");
        }
        self.take_deferred_request();
    }

    /// Wire the current handle's inbound and open signals into `store`.
    pub fn listen(&self, store: Arc<dyn Store>) -> Result<(), SessionError> {
        let transport = self.current()?;

        // Handlers live inside the transport, which the session owns; hold the
        // session weakly to avoid a reference cycle.
        let weak = Arc::downgrade(&self.inner);
        let store_for_messages = Arc::clone(&store);
        transport.set_on_message(Box::new(move |text| {
            let Some(session) = upgrade(&weak) else {
                return;
            };
            if let Err(e) = session.handle_frame(store_for_messages.as_ref(), &text) {
                tracing::warn!(error = %e, "Dropping inbound frame");
            }
        }));

        let weak = Arc::downgrade(&self.inner);
        transport.set_on_open(Box::new(move || {
            let Some(session) = upgrade(&weak) else {
                return;
            };
            if let Err(e) = session.handle_open(store.as_ref()) {
                tracing::warn!(error = %e, "Reconnect handshake failed");
            }
        }));

        Ok(())
    }

    /// Serialize `message` and write it to the current handle.
    pub fn send(&self, message: &ClientMessage) -> Result<(), SessionError> {
        let transport = self.current()?;
        let text = serde_json::to_string(message).map_err(SessionError::Encode)?;
        transport.send(text)?;
        tracing::debug!(tag = message.tag(), "Sent frame");
        Ok(())
    }

    /// Decode one inbound frame and route it to the store.
    pub fn handle_frame(&self, store: &dyn Store, text: &str) -> Result<(), SessionError> {
        let frame = decode_frame(text)?;
        tracing::trace!(tag = frame.tag(), "Received frame");
        let action = message_translator::translate(frame);

        let first_room = match &action {
            ChatAction::RoomsReceived { rooms } => Some(rooms.first().cloned()),
            _ => None,
        };
        let login_ack = match &action {
            ChatAction::LoginSucceeded { user } => Some(user.clone()),
            _ => None,
        };

        store.dispatch(action);

        if let Some(first_room) = first_room {
            self.auto_select_room(store, first_room)?;
        }
        if let Some(user) = login_ack {
            self.release_deferred_request(&user)?;
        }
        Ok(())
    }

    /// React to the transport (re)opening. A user already present in state
    /// means this is a reconnect, so log in again and catch up on messages.
    pub fn handle_open(&self, store: &dyn Store) -> Result<(), SessionError> {
        let state = store.state();
        let Some(user) = state.current_user.clone() else {
            tracing::debug!("Connection opened before login; nothing to restore");
            return Ok(());
        };

        tracing::info!(user = %user, "Connection reopened, re-authenticating");
        actions::login_user(&user)(store, self)?;

        let request = ClientMessage::request_messages_since(state.last_message_id(), user.clone());
        match self.inner.sequencing {
            ReconnectSequencing::Immediate => self.send(&request),
            ReconnectSequencing::AwaitLoginAck => {
                tracing::debug!("Holding catch-up request until login is acknowledged");
                *self.lock_deferred() = Some(DeferredRequest { user, request });
                Ok(())
            }
        }
    }

    /// On first load, open the first listed room unless one is already open.
    fn auto_select_room(
        &self,
        store: &dyn Store,
        first_room: Option<RoomData>,
    ) -> Result<(), SessionError> {
        if store.state().current_room_id.is_some() {
            return Ok(());
        }
        let Some(room) = first_room else {
            return Ok(());
        };
        tracing::debug!(room_id = room.id, "Auto-selecting first room");
        actions::select_room(&room)(store, self)
    }

    /// Send the held catch-up request if `acked_user` is the user it was
    /// held for. Acks for anyone else leave it in place.
    fn release_deferred_request(&self, acked_user: &str) -> Result<(), SessionError> {
        let deferred = {
            let mut slot = self.lock_deferred();
            if slot.as_ref().is_some_and(|held| held.user == acked_user) {
                slot.take()
            } else {
                if let Some(held) = slot.as_ref() {
                    tracing::debug!(
                        acked = %acked_user,
                        waiting_for = %held.user,
                        "Login ack for another user; catch-up still held"
                    );
                }
                None
            }
        };
        match deferred {
            Some(held) => self.send(&held.request),
            None => Ok(()),
        }
    }

    fn take_deferred_request(&self) -> Option<ClientMessage> {
        self.lock_deferred().take().map(|held| held.request)
    }

    fn lock_deferred(&self) -> MutexGuard<'_, Option<DeferredRequest>> {
        self.inner
            .deferred_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_handle(&self) -> Option<Arc<dyn Transport>> {
        self.inner
            .handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn current(&self) -> Result<Arc<dyn Transport>, SessionError> {
        self.read_handle().ok_or(SessionError::NotConnected)
    }
}

fn upgrade(weak: &Weak<SessionInner>) -> Option<ChatSession> {
    weak.upgrade().map(|inner| ChatSession { inner })
}

impl Outbound for ChatSession {
    fn send_message(&self, message: &ClientMessage) -> Result<(), SessionError> {
        self.send(message)
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("url", &self.url().as_str())
            .field("sequencing", &self.inner.sequencing)
            .field("connected", &self.is_connected())
            .finish()
    }
}
