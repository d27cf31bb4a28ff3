//! Reconnecting WebSocket client using tokio-tungstenite

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::core::{BackoffPolicy, BackoffState};
use super::protocol::{ConnectionState, StateCell};
use crate::ports::outbound::{Connector, MessageHandler, OpenHandler, Transport, TransportError};

type SharedMessageHandler = Arc<dyn Fn(String) + Send + Sync + 'static>;
type SharedOpenHandler = Arc<dyn Fn() + Send + Sync + 'static>;

struct SocketInner {
    url: Url,
    policy: BackoffPolicy,
    state: StateCell,
    on_message: Mutex<Option<SharedMessageHandler>>,
    on_open: Mutex<Option<SharedOpenHandler>>,
    /// Writer channel of the live connection; `None` between connections
    tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
    /// Signalled once a message handler is attached
    listening: Notify,
    shutdown: CancellationToken,
}

enum ConnectionEnd {
    /// `close()` was called
    Shutdown,
    /// Server closed or the socket failed; reconnect
    Dropped,
}

/// One logical connection that redials with exponential backoff.
///
/// Dialing starts once a message handler is attached, so no frame is received
/// before someone is listening. `on_open` fires after every successful dial.
/// Dropping the socket shuts it down.
pub struct ReconnectingSocket {
    inner: Arc<SocketInner>,
}

impl ReconnectingSocket {
    /// Create the socket and spawn its connection task on the current tokio
    /// runtime.
    pub fn open(url: Url, policy: BackoffPolicy) -> Self {
        let inner = Arc::new(SocketInner {
            url,
            policy,
            state: StateCell::new(ConnectionState::Disconnected),
            on_message: Mutex::new(None),
            on_open: Mutex::new(None),
            tx: Mutex::new(None),
            listening: Notify::new(),
            shutdown: CancellationToken::new(),
        });

        tokio::spawn(run(Arc::clone(&inner)));
        Self { inner }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state.get()
    }
}

impl Transport for ReconnectingSocket {
    fn set_on_message(&self, handler: MessageHandler) {
        *lock(&self.inner.on_message) = Some(Arc::from(handler));
        self.inner.listening.notify_one();
    }

    fn set_on_open(&self, handler: OpenHandler) {
        *lock(&self.inner.on_open) = Some(Arc::from(handler));
    }

    fn send(&self, text: String) -> Result<(), TransportError> {
        if self.inner.shutdown.is_cancelled() {
            return Err(TransportError::Closed);
        }
        let tx = lock(&self.inner.tx);
        let tx = tx.as_ref().ok_or(TransportError::NotOpen)?;
        tx.send(text).map_err(|_| TransportError::NotOpen)
    }

    fn close(&self) {
        self.inner.shutdown.cancel();
    }
}

impl Drop for ReconnectingSocket {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

impl std::fmt::Debug for ReconnectingSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectingSocket")
            .field("url", &self.inner.url.as_str())
            .field("state", &self.state())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run(inner: Arc<SocketInner>) {
    tokio::select! {
        _ = inner.listening.notified() => {}
        _ = inner.shutdown.cancelled() => return,
    }

    let mut backoff = BackoffState::new(inner.policy);
    loop {
        inner.state.set(ConnectionState::Connecting);

        let connected = tokio::select! {
            result = connect_async(inner.url.as_str()) => result,
            _ = inner.shutdown.cancelled() => break,
        };

        match connected {
            Ok((stream, _response)) => {
                backoff.reset();
                if let ConnectionEnd::Shutdown = inner.drive(stream).await {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(url = %inner.url, error = %e, "Failed to connect to chat server");
            }
        }

        inner.state.set(ConnectionState::Reconnecting);
        let Some(delay) = backoff.next_delay_and_advance() else {
            tracing::error!(
                attempts = backoff.attempts(),
                "Max reconnection attempts reached, giving up"
            );
            inner.state.set(ConnectionState::Failed);
            return;
        };
        tracing::info!(
            attempt = backoff.attempts(),
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to chat server"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = inner.shutdown.cancelled() => break,
        }
    }

    inner.state.set(ConnectionState::Disconnected);
    tracing::debug!(url = %inner.url, "Chat socket stopped");
}

impl SocketInner {
    /// Pump one established connection until it ends.
    async fn drive(&self, stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> ConnectionEnd {
        let (mut write, mut read) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        *lock(&self.tx) = Some(tx);

        self.state.set(ConnectionState::Connected);
        tracing::info!(url = %self.url, "Connected to chat server");

        // Clone out of the lock so the handler can call back into `send`.
        let on_open = lock(&self.on_open).clone();
        if let Some(handler) = on_open {
            handler();
        }

        let end = loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "Close frame not delivered");
                    }
                    break ConnectionEnd::Shutdown;
                }
                Some(text) = rx.recv() => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        tracing::warn!(error = %e, "Failed to write frame");
                        break ConnectionEnd::Dropped;
                    }
                }
                incoming = read.next() => match incoming {
                    Some(Ok(Message::Text(text))) => self.deliver(text),
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Chat server closed connection");
                        break ConnectionEnd::Dropped;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Chat socket error");
                        break ConnectionEnd::Dropped;
                    }
                    None => break ConnectionEnd::Dropped,
                },
            }
        };

        *lock(&self.tx) = None;
        end
    }

    fn deliver(&self, text: String) {
        let on_message = lock(&self.on_message).clone();
        match on_message {
            Some(handler) => handler(text),
            None => tracing::debug!("Frame received with no handler attached"),
        }
    }
}

/// Opens [`ReconnectingSocket`]s with a shared backoff policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector {
    policy: BackoffPolicy,
}

impl TungsteniteConnector {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }
}

impl Connector for TungsteniteConnector {
    fn open(&self, url: &Url) -> Arc<dyn Transport> {
        Arc::new(ReconnectingSocket::open(url.clone(), self.policy))
    }
}
