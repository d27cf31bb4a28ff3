//! Scriptable transport: tests push frames and open events in, and read back
//! what was sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use url::Url;

use crate::ports::outbound::{Connector, MessageHandler, OpenHandler, Transport, TransportError};

pub struct FakeTransport {
    on_message: Mutex<Option<MessageHandler>>,
    on_open: Mutex<Option<OpenHandler>>,
    sent: Mutex<Vec<String>>,
    open: AtomicBool,
    closed: AtomicBool,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            on_message: Mutex::new(None),
            on_open: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            open: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        }
    }
}

impl FakeTransport {
    /// Invoke the message handler with one frame, as the socket task would.
    pub fn deliver(&self, text: &str) {
        let handler = self.on_message.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handler) = handler.as_ref() {
            handler(text.to_string());
        }
    }

    /// Invoke the open handler, as after a successful (re)connect.
    pub fn open(&self) {
        self.set_open(true);
        let handler = self.on_open.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handler) = handler.as_ref() {
            handler();
        }
    }

    /// Simulate the window between a drop and the next successful dial.
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    /// Every frame written so far, parsed as JSON.
    pub fn sent_frames(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|text| serde_json::from_str(text).unwrap_or(Value::String(text.clone())))
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Transport for FakeTransport {
    fn set_on_message(&self, handler: MessageHandler) {
        *self.on_message.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    fn set_on_open(&self, handler: OpenHandler) {
        *self.on_open.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    fn send(&self, text: String) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        if !self.open.load(Ordering::SeqCst) {
            return Err(TransportError::NotOpen);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out a fresh [`FakeTransport`] per `open` and remembers each one.
#[derive(Default)]
pub struct FakeConnector {
    opened: Mutex<Vec<(Url, Arc<FakeTransport>)>>,
}

impl FakeConnector {
    pub fn last(&self) -> Option<Arc<FakeTransport>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, transport)| Arc::clone(transport))
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(url, _)| url.to_string())
            .collect()
    }
}

impl Connector for FakeConnector {
    fn open(&self, url: &Url) -> Arc<dyn Transport> {
        let transport = Arc::new(FakeTransport::default());
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.clone(), Arc::clone(&transport)));
        transport
    }
}
