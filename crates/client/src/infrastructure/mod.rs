pub mod config;
pub mod message_translator;
pub mod page_location;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
