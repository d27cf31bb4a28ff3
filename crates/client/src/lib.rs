//! Chatline client.
//!
//! A reconnecting chat session adapter plus the store it feeds:
//! - `application`: the session (`connect` / `listen` / `send`) and action creators
//! - `infrastructure`: WebSocket transport, frame translation, configuration
//! - `ports`: the traits the session is written against
//! - `state`: reducer-backed store
//! - `ui`: message renderer and terminal commands

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;
