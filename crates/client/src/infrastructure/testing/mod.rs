//! In-memory collaborators for unit tests.

mod fake_transport;

pub use fake_transport::{FakeConnector, FakeTransport};
