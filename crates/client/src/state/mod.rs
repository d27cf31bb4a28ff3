//! Client-side application state and the reducer store that owns it.

pub mod chat_state;
pub mod reducer;
pub mod store;

pub use chat_state::ChatState;
pub use reducer::reduce;
pub use store::ChatStore;
