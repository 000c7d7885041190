//! The viewer side: wire messages and the WebSocket listener.
//!
//! # Modules
//!
//! - `message` - Outbound messages (render, bibliography, error, status)
//! - `protocol` - Inbound viewer requests
//! - `server` - Listener with port retry, feeds the websocket actor

pub mod message;
pub mod protocol;
pub mod server;

pub use message::ViewerMessage;
pub use protocol::ViewerRequest;
