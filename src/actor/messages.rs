//! Actor Message Definitions
//!
//! ```text
//! PipeMonitor ──Submit──► IngestActor ──Send──► WsActor ──► viewers
//!                 ▲            │ Update           │
//!                 │            ▼                  │
//!                 │     BibliographyActor ──Send──┤
//!                 │            ▲ Refresh          │
//!                 └────────────┴──── viewer text ─┘
//! ```

use std::net::TcpStream;

use tungstenite::WebSocket;

use crate::bibliography::BibFingerprint;
use crate::core::PendingRequest;
use crate::viewer::ViewerMessage;

/// Messages to the ingest actor
#[derive(Debug)]
pub enum IngestMsg {
    /// Replace the pending request
    Submit(PendingRequest),
    Shutdown,
}

/// Messages to the bibliography actor
#[derive(Debug)]
pub enum BibMsg {
    /// A conversion derived a new fingerprint
    Update(BibFingerprint),
    /// A viewer asked for the current bibliography again
    Refresh,
    Shutdown,
}

/// Messages to the websocket actor
#[derive(Debug)]
pub enum WsMsg {
    /// Broadcast to every connected viewer
    Send(ViewerMessage),
    /// Register a viewer whose handshake completed
    AddClient(WebSocket<TcpStream>),
    Shutdown,
}
