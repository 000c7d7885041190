//! WebSocket Actor - Viewer Connections
//!
//! This actor is responsible for:
//! - Registering viewers whose handshake completed
//! - Broadcasting every message to all connected viewers
//! - Receiving viewer requests (files to render, bibliography refreshes)
//!
//! # Architecture
//!
//! ```text
//! Ingest/Bibliography --[Send]--> WsActor --[broadcast]--> Viewers
//!        ^                                                   |
//!        +-------------[filepath: / revealjs:filepath:]------+
//! ```

mod client_io;
mod delivery;
pub mod registry;

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::messages::{BibMsg, IngestMsg, WsMsg};
use registry::ClientSet;

/// WebSocket Actor - owns viewer connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    /// Shared with the reader thread
    clients: Arc<Mutex<ClientSet>>,
    ingest_tx: mpsc::Sender<IngestMsg>,
    bib_tx: mpsc::Sender<BibMsg>,
    home: PathBuf,
}

impl WsActor {
    pub fn new(
        rx: mpsc::Receiver<WsMsg>,
        ingest_tx: mpsc::Sender<IngestMsg>,
        bib_tx: mpsc::Sender<BibMsg>,
        home: PathBuf,
    ) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(ClientSet::default())),
            ingest_tx,
            bib_tx,
            home,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let reader = client_io::ClientReader {
            clients: Arc::clone(&self.clients),
            ingest_tx: self.ingest_tx.clone(),
            bib_tx: self.bib_tx.clone(),
            home: self.home.clone(),
        };
        std::thread::spawn(move || reader.run());

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Send(message) => self.broadcast(&message),

                WsMsg::AddClient(ws) => {
                    let mut clients = self.clients.lock();
                    let id = clients.register(Box::new(ws));
                    crate::debug!("ws"; "client {} registered (total: {})", id, clients.len());
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    self.clients.lock().close_all();
                    break;
                }
            }
        }
    }
}
