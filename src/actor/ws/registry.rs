//! The set of connected viewers.

use std::io::{ErrorKind, Read, Write};

use rustc_hash::FxHashMap;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

pub type ClientId = u64;

/// What a non-blocking read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// Nothing to read right now (or a frame we ignore)
    Idle,
    Closed,
}

/// A viewer connection.
pub trait Connection: Send {
    fn send_text(&mut self, text: &str) -> Result<(), tungstenite::Error>;
    fn poll(&mut self) -> Inbound;
    fn close(&mut self);
}

impl<S: Read + Write + Send> Connection for WebSocket<S> {
    fn send_text(&mut self, text: &str) -> Result<(), tungstenite::Error> {
        self.send(Message::Text(text.into()))
    }

    fn poll(&mut self) -> Inbound {
        match self.read() {
            Ok(Message::Text(text)) => Inbound::Text(text.as_str().to_owned()),
            Ok(Message::Close(_)) => Inbound::Closed,
            Ok(_) => Inbound::Idle,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                Inbound::Idle
            }
            Err(_) => Inbound::Closed,
        }
    }

    fn close(&mut self) {
        let _ = WebSocket::close(self, None);
        let _ = self.flush();
    }
}

#[derive(Default)]
pub struct ClientSet {
    next_id: ClientId,
    clients: FxHashMap<ClientId, Box<dyn Connection>>,
}

impl ClientSet {
    pub fn register(&mut self, conn: Box<dyn Connection>) -> ClientId {
        let id = self.next_id;
        self.next_id += 1;
        self.clients.insert(id, conn);
        id
    }

    /// Remove a client; removing an unknown id is a no-op.
    pub fn unregister(&mut self, id: ClientId) -> bool {
        self.clients.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Send `text` to every client, dropping the ones that fail.
    ///
    /// A send that would block leaves the frame buffered in the connection;
    /// the reader thread's next read flushes it, so the client stays.
    ///
    /// Returns the number of clients that received it.
    pub fn broadcast(&mut self, text: &str) -> usize {
        let mut dead = Vec::new();
        for (&id, conn) in &mut self.clients {
            match conn.send_text(text) {
                Ok(()) => {}
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                    crate::debug!("ws"; "client {} send buffered", id);
                }
                Err(e) => {
                    crate::debug!("ws"; "client {} disconnected: {}", id, e);
                    dead.push(id);
                }
            }
        }
        for id in dead {
            self.unregister(id);
        }
        self.clients.len()
    }

    /// Drain pending text from every client, dropping closed ones.
    pub fn poll(&mut self) -> Vec<String> {
        let mut inbound = Vec::new();
        let mut dead = Vec::new();
        for (&id, conn) in &mut self.clients {
            loop {
                match conn.poll() {
                    Inbound::Text(text) => inbound.push(text),
                    Inbound::Idle => break,
                    Inbound::Closed => {
                        crate::debug!("ws"; "client {} closed", id);
                        dead.push(id);
                        break;
                    }
                }
            }
        }
        for id in dead {
            self.unregister(id);
        }
        inbound
    }

    pub fn close_all(&mut self) {
        for (_, mut conn) in self.clients.drain() {
            conn.close();
        }
    }
}

#[cfg(test)]
pub(super) mod mock {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Records sent text; replays scripted reads.
    #[derive(Default)]
    pub struct MockConn {
        pub sent: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
        /// Report a full socket buffer instead of accepting the frame
        pub stalled: bool,
        pub inbound: VecDeque<Inbound>,
        pub closed: Arc<Mutex<bool>>,
    }

    impl Connection for MockConn {
        fn send_text(&mut self, text: &str) -> Result<(), tungstenite::Error> {
            if self.fail {
                return Err(tungstenite::Error::ConnectionClosed);
            }
            if self.stalled {
                return Err(tungstenite::Error::Io(ErrorKind::WouldBlock.into()));
            }
            self.sent.lock().push(text.to_string());
            Ok(())
        }

        fn poll(&mut self) -> Inbound {
            self.inbound.pop_front().unwrap_or(Inbound::Idle)
        }

        fn close(&mut self) {
            *self.closed.lock() = true;
        }
    }
}
