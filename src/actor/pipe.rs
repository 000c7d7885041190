//! Pipe Monitor - Named Pipe Ingestion
//!
//! Reads the ingestion FIFO on a dedicated thread and turns the byte
//! stream into payloads for the ingest actor:
//!
//! ```text
//! Reconnecting --open--> Connected --EOF / error--> Reconnecting
//!                            |
//!                            +-- NUL or EOF --> IngestMsg::Submit
//! ```
//!
//! Opening a FIFO blocks until a writer appears, so every `echo > pipe`
//! is one connect/read/EOF cycle.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc;

use super::messages::IngestMsg;
use crate::core::{PendingRequest, is_shutdown};

/// Payload terminator.
const SENTINEL: u8 = 0;

const READ_BUFFER: usize = 64 * 1024;
const REOPEN_DELAY: Duration = Duration::from_millis(500);

/// Splits a byte stream into payloads.
#[derive(Debug, Default)]
pub struct PayloadAssembler {
    buffer: Vec<u8>,
}

impl PayloadAssembler {
    /// Feed a chunk, returning every payload it completes.
    ///
    /// Each sentinel completes a payload, even an empty one; the sentinel
    /// itself is dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut complete = Vec::new();
        let mut parts = chunk.split(|&b| b == SENTINEL);

        // split always yields at least one part; all but the last end in a sentinel
        if let Some(mut part) = parts.next() {
            for next in parts {
                self.buffer.extend_from_slice(part);
                complete.push(std::mem::take(&mut self.buffer));
                part = next;
            }
            self.buffer.extend_from_slice(part);
        }
        complete
    }

    /// End of stream: whatever is buffered, unless nothing is.
    ///
    /// `content\0` followed by EOF was already submitted at the sentinel
    /// and must not be followed by an empty payload.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        (!self.buffer.is_empty()).then(|| std::mem::take(&mut self.buffer))
    }
}

enum PipeState {
    Connected(File),
    Reconnecting,
}

/// How a connected read loop ended.
#[derive(Debug)]
enum Drained {
    Eof,
    Lost(io::Error),
    /// The ingest actor is gone.
    Stopped,
}

pub struct PipeMonitor {
    path: PathBuf,
    ingest_tx: mpsc::Sender<IngestMsg>,
}

impl PipeMonitor {
    pub fn new(path: PathBuf, ingest_tx: mpsc::Sender<IngestMsg>) -> Self {
        Self { path, ingest_tx }
    }

    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("pipe-monitor".into())
            .spawn(move || self.run())
    }

    fn run(self) {
        let mut state = PipeState::Reconnecting;

        while !is_shutdown() {
            state = match state {
                PipeState::Reconnecting => match File::open(&self.path) {
                    Ok(file) => {
                        crate::debug!("pipe"; "writer connected");
                        PipeState::Connected(file)
                    }
                    Err(e) => {
                        crate::log!("pipe"; "cannot open {}: {}", self.path.display(), e);
                        std::thread::sleep(REOPEN_DELAY);
                        PipeState::Reconnecting
                    }
                },
                PipeState::Connected(file) => match self.drain(file) {
                    Drained::Eof => PipeState::Reconnecting,
                    Drained::Lost(e) => {
                        crate::log!("pipe"; "connection lost: {}", e);
                        PipeState::Reconnecting
                    }
                    Drained::Stopped => break,
                },
            };
        }
        crate::debug!("pipe"; "stopped");
    }

    /// Read until end of stream, submitting each completed payload.
    fn drain<R: Read>(&self, mut reader: R) -> Drained {
        let mut assembler = PayloadAssembler::default();
        let mut buf = vec![0u8; READ_BUFFER];

        loop {
            let payloads = match reader.read(&mut buf) {
                Ok(0) => {
                    let last = assembler.finish();
                    if last.is_some_and(|p| !self.submit(p)) {
                        return Drained::Stopped;
                    }
                    return Drained::Eof;
                }
                Ok(n) => assembler.push(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Drained::Lost(e),
            };

            for payload in payloads {
                if !self.submit(payload) {
                    return Drained::Stopped;
                }
            }
        }
    }

    fn submit(&self, payload: Vec<u8>) -> bool {
        crate::debug!("pipe"; "received {} bytes", payload.len());
        let request = PendingRequest::RawContent(payload);
        self.ingest_tx
            .blocking_send(IngestMsg::Submit(request))
            .is_ok()
    }
}
