//! Actor System for Live Preview
//!
//! Message-passing concurrency around the converter:
//!
//! ```text
//! PipeMonitor --> IngestActor --> WsActor --> viewers
//!  (thread)      (single-flight)  (broadcast)
//!                     |              ^   |
//!                     v              |   | requests
//!              BibliographyActor ----+   |
//!                     ^------------------+
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `pipe` - Named pipe reader and payload assembly
//! - `ingest` - Coalescing, single-flight conversion runs
//! - `bibliography` - Single-flight bibliography rendering
//! - `ws` - Viewer registry and broadcast
//! - `coordinator` - Wires up and runs actors

pub mod bibliography;
pub mod coordinator;
pub mod ingest;
pub mod messages;
pub mod pipe;
mod task;
pub mod ws;

pub use coordinator::Coordinator;
