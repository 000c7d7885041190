//! Ingest Actor - Coalescing, Single-Flight Conversion
//!
//! Holds one pending request and at most one in-flight run:
//! - a new request overwrites the pending one (last write wins)
//! - a run starts only when no other run holds the gate
//! - after each run a short cool-down keeps the gate closed, so a burst
//!   of edits collapses into a bounded rate of conversions

mod dispatch;
mod run;


use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{IngestMsg, WsMsg};
use crate::config::TimingConfig;
use crate::convert::Pipeline;

pub struct IngestActor {
    rx: mpsc::Receiver<IngestMsg>,
    runner: run::Runner,
}

impl IngestActor {
    pub fn new(
        rx: mpsc::Receiver<IngestMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        pipeline: Arc<Pipeline>,
        home: PathBuf,
        timing: TimingConfig,
    ) -> Self {
        Self {
            rx,
            runner: run::Runner {
                ws_tx,
                pipeline,
                home,
                timing,
            },
        }
    }
}
