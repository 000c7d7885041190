//! Actor Coordinator - Wires up the Preview Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels and the shared memo tables
//! - Starts the viewer listener and the pipe monitor thread
//! - Runs the actors until shutdown

mod runtime;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::bibliography::BibliographyActor;
use super::ingest::IngestActor;
use super::messages::{BibMsg, IngestMsg, WsMsg};
use super::pipe::PipeMonitor;
use super::ws::WsActor;
use crate::cache::Caches;
use crate::config::PreviewConfig;
use crate::convert::{Converter, Pipeline};
use crate::viewer::server::start_ws_server;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<PreviewConfig>,
    converter: Arc<dyn Converter>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(config: Arc<PreviewConfig>, converter: Arc<dyn Converter>) -> Self {
        Self {
            config,
            converter,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    ///
    /// `on_ready` receives the port the viewer listener actually bound,
    /// before any content is accepted.
    pub async fn run(mut self, on_ready: impl FnOnce(u16) -> Result<()>) -> Result<()> {
        let (ingest_tx, ingest_rx) = mpsc::channel::<IngestMsg>(CHANNEL_BUFFER);
        let (bib_tx, bib_rx) = mpsc::channel::<BibMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let config = Arc::clone(&self.config);
        let home = config.paths.home.clone();
        let caches = Arc::new(Caches::new(&config.cache));
        let pipeline = Arc::new(Pipeline::new(
            Arc::clone(&self.converter),
            Arc::clone(&caches),
            bib_tx.clone(),
        ));

        let port = start_ws_server(config.serve.interface, config.serve.port, ws_tx.clone())?;
        on_ready(port)?;

        PipeMonitor::new(config.paths.pipe_path(), ingest_tx.clone())
            .spawn()
            .context("failed to start pipe monitor")?;

        let ingest = IngestActor::new(
            ingest_rx,
            ws_tx.clone(),
            pipeline,
            home.clone(),
            config.timing.clone(),
        );
        let bibliography =
            BibliographyActor::new(bib_rx, ws_tx.clone(), Arc::clone(&self.converter), caches);
        let ws = WsActor::new(ws_rx, ingest_tx.clone(), bib_tx.clone(), home);

        crate::debug!("actor"; "start");
        let actors = runtime::Actors {
            ingest,
            bibliography,
            ws,
        };
        let senders = runtime::Senders {
            ingest: ingest_tx,
            bibliography: bib_tx,
            ws: ws_tx,
        };
        runtime::run_actors(actors, senders, self.shutdown_rx.take()).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
