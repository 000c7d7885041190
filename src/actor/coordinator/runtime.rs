use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::bibliography::BibliographyActor;
use crate::actor::ingest::IngestActor;
use crate::actor::messages::{BibMsg, IngestMsg, WsMsg};
use crate::actor::ws::WsActor;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

pub(super) struct Actors {
    pub(super) ingest: IngestActor,
    pub(super) bibliography: BibliographyActor,
    pub(super) ws: WsActor,
}

pub(super) struct Senders {
    pub(super) ingest: mpsc::Sender<IngestMsg>,
    pub(super) bibliography: mpsc::Sender<BibMsg>,
    pub(super) ws: mpsc::Sender<WsMsg>,
}

/// Run all actors concurrently until shutdown is signalled or one stops.
pub(super) async fn run_actors(actors: Actors, senders: Senders, shutdown_rx: Option<Receiver<()>>) {
    let mut ingest_handle = tokio::spawn(actors.ingest.run());
    let mut bib_handle = tokio::spawn(actors.bibliography.run());
    let mut ws_handle = tokio::spawn(actors.ws.run());

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    } else {
        tokio::select! {
            _ = &mut ingest_handle => {}
            _ = &mut bib_handle => {}
            _ = &mut ws_handle => {}
        }
    }

    let _ = senders.ingest.send(IngestMsg::Shutdown).await;
    let _ = senders.bibliography.send(BibMsg::Shutdown).await;
    let _ = senders.ws.send(WsMsg::Shutdown).await;

    let handles = [ingest_handle, bib_handle, ws_handle];
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, async {
        for handle in handles {
            // the one `select!` already awaited must not be polled again
            if !handle.is_finished() {
                let _ = handle.await;
            }
        }
    })
    .await;
}
