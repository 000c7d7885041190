use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::registry::ClientSet;
use crate::actor::messages::{BibMsg, IngestMsg};
use crate::core::{PendingRequest, is_shutdown};
use crate::viewer::ViewerRequest;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background thread reading viewer messages (non-blocking poll).
pub(super) struct ClientReader {
    pub(super) clients: Arc<Mutex<ClientSet>>,
    pub(super) ingest_tx: mpsc::Sender<IngestMsg>,
    pub(super) bib_tx: mpsc::Sender<BibMsg>,
    pub(super) home: PathBuf,
}

impl ClientReader {
    pub(super) fn run(self) {
        while !is_shutdown() {
            std::thread::sleep(POLL_INTERVAL);

            // dispatch outside the lock so a full channel cannot stall broadcasts
            let inbound = self.clients.lock().poll();
            for text in inbound {
                if !self.dispatch(&text) {
                    crate::debug!("ws"; "actors are gone, reader stops");
                    return;
                }
            }
        }
    }

    /// Forward one viewer message. Returns `false` once the receiving
    /// actor has stopped.
    fn dispatch(&self, text: &str) -> bool {
        match ViewerRequest::parse(text, &self.home) {
            ViewerRequest::File { path, slides } => {
                crate::debug!("ws"; "viewer requested {}", path.display());
                let request = PendingRequest::FileRequest { path, slides };
                self.ingest_tx
                    .blocking_send(IngestMsg::Submit(request))
                    .is_ok()
            }
            ViewerRequest::Bibliography => self.bib_tx.blocking_send(BibMsg::Refresh).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ws::registry::mock::MockConn;
    use crate::actor::ws::registry::Inbound;

    fn reader() -> (ClientReader, mpsc::Receiver<IngestMsg>, mpsc::Receiver<BibMsg>) {
        let (ingest_tx, ingest_rx) = mpsc::channel(4);
        let (bib_tx, bib_rx) = mpsc::channel(4);
        let reader = ClientReader {
            clients: Arc::new(Mutex::new(ClientSet::default())),
            ingest_tx,
            bib_tx,
            home: PathBuf::from("/nonexistent/home"),
        };
        (reader, ingest_rx, bib_rx)
    }

    #[test]
    fn test_dispatch_file_request() {
        let (reader, mut ingest_rx, _bib_rx) = reader();
        assert!(reader.dispatch("revealjs:filepath:talk.md"));

        match ingest_rx.try_recv() {
            Ok(IngestMsg::Submit(PendingRequest::FileRequest { path, slides })) => {
                assert_eq!(path, PathBuf::from("/nonexistent/home/talk.md"));
                assert!(slides);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_refresh() {
        let (reader, _ingest_rx, mut bib_rx) = reader();
        assert!(reader.dispatch("citeproc please"));
        assert!(matches!(bib_rx.try_recv(), Ok(BibMsg::Refresh)));
    }

    #[test]
    fn test_dispatch_reports_closed_actor() {
        let (reader, ingest_rx, _bib_rx) = reader();
        drop(ingest_rx);
        assert!(!reader.dispatch("filepath:a.md"));
    }

    #[test]
    fn test_polled_text_reaches_ingest() {
        let (reader, mut ingest_rx, _bib_rx) = reader();
        reader.clients.lock().register(Box::new(MockConn {
            inbound: [Inbound::Text("filepath:a.md".into())].into(),
            ..Default::default()
        }));

        let inbound = reader.clients.lock().poll();
        for text in &inbound {
            assert!(reader.dispatch(text));
        }
        assert!(matches!(
            ingest_rx.try_recv(),
            Ok(IngestMsg::Submit(PendingRequest::FileRequest { slides: false, .. }))
        ));
    }
}
