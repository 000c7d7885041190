use super::IngestActor;
use crate::actor::messages::IngestMsg;
use crate::actor::task::{Flight, abort_task, wait_task};
use crate::core::PendingRequest;
use crate::debug;

impl IngestActor {
    /// Main event loop: coalesce requests, run one at a time.
    pub async fn run(mut self) {
        let mut pending: Option<PendingRequest> = None;
        let mut flight: Flight = None;

        loop {
            tokio::select! {
                biased;

                msg = self.rx.recv() => match msg {
                    Some(IngestMsg::Submit(request)) => {
                        if let Some(old) = pending.replace(request) {
                            debug!("ingest"; "superseded {}", old.describe());
                        }
                    }
                    Some(IngestMsg::Shutdown) | None => {
                        debug!("ingest"; "shutting down");
                        abort_task(&mut flight);
                        break;
                    }
                },

                () = wait_task(&mut flight) => {
                    flight = None;
                }
            }

            if flight.is_none()
                && let Some(request) = pending.take()
            {
                debug!("ingest"; "start {}", request.describe());
                flight = Some(tokio::spawn(self.runner.clone().run(request)));
            }
        }
    }
}
