//! Bibliography Actor - Single-Flight Bibliography Rendering
//!
//! Keeps the latest fingerprint from the conversion pipeline and renders
//! it through the bibliography cache, one render at a time. A viewer can
//! ask for the current bibliography again without a new conversion.


use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{BibMsg, WsMsg};
use super::task::{Flight, abort_task, wait_task};
use crate::bibliography::{self, BibFingerprint};
use crate::cache::Caches;
use crate::convert::{ConvertError, Converter};
use crate::debug;
use crate::logger::status_error;
use crate::viewer::ViewerMessage;

pub struct BibliographyActor {
    rx: mpsc::Receiver<BibMsg>,
    renderer: Renderer,
}

#[derive(Clone)]
struct Renderer {
    ws_tx: mpsc::Sender<WsMsg>,
    converter: Arc<dyn Converter>,
    caches: Arc<Caches>,
}

impl BibliographyActor {
    pub fn new(
        rx: mpsc::Receiver<BibMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        converter: Arc<dyn Converter>,
        caches: Arc<Caches>,
    ) -> Self {
        Self {
            rx,
            renderer: Renderer {
                ws_tx,
                converter,
                caches,
            },
        }
    }

    pub async fn run(mut self) {
        let mut current: Option<BibFingerprint> = None;
        let mut pending: Option<BibFingerprint> = None;
        let mut flight: Flight = None;

        loop {
            tokio::select! {
                biased;

                msg = self.rx.recv() => match msg {
                    Some(BibMsg::Update(fp)) => {
                        current = Some(fp.clone());
                        pending = Some(fp);
                    }
                    Some(BibMsg::Refresh) => match &current {
                        Some(fp) => pending = Some(fp.clone()),
                        None => debug!("bib"; "refresh before any conversion, ignored"),
                    },
                    Some(BibMsg::Shutdown) | None => {
                        debug!("bib"; "shutting down");
                        abort_task(&mut flight);
                        break;
                    }
                },

                () = wait_task(&mut flight) => {
                    flight = None;
                }
            }

            if flight.is_none()
                && let Some(fp) = pending.take()
            {
                flight = Some(tokio::spawn(self.renderer.clone().render(fp)));
            }
        }
    }
}

impl Renderer {
    async fn render(self, fp: BibFingerprint) {
        let bibid = fp.id;
        let Self {
            ws_tx,
            converter,
            caches,
        } = self;

        let result = tokio::task::spawn_blocking(move || {
            bibliography::render(&fp, &*converter, &caches)
        })
        .await
        .map_err(ConvertError::from)
        .and_then(|r| r);

        let message = match result {
            Ok(html) => ViewerMessage::bibliography(&html, bibid),
            Err(e) => {
                status_error("bibliography failed", &e.to_string());
                ViewerMessage::error(e)
            }
        };

        if ws_tx.send(WsMsg::Send(message)).await.is_err() {
            debug!("bib"; "websocket actor is gone");
        }
    }
}
