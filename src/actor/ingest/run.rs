use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;
use crate::actor::task::AbortOnDrop;
use crate::config::TimingConfig;
use crate::convert::slides::force_slides;
use crate::convert::{ConvertError, Pipeline};
use crate::core::{PendingRequest, ResolvedContent, parse_payload};
use crate::logger::{status_error, status_success};
use crate::utils::path::display_relative;
use crate::viewer::ViewerMessage;

/// Everything one conversion run needs, cloned into each run task.
#[derive(Clone)]
pub(super) struct Runner {
    pub(super) ws_tx: mpsc::Sender<WsMsg>,
    pub(super) pipeline: Arc<Pipeline>,
    pub(super) home: PathBuf,
    pub(super) timing: TimingConfig,
}

impl Runner {
    /// One gated run: convert, broadcast, cool down.
    ///
    /// Failures are broadcast as `{error}`; the gate opens again either way.
    pub(super) async fn run(self, request: PendingRequest) {
        let started = Instant::now();
        let label = request.describe();

        let ticker = self.start_progress();
        let result = self.process(request).await;
        drop(ticker);

        let message = match result {
            Ok((filepath, message)) => {
                status_success(&format!("converted {} in {:?}", filepath, started.elapsed()));
                message
            }
            Err(e) => {
                status_error(&format!("failed: {label}"), &e.to_string());
                ViewerMessage::error(e)
            }
        };
        self.broadcast(message).await;

        tokio::time::sleep(self.timing.cooldown()).await;
    }

    async fn process(&self, request: PendingRequest) -> Result<(String, ViewerMessage), ConvertError> {
        let resolved = match request {
            PendingRequest::RawContent(bytes) => parse_payload(bytes, &self.home)?,
            PendingRequest::FileRequest { path, slides } => {
                let content = read_file(&path).await?;
                let content = if slides { force_slides(content) } else { content };
                ResolvedContent { path, content }
            }
        };

        let conversion = self
            .pipeline
            .convert(&resolved.content, &resolved.working_dir())
            .await?;
        let filepath = display_relative(&resolved.path, &self.home);
        Ok((filepath.clone(), ViewerMessage::render(filepath, conversion)))
    }

    /// Broadcast a growing status line until the returned guard drops.
    fn start_progress(&self) -> AbortOnDrop {
        let ws_tx = self.ws_tx.clone();
        let interval = self.timing.progress_interval();

        AbortOnDrop(tokio::spawn(async move {
            for tick in 1.. {
                tokio::time::sleep(interval).await;
                let status = WsMsg::Send(ViewerMessage::progress(tick));
                if ws_tx.send(status).await.is_err() {
                    break;
                }
            }
        }))
    }

    async fn broadcast(&self, message: ViewerMessage) {
        if self.ws_tx.send(WsMsg::Send(message)).await.is_err() {
            crate::debug!("ingest"; "websocket actor is gone");
        }
    }
}

async fn read_file(path: &Path) -> Result<String, ConvertError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || std::fs::read_to_string(&owned))
        .await?
        .map_err(|e| ConvertError::unreadable(path, e))
}
