use super::WsActor;
use crate::viewer::ViewerMessage;

impl WsActor {
    /// Broadcast a message to all connected viewers
    pub(super) fn broadcast(&self, message: &ViewerMessage) {
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let text = message.to_json();
        let delivered = clients.broadcast(&text);
        crate::debug!("ws"; "{} to {} clients", message.kind(), delivered);
    }
}
