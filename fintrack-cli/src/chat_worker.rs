use fintrack_client::{ApiClient, FinTrackApi};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub request_id: u64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum ChatEvent {
    Reply { request_id: u64, text: String },
    Error { request_id: u64, message: String },
}

impl ChatEvent {
    pub fn request_id(&self) -> u64 {
        match self {
            ChatEvent::Reply { request_id, .. } | ChatEvent::Error { request_id, .. } => *request_id,
        }
    }
}

/// Answer questions one at a time. The panel only submits when nothing is
/// pending, so requests never overlap.
pub async fn run_worker(
    api: ApiClient,
    mut rx: mpsc::UnboundedReceiver<ChatRequest>,
    tx: std::sync::mpsc::Sender<ChatEvent>,
) {
    while let Some(req) = rx.recv().await {
        debug!(request_id = req.request_id, "sending chat message");
        let event = match api.ask(&req.message).await {
            Ok(reply) => ChatEvent::Reply {
                request_id: req.request_id,
                text: reply.response,
            },
            Err(e) => {
                warn!(request_id = req.request_id, error = %e, "chat request failed");
                ChatEvent::Error {
                    request_id: req.request_id,
                    message: e.to_string(),
                }
            }
        };
        if tx.send(event).is_err() {
            // panel closed
            break;
        }
    }
}
