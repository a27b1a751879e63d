//! Request and response bodies of the FinTrack API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /transfers/unlink`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlinkRequest {
    pub tx_id: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
}

/// Response of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReport {
    #[serde(default)]
    pub status: String,
    /// Number of transactions the server extracted and stored
    pub count: usize,
    /// Extracted rows, kept loosely typed
    #[serde(default)]
    pub data: Vec<Value>,
}

impl UploadReport {
    pub fn summary(&self) -> String {
        format!("Successfully processed {} transactions!", self.count)
    }
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub message: String,
}

/// Pull a readable message out of an error body.
///
/// FastAPI sends `{"detail": "..."}` for raised errors and
/// `{"detail": [{"msg": "..."}, ...]}` for validation failures.
pub fn error_detail(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
