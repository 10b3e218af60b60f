//! In-memory transport for tests.

use std::sync::Mutex;

use serde_json::{Value, json};
use umeng_core::{ApiResponse, TransportError};
use umeng_crypto::SignedRequest;

use crate::Transport;

/// Records every request and answers like the API would.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<SignedRequest>>,
    upload_reply: Option<ApiResponse>,
    send_reply: Option<ApiResponse>,
}

impl RecordingTransport {
    pub const FILE_ID: &'static str = "PF1234567890";
    pub const MSG_ID: &'static str = "uu1234567890";

    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            upload_reply: Some(ApiResponse::success(json!({ "file_id": Self::FILE_ID }))),
            send_reply: Some(ApiResponse::success(json!({ "msg_id": Self::MSG_ID }))),
        }
    }

    /// Every request fails at the network level.
    pub fn unreachable() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            upload_reply: None,
            send_reply: None,
        }
    }

    pub fn reject_uploads(mut self, code: &str, message: &str) -> Self {
        self.upload_reply = Some(ApiResponse::fail(code, message));
        self
    }

    pub fn reject_sends(mut self, code: &str, message: &str) -> Self {
        self.send_reply = Some(ApiResponse::fail(code, message));
        self
    }

    pub fn requests(&self) -> Vec<SignedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn upload_bodies(&self) -> Vec<Value> {
        self.bodies(true)
    }

    pub fn send_bodies(&self) -> Vec<Value> {
        self.bodies(false)
    }

    fn bodies(&self, uploads: bool) -> Vec<Value> {
        self.requests()
            .iter()
            .filter(|r| is_upload(r) == uploads)
            .map(|r| serde_json::from_str(r.body()).unwrap())
            .collect()
    }
}

fn is_upload(request: &SignedRequest) -> bool {
    request.url().ends_with("/upload")
}

impl Transport for RecordingTransport {
    async fn execute(&self, request: &SignedRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = if is_upload(request) {
            &self.upload_reply
        } else {
            &self.send_reply
        };

        reply.clone().ok_or_else(|| TransportError::Request {
            url: request.url().to_string(),
            message: "connection refused".to_string(),
        })
    }
}
