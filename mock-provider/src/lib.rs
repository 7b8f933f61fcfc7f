//! In-process stand-in for the Gemini `generateContent` endpoint.
//!
//! Every request is recorded and answered with one fixed [`MockReply`].

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockReply {
    Json(Value),
    Error { status: u16, body: String },
}

impl MockReply {
    /// A successful answer with a single text part.
    pub fn text(text: &str) -> Self {
        Self::Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
    }

    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// A provider error in the Google API envelope.
    pub fn error(status: u16, message: &str) -> Self {
        Self::Error {
            status,
            body: json!({ "error": { "code": status, "message": message, "status": "MOCK_ERROR" } })
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockGemini {
    /// Drop-in value for `GEMINI_BASE_URL`.
    pub base_url: String,
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGemini {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

pub fn make_router(reply: MockReply) -> (Router, Arc<Mutex<Vec<RecordedRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        requests: requests.clone(),
    };
    let router = Router::new().fallback(generate_content_handler).with_state(state);
    (router, requests)
}

/// Binds an ephemeral port on localhost and serves in the background.
pub async fn spawn_mock_gemini(reply: MockReply) -> MockGemini {
    let (router, requests) = make_router(reply);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("Failed to bind mock Gemini server: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("Mock Gemini server has no local address: {e}"));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            log::error!("Mock Gemini server stopped: {}", e);
        }
    });

    MockGemini {
        base_url: format!("http://{addr}/v1beta"),
        addr,
        requests,
    }
}

async fn generate_content_handler(
    State(state): State<MockState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            path: uri.path().to_string(),
            key: params.get("key").cloned(),
            body,
        });
    }

    match state.reply {
        MockReply::Json(value) => (StatusCode::OK, Json(value)).into_response(),
        MockReply::Error { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [("content-type", "application/json")], body).into_response()
        }
    }
}
