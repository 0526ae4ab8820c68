//! Local stand-in for the Gemini `generateContent` endpoint.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One canned reply.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// 200 with a single candidate carrying `text`.
    Text(String),
    /// 200 with a raw JSON body.
    Raw(serde_json::Value),
    /// Error status with a short body.
    Status(u16),
    /// Sleeps before answering with the text.
    Delayed(Duration, String),
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub query: HashMap<String, String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct StubState {
    replies: Mutex<VecDeque<StubReply>>,
    captured: Mutex<Vec<CapturedRequest>>,
}

pub struct GeminiStub {
    pub addr: SocketAddr,
    state: Arc<StubState>,
    _handle: JoinHandle<()>,
}

impl GeminiStub {
    pub async fn start(replies: Vec<StubReply>) -> std::io::Result<Self> {
        let state = Arc::new(StubState {
            replies: Mutex::new(replies.into()),
            captured: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1beta/models/test-model:generateContent", post(generate))
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}/v1beta/models/test-model:generateContent", self.addr)
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().clone()
    }
}

pub fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}
        ],
        "usageMetadata": {"promptTokenCount": 10}
    })
}

async fn generate(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.captured.lock().push(CapturedRequest { query, body });

    let reply = state
        .replies
        .lock()
        .pop_front()
        .unwrap_or(StubReply::Status(500));

    match reply {
        StubReply::Text(text) => Json(candidate_body(&text)).into_response(),
        StubReply::Raw(value) => Json(value).into_response(),
        StubReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "stub error").into_response()
        }
        StubReply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Json(candidate_body(&text)).into_response()
        }
    }
}
