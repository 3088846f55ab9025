// src/test_utils/mock_gemini_server.rs
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::post, Router};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A canned reply: status, raw body, and how long to stall before sending it.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        Self::raw(200, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The `{model}:generateContent` path segment.
    pub call: String,
    pub key: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockServerState {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn generate_content_handler(
    State(state): State<MockServerState>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse {
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    log::debug!("Mock Gemini server received request for {}", call);
    state.requests.lock().unwrap().push(RecordedRequest {
        call,
        key: query.get("key").cloned(),
        body,
    });

    let reply = state.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
            (status, reply.body)
        }
        None => {
            log::error!("Mock Gemini server ran out of replies!");
            (StatusCode::SERVICE_UNAVAILABLE, String::new())
        }
    }
}

pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGeminiServer {
    pub async fn start(replies: Vec<MockReply>) -> Self {
        let state = MockServerState {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let recorded_requests = state.requests.clone();

        let app = Router::new()
            .route("/models/{call}", post(generate_content_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock Gemini server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock Gemini server error: {}", e);
                });
        });

        MockGeminiServer {
            addr,
            shutdown_tx,
            recorded_requests,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock Gemini server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }
}
