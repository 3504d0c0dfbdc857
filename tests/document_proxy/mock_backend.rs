//! Mock content backend for E2E tests.
//!
//! Starts an in-process HTTP server that answers each path with a
//! configured reply (404 by default) and counts hits per path.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Canned reply for one path.
#[derive(Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn ok(content_type: &str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.to_vec(),
            delay: None,
        }
    }

    pub fn ok_untyped(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: None,
            body: body.to_vec(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Shared state for the mock backend.
#[derive(Default)]
pub struct MockBackendState {
    pub replies: HashMap<String, MockReply>,
    pub hits: HashMap<String, usize>,
    pub order: Vec<String>,
}

async fn handle(req: HttpRequest, state: web::Data<Arc<Mutex<MockBackendState>>>) -> HttpResponse {
    let path = req.path().to_string();
    let reply = {
        let mut state = state.lock().unwrap();
        *state.hits.entry(path.clone()).or_insert(0) += 1;
        state.order.push(path.clone());
        state
            .replies
            .get(&path)
            .cloned()
            .unwrap_or_else(|| MockReply::status(404))
    };

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = HttpResponse::build(
        actix_web::http::StatusCode::from_u16(reply.status).unwrap(),
    );
    if let Some(content_type) = reply.content_type {
        builder.content_type(content_type);
    }
    builder.body(reply.body)
}

/// Mock content backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockBackendState>>,
}

impl MockBackend {
    /// Start the mock backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockBackendState::default()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .default_service(web::route().to(handle))
        })
        .listen(listener)
        .expect("failed to listen")
        .workers(1)
        .disable_signals()
        .run();

        // Fire and forget; the server lives for the process lifetime
        tokio::spawn(server);

        MockBackend { base_url, state }
    }

    /// Configure the reply for a path.
    pub fn reply(&self, path: &str, reply: MockReply) -> &Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .insert(path.to_string(), reply);
        self
    }

    /// Number of requests seen for a path.
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Every requested path, in arrival order.
    pub fn order(&self) -> Vec<String> {
        self.state.lock().unwrap().order.clone()
    }
}

/// Backend that writes canned raw HTTP/1.1 responses per path.
///
/// Used where a well-behaved server cannot produce the response, such as a
/// body shorter than its `Content-Length`. Unknown paths get a 404.
pub struct RawBackend {
    pub base_url: String,
    order: Arc<Mutex<Vec<String>>>,
}

impl RawBackend {
    pub async fn start(responses: Vec<(String, Vec<u8>)>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let responses: Arc<HashMap<String, Vec<u8>>> = Arc::new(responses.into_iter().collect());
        let order = Arc::new(Mutex::new(Vec::new()));

        let seen = order.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let responses = responses.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&head);
                    let path = head
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().unwrap().push(path.clone());

                    let reply = responses.get(&path).cloned().unwrap_or_else(|| {
                        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                            .to_vec()
                    });
                    let _ = stream.write_all(&reply).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        RawBackend { base_url, order }
    }

    /// Every requested path, in arrival order.
    pub fn order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}
