//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, Request, Response, StatusCode};
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use climate_relay::upstream::{Transport, TransportError};
use climate_relay::Telemetry;

pub const SAMPLE_RECORD: &str = r#"{"city":"São Paulo","temp_C":28.5,"temp_F":83.3,"temp_K":301.65}"#;

/// What the fake transport answers with.
#[derive(Clone)]
pub enum FakeReply {
    Respond(StatusCode, &'static str),
    ConnectionRefused,
}

/// Transport double that records every request it is asked to send.
pub struct FakeTransport {
    reply: FakeReply,
    calls: AtomicUsize,
    seen: Mutex<Vec<HeaderMap>>,
}

impl FakeTransport {
    pub fn new(reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &'static str) -> Arc<Self> {
        Self::new(FakeReply::Respond(StatusCode::OK, body))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Headers of every request sent so far.
    pub fn seen_headers(&self) -> Vec<HeaderMap> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request<()>) -> Result<Response<Bytes>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.headers().clone());

        match &self.reply {
            FakeReply::Respond(status, body) => Ok(Response::builder()
                .status(*status)
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap()),
            FakeReply::ConnectionRefused => Err(TransportError::Connect(
                "tcp connect error: Connection refused (os error 111)".into(),
            )),
        }
    }
}

/// Telemetry whose finished spans land in the returned exporter.
pub fn in_memory_telemetry() -> (Telemetry, InMemorySpanExporter) {
    let exporter = InMemorySpanExporter::default();
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    (Telemetry::from_provider(provider), exporter)
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the raw request head and returns the status and body to
/// answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();

                        let (status, body) = f(head).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
