//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Send one request to the upstream provider and buffer its response
//! - Enforce the upstream deadline and body size limit
//! - Classify transport failures (connect, timeout, body read)
//!
//! # Design Decisions
//! - The [`Transport`] trait is the seam tests use to substitute a fake
//! - Dropping the in-flight future abandons the call and closes its socket

use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::time;

use crate::config::UpstreamConfig;

/// Failure below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream request timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to connect to upstream: {0}")]
    Connect(String),

    #[error("failed to read upstream response body: {0}")]
    Body(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

/// Capability to execute a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<()>) -> Result<Response<Bytes>, TransportError>;
}

/// [`Transport`] backed by a hyper-util client.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    timeout_secs: u64,
    max_body_bytes: usize,
}

impl HyperTransport {
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            timeout_secs: config.timeout_secs,
            max_body_bytes: config.max_body_bytes,
        }
    }

    async fn exchange(&self, request: Request<()>) -> Result<Response<Bytes>, TransportError> {
        let request = request.map(|()| Body::empty());

        let response = self.client.request(request).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(Response::from_parts(parts, bytes))
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<()>) -> Result<Response<Bytes>, TransportError> {
        match time::timeout(self.timeout, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config() -> UpstreamConfig {
        UpstreamConfig {
            timeout_secs: 1,
            connect_timeout_secs: 1,
            ..UpstreamConfig::default()
        }
    }

    async fn serve_once(raw_response: &'static str) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(raw_response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_buffers_response() {
        let addr = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}").await;
        let transport = HyperTransport::new(&config());

        let request = Request::get(format!("http://{addr}/climate")).body(()).unwrap();
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"{}");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HyperTransport::new(&config());
        let request = Request::get(format!("http://{addr}/climate")).body(()).unwrap();
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_silent_upstream_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            time::sleep(Duration::from_secs(5)).await;
        });

        let transport = HyperTransport::new(&config());
        let request = Request::get(format!("http://{addr}/climate")).body(()).unwrap();
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let addr = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n0123456789").await;
        let transport = HyperTransport::new(&UpstreamConfig {
            max_body_bytes: 4,
            ..config()
        });

        let request = Request::get(format!("http://{addr}/climate")).body(()).unwrap();
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Body(_)));
    }
}
