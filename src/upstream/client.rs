//! Client for the upstream climate provider.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{Method, Request, StatusCode};
use opentelemetry::Context;

use crate::climate::{ClimateError, ClimateGateway, ClimateRecord, UpstreamFailure, ZipCode};
use crate::config::UpstreamConfig;
use crate::observability::{metrics, Telemetry};
use crate::upstream::transport::Transport;

pub const SERVICE_SPAN: &str = "climate-service";

/// Header carrying the postal code to the upstream provider.
pub const ZIP_CODE_HEADER: &str = "zip_code";

/// Header carrying the correlation id to the upstream provider.
pub const CORRELATION_HEADER: &str = "x-request-id";

/// Fetches climate records from the upstream provider over a [`Transport`].
pub struct ClimateServiceClient {
    transport: Arc<dyn Transport>,
    telemetry: Telemetry,
    config: Arc<UpstreamConfig>,
}

impl ClimateServiceClient {
    pub fn new(transport: Arc<dyn Transport>, telemetry: Telemetry, config: Arc<UpstreamConfig>) -> Self {
        Self {
            transport,
            telemetry,
            config,
        }
    }

    fn build_request(&self, cx: &Context, zip_code: &ZipCode) -> Result<Request<()>, ClimateError> {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(self.config.url.as_str())
            .header(ZIP_CODE_HEADER, zip_code.as_str())
            .header(CORRELATION_HEADER, self.config.correlation_id.as_str())
            .body(())
            .map_err(|e| ClimateError::Internal(format!("failed to build upstream request: {e}")))?;

        self.telemetry.inject(cx, request.headers_mut());
        Ok(request)
    }
}

/// Turn a buffered upstream response into a record or a pipeline error.
fn decode_response(status: StatusCode, body: &Bytes) -> Result<ClimateRecord, ClimateError> {
    if status != StatusCode::OK {
        return Err(UpstreamFailure::Status(status).into());
    }

    let record: Option<ClimateRecord> =
        serde_json::from_slice(body).map_err(ClimateError::MalformedUpstreamResponse)?;

    match record {
        Some(record) if !record.is_empty() => Ok(record),
        _ => Err(ClimateError::NotFound),
    }
}

#[async_trait]
impl ClimateGateway for ClimateServiceClient {
    async fn fetch_climate(&self, cx: &Context, zip_code: &ZipCode) -> Result<ClimateRecord, ClimateError> {
        let span = self.telemetry.start_span(SERVICE_SPAN, cx);
        span.add_event("get climate service");
        span.set_attribute("climate.zip_code", zip_code.to_string());

        tracing::info!(
            trace_id = %span.trace_id(),
            zip_code = %zip_code,
            upstream = %self.config.url,
            "Fetching climate from upstream"
        );

        let result = match self.build_request(span.context(), zip_code) {
            Ok(request) => match self.transport.send(request).await {
                Ok(response) => {
                    span.set_attribute("http.response.status_code", i64::from(response.status().as_u16()));
                    decode_response(response.status(), response.body())
                }
                Err(e) => {
                    tracing::warn!(trace_id = %span.trace_id(), error = %e, "Upstream transport error");
                    Err(e.into())
                }
            },
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => metrics::record_upstream("ok"),
            Err(e) => {
                metrics::record_upstream(e.kind());
                span.record_failure(e);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_record() {
        let body = Bytes::from_static(br#"{"city":"Salvador","temp_C":30.1,"temp_F":86.18,"temp_K":303.25}"#);
        let record = decode_response(StatusCode::OK, &body).unwrap();
        assert_eq!(record.city, "Salvador");
        assert_eq!(record.temp_k, 303.25);
    }

    #[test]
    fn test_decode_default_record_is_not_found() {
        for body in [&b"{}"[..], br#"{"city":"","temp_C":0,"temp_F":0,"temp_K":0}"#, b"null"] {
            let err = decode_response(StatusCode::OK, &Bytes::from_static(body)).unwrap_err();
            assert!(matches!(err, ClimateError::NotFound));
        }
    }

    #[test]
    fn test_decode_non_ok_status() {
        for status in [StatusCode::CREATED, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let err = decode_response(status, &Bytes::from_static(b"{}")).unwrap_err();
            assert!(matches!(
                err,
                ClimateError::UpstreamUnavailable(UpstreamFailure::Status(s)) if s == status
            ));
        }
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_response(StatusCode::OK, &Bytes::from_static(b"<html>")).unwrap_err();
        assert!(matches!(err, ClimateError::MalformedUpstreamResponse(_)));
    }
}
