//! `/climate` request handler.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    Json,
};

use crate::climate::{ClimateError, ClimateUseCase};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::ClimateServiceClient;

pub const HANDLER_SPAN: &str = "climate-handler";

/// Inbound header carrying the postal code.
pub const ZIP_CODE_HEADER: &str = "zip_code";

/// Relay a climate lookup to the upstream provider.
///
/// The upstream client and use case are built per request; nothing but the
/// immutable [`AppState`] is shared between requests.
pub async fn climate_handler(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    let start_time = Instant::now();

    let parent_cx = state.telemetry.extract(&headers);
    let span = state.telemetry.start_span(HANDLER_SPAN, &parent_cx);
    span.add_event("climate handler before usercase");

    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    span.set_attribute("http.request.method", method.to_string());
    span.set_attribute("request.id", request_id.to_string());

    tracing::info!(
        trace_id = %span.trace_id(),
        request_id = %request_id,
        method = %method,
        "Handling climate request"
    );

    let result = if method != Method::GET {
        Err(ClimateError::MethodNotAllowed)
    } else {
        match headers.get(ZIP_CODE_HEADER) {
            None => Err(ClimateError::MissingKeyHeader),
            Some(value) if value.is_empty() => Err(ClimateError::MissingKeyHeader),
            Some(value) => {
                // Non-UTF-8 bytes can never form a valid zip code; hand the
                // use case an empty key so it fails validation.
                let zip_code = value.to_str().unwrap_or_default();

                let service = ClimateServiceClient::new(
                    state.transport.clone(),
                    state.telemetry.clone(),
                    state.upstream.clone(),
                );
                let usecase = ClimateUseCase::new(service, state.telemetry.clone());

                usecase.get(span.context(), zip_code).await
            }
        }
    };

    let response = match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            span.record_failure(&e);
            tracing::debug!(trace_id = %span.trace_id(), error = %e, "Climate request failed");
            e.into_response()
        }
    };

    span.set_attribute("http.response.status_code", i64::from(response.status().as_u16()));
    metrics::record_request(response.status().as_u16(), start_time);
    response
}
