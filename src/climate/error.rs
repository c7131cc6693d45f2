//! Caller-facing error taxonomy for climate lookups.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::upstream::TransportError;

/// Body returned for every 5xx so no internal detail reaches the caller.
const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Errors produced anywhere in the climate pipeline.
///
/// Lower layers return these unchanged; only the HTTP boundary turns them
/// into a status code via [`IntoResponse`].
#[derive(Debug, Error)]
pub enum ClimateError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("zip_code header is missing")]
    MissingKeyHeader,

    #[error("invalid zipcode")]
    InvalidKey,

    #[error("can not find zipcode")]
    NotFound,

    /// The upstream provider could not be reached or refused the request.
    #[error("climate service unavailable: {0}")]
    UpstreamUnavailable(#[source] UpstreamFailure),

    /// The upstream answered 200 with a body that is not a climate record.
    #[error("malformed climate service response: {0}")]
    MalformedUpstreamResponse(#[source] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Why the upstream provider was considered unavailable.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    #[error("upstream answered with status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClimateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClimateError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ClimateError::MissingKeyHeader => StatusCode::BAD_REQUEST,
            ClimateError::InvalidKey => StatusCode::UNPROCESSABLE_ENTITY,
            ClimateError::NotFound => StatusCode::NOT_FOUND,
            ClimateError::UpstreamUnavailable(_)
            | ClimateError::MalformedUpstreamResponse(_)
            | ClimateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and span attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            ClimateError::MethodNotAllowed => "method_not_allowed",
            ClimateError::MissingKeyHeader => "missing_key_header",
            ClimateError::InvalidKey => "invalid_key",
            ClimateError::NotFound => "not_found",
            ClimateError::UpstreamUnavailable(_) => "upstream_unavailable",
            ClimateError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            ClimateError::Internal(_) => "internal",
        }
    }
}

impl From<UpstreamFailure> for ClimateError {
    fn from(failure: UpstreamFailure) -> Self {
        ClimateError::UpstreamUnavailable(failure)
    }
}

impl From<TransportError> for ClimateError {
    fn from(err: TransportError) -> Self {
        ClimateError::UpstreamUnavailable(UpstreamFailure::Transport(err))
    }
}

impl IntoResponse for ClimateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Climate request failed");
            return (status, INTERNAL_ERROR_BODY).into_response();
        }

        (status, self.to_string()).into_response()
    }
}
