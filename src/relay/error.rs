//! Relay failure taxonomy.
//!
//! Only two outcomes leave the core as failures: the caller asked for something
//! we cannot relay, or the destination could not be reached. A destination that
//! answers with any status code is a successful relay.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why a request was rejected before any outbound call was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("method {0} is not supported")]
    UnsupportedMethod(String),
    #[error("destination URL is missing")]
    MissingDestination,
    #[error("destination URL {0:?} is not a valid absolute URL")]
    InvalidDestination(String),
}

/// Transport-level failure category reported by the outbound client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    Connect,
    Timeout,
    Request,
    Body,
    Builder,
    Other,
}

impl ClientErrorKind {
    /// Stable code used in logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            ClientErrorKind::Connect => "connect",
            ClientErrorKind::Timeout => "timeout",
            ClientErrorKind::Request => "request",
            ClientErrorKind::Body => "body",
            ClientErrorKind::Builder => "builder",
            ClientErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned by an [`UpstreamClient`](super::client::UpstreamClient).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_connect() {
            ClientErrorKind::Connect
        } else if e.is_timeout() {
            ClientErrorKind::Timeout
        } else if e.is_builder() {
            ClientErrorKind::Builder
        } else if e.is_body() || e.is_decode() {
            ClientErrorKind::Body
        } else if e.is_request() {
            ClientErrorKind::Request
        } else {
            ClientErrorKind::Other
        };

        // reqwest's Display omits the source chain (DNS, TLS, refused...).
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        Self { kind, message }
    }
}

/// Relay-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayFailure {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] InvalidReason),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] ClientError),
}

impl RelayFailure {
    /// Status code surfaced to the original caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayFailure::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayFailure::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayFailure::InvalidRequest(_) => "invalid_request",
            RelayFailure::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }
}

impl IntoResponse for RelayFailure {
    fn into_response(self) -> Response {
        let body = match self {
            RelayFailure::InvalidRequest(_) => "Bad Request",
            RelayFailure::UpstreamUnavailable(_) => "Upstream request failed",
        };
        (self.status_code(), body).into_response()
    }
}
