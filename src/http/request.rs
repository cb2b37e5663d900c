//! Request identification and inbound request extraction.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) for log correlation
//! - Turn an axum request into an explicit [`InboundRequest`]
//!
//! # Design Decisions
//! - The request ID lives in a reserved header that is never forwarded
//! - Bodies are only read for POST; other methods are rejected by the
//!   translator without touching the body

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequest, Multipart},
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::relay::types::UNKNOWN_CALLER;
use crate::relay::{FormParams, InboundBody, InboundRequest};

/// Header carrying the relay's own request ID. Reserved: never forwarded.
pub const X_RELAY_REQUEST_ID: HeaderName = HeaderName::from_static("x-relay-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRelayRequestId;

impl MakeRequestId for MakeRelayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Failure to read the inbound request before relaying.
#[derive(Debug, thiserror::Error)]
pub enum InboundError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

impl IntoResponse for InboundError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, "Bad Request").into_response()
    }
}

/// Build an [`InboundRequest`] from the raw axum request.
pub async fn read_inbound(
    request: Request<Body>,
    destination_param: &str,
    max_body_bytes: usize,
) -> Result<InboundRequest, InboundError> {
    let mut inbound = InboundRequest::new(request.method().clone());

    inbound.caller_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CALLER.to_string());

    for (name, value) in request.headers() {
        if *name == X_RELAY_REQUEST_ID {
            continue;
        }
        inbound.headers.append(name.as_str(), value.as_bytes());
    }

    inbound.content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    inbound.query = FormParams::parse(request.uri().query().unwrap_or_default().as_bytes());

    if inbound.method == Method::POST {
        inbound.body = if is_multipart(inbound.content_type.as_deref()) {
            InboundBody::Multipart(read_multipart(request).await?)
        } else {
            let bytes = axum::body::to_bytes(request.into_body(), max_body_bytes)
                .await
                .map_err(|e| InboundError::Body(e.to_string()))?;
            InboundBody::Raw(bytes)
        };
    }

    inbound.destination = inbound.locate_destination(destination_param);
    Ok(inbound)
}

fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Decode text fields. File parts are not form fields and are skipped.
async fn read_multipart(request: Request<Body>) -> Result<FormParams, InboundError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| InboundError::Multipart(e.body_text()))?;

    let mut fields = FormParams::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| InboundError::Multipart(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if let Some(file_name) = field.file_name() {
            tracing::debug!(field = %name, file_name = %file_name, "Skipping file part");
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| InboundError::Multipart(e.body_text()))?;
        fields.set(name, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_get_request() {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri("/?endpoint=http%3A%2F%2Fdest.test%2F&q=a+b")
            .header("user-agent", "tests")
            .header("x-relay-request-id", "internal")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([198, 51, 100, 4], 5000))));

        let inbound = read_inbound(request, "endpoint", 1024).await.unwrap();
        assert_eq!(inbound.caller_ip, "198.51.100.4");
        assert_eq!(inbound.destination.as_deref(), Some("http://dest.test/"));
        assert_eq!(inbound.query.get("q"), Some("a b"));
        assert_eq!(inbound.headers.get_str("User-Agent"), Some("tests"));
        assert!(!inbound.headers.contains("X-Relay-Request-Id"));
        assert_eq!(inbound.body, InboundBody::Empty);
    }

    #[tokio::test]
    async fn keeps_non_utf8_header_values() {
        let request = Request::builder()
            .uri("/?endpoint=http://dest.test/")
            .header("x-name", HeaderValue::from_bytes(b"caf\xe9").unwrap())
            .header("accept", "text/html")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();

        let inbound = read_inbound(request, "endpoint", 1024).await.unwrap();
        assert_eq!(inbound.headers.get("X-Name"), Some(b"caf\xe9".as_slice()));
        assert_eq!(inbound.headers.get_str("Accept"), Some("text/html, application/json"));
    }

    #[tokio::test]
    async fn missing_connect_info_is_unknown_caller() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let inbound = read_inbound(request, "endpoint", 1024).await.unwrap();
        assert_eq!(inbound.caller_ip, "Unknown");
        assert_eq!(inbound.destination, None);
    }

    #[tokio::test]
    async fn reads_raw_post_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/?endpoint=http://dest.test/")
            .header("content-type", "application/json")
            .body(Body::from("{\"a\":1}"))
            .unwrap();

        let inbound = read_inbound(request, "endpoint", 1024).await.unwrap();
        assert_eq!(inbound.content_type.as_deref(), Some("application/json"));
        assert_eq!(inbound.body, InboundBody::Raw(axum::body::Bytes::from_static(b"{\"a\":1}")));
    }

    #[tokio::test]
    async fn reads_multipart_fields() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"endpoint\"\r\n\r\n\
            http://upload.test/\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\r\n\
            hello\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"doc\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            file contents\r\n\
            --XYZ--\r\n";
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();

        let inbound = read_inbound(request, "endpoint", 1024 * 1024).await.unwrap();
        assert_eq!(inbound.destination.as_deref(), Some("http://upload.test/"));
        match inbound.body {
            InboundBody::Multipart(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields.get("title"), Some("hello"));
            }
            other => panic!("expected multipart fields, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        assert!(matches!(
            read_inbound(request, "endpoint", 16).await,
            Err(InboundError::Body(_))
        ));
    }

    #[test]
    fn request_ids_are_uuids() {
        let request = Request::builder().body(()).unwrap();
        let id = MakeRelayRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
