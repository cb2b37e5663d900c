//! Response emission.
//!
//! # Responsibilities
//! - Turn a [`RelayResult`] into the response sent to the original caller
//! - Relay the destination's status line and header lines in order
//! - Drop `Transfer-Encoding`; the body is already fully materialized
//!
//! # Design Decisions
//! - Header values are copied as bytes, so obs-text survives the hop
//! - A non-canonical reason phrase is handed to hyper as a
//!   [`ReasonPhrase`] extension and written back on HTTP/1.1
//! - Header lines that are not valid HTTP headers are skipped, not fatal
//! - An unreadable status line is a gateway error (502)

use axum::{
    body::{Body, Bytes},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use hyper::ext::ReasonPhrase;

use crate::relay::classify::{is_transfer_encoding, parse_status_line, split_header_line, ContentInfo};
use crate::relay::RelayResult;

/// Header lines re-emitted to the caller: everything after the status line
/// except `Transfer-Encoding`, in original order.
pub fn emitted_lines(header_lines: &[Bytes]) -> Vec<&[u8]> {
    header_lines
        .iter()
        .skip(1)
        .map(|line| &line[..])
        .filter(|line| !is_transfer_encoding(line))
        .collect()
}

/// Build the caller-facing response.
pub fn emit(result: RelayResult) -> Response {
    let parsed = result.status_line().and_then(parse_status_line).and_then(|(code, reason)| {
        Some((StatusCode::from_u16(code).ok()?, reason))
    });

    let Some((status, reason)) = parsed else {
        tracing::warn!(
            status_line = %String::from_utf8_lossy(result.status_line().unwrap_or_default()),
            "Unreadable upstream status line"
        );
        return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
    };

    let info = ContentInfo {
        content_type: result.content_type.clone(),
        content_encoding: result.content_encoding.clone(),
    };
    tracing::debug!(
        status = status.as_u16(),
        textual = info.is_textual(),
        body_bytes = result.body.len(),
        "Emitting relayed response"
    );

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;

    if let Some(phrase) = custom_reason(status, reason) {
        response.extensions_mut().insert(phrase);
    }

    let headers = response.headers_mut();
    for line in emitted_lines(&result.header_lines) {
        let parsed = split_header_line(line).and_then(|(name, value)| {
            Some((
                HeaderName::from_bytes(name).ok()?,
                HeaderValue::from_bytes(value).ok()?,
            ))
        });
        match parsed {
            Some((name, value)) => {
                headers.append(name, value);
            }
            None => tracing::warn!(
                line = %String::from_utf8_lossy(line),
                "Skipping malformed upstream header"
            ),
        }
    }

    *response.body_mut() = Body::from(result.body);
    response
}

/// Reason phrase to write instead of the canonical one, if the destination
/// sent a different one.
fn custom_reason(status: StatusCode, reason: &[u8]) -> Option<ReasonPhrase> {
    if reason.is_empty() || status.canonical_reason().map(str::as_bytes) == Some(reason) {
        return None;
    }
    ReasonPhrase::try_from(reason).ok()
}
