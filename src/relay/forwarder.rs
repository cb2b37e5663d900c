//! Outbound call execution and raw response normalization.

use axum::body::Bytes;

use crate::relay::classify::ContentInfo;
use crate::relay::client::{RawExchange, UpstreamClient};
use crate::relay::error::RelayFailure;
use crate::relay::types::{OutboundRequest, RelayResult};

/// Interim response some destinations send before the real one.
pub const CONTINUE_PREAMBLE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Runs one outbound call per request and turns the raw exchange into a
/// [`RelayResult`].
#[derive(Debug, Clone)]
pub struct Forwarder<C> {
    client: C,
}

impl<C: UpstreamClient> Forwarder<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute the request. Transport failures become
    /// [`RelayFailure::UpstreamUnavailable`]; any HTTP status is a success.
    pub async fn forward(&self, request: &OutboundRequest) -> Result<RelayResult, RelayFailure> {
        let exchange = self.client.execute(request).await?;
        Ok(normalize(exchange))
    }
}

/// Strip the `100 Continue` preamble, split head from body and classify.
pub fn normalize(exchange: RawExchange) -> RelayResult {
    let (header_lines, body) = split_response(&exchange.response);
    let info = ContentInfo::from_lines(header_lines.iter().map(|line| &line[..]));

    RelayResult {
        request_head: exchange.request_head.trim_end().to_string(),
        header_lines,
        body,
        content_type: info.content_type,
        content_encoding: info.content_encoding,
    }
}

/// Split a raw response at the first blank line. Without one, everything is
/// header block and the body is empty. Header lines are slices of the
/// original bytes.
pub fn split_response(raw: &Bytes) -> (Vec<Bytes>, Bytes) {
    let raw = if raw.starts_with(CONTINUE_PREAMBLE) {
        raw.slice(CONTINUE_PREAMBLE.len()..)
    } else {
        raw.clone()
    };

    let (head, body) = match find_subsequence(&raw, HEADER_TERMINATOR) {
        Some(pos) => (raw.slice(..pos), raw.slice(pos + HEADER_TERMINATOR.len()..)),
        None => (raw.clone(), Bytes::new()),
    };

    let lines = head
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(|line| head.slice_ref(line))
        .collect();

    (lines, body)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
