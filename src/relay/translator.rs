//! Inbound request → outbound request description.
//!
//! Pure function of its input: no I/O, no clock, no shared state.

use axum::body::Bytes;
use url::Url;

use crate::relay::error::{InvalidReason, RelayFailure};
use crate::relay::headers::{self, RelayHeaders};
use crate::relay::params::FormParams;
use crate::relay::types::{InboundBody, InboundRequest, OutboundBody, OutboundRequest, RelayMethod};

/// Content type sent for forwarded multipart field maps.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Default name of the parameter carrying the destination URL.
pub const DEFAULT_DESTINATION_PARAM: &str = "endpoint";

/// Builds [`OutboundRequest`]s from [`InboundRequest`]s.
#[derive(Debug, Clone)]
pub struct Translator {
    destination_param: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_DESTINATION_PARAM)
    }
}

impl Translator {
    pub fn new(destination_param: impl Into<String>) -> Self {
        Self {
            destination_param: destination_param.into(),
        }
    }

    pub fn translate(&self, inbound: &InboundRequest) -> Result<OutboundRequest, RelayFailure> {
        let method = RelayMethod::try_from(&inbound.method)
            .map_err(InvalidReason::UnsupportedMethod)?;

        let destination = validate_destination(inbound.destination.as_deref())?;
        let headers = forward_headers(inbound);

        let outbound = match method {
            RelayMethod::Get => {
                let mut query = inbound.query.clone();
                query.remove(&self.destination_param);
                OutboundRequest {
                    method,
                    url: append_query(destination, &query),
                    headers,
                    body: OutboundBody::None,
                }
            }
            RelayMethod::Post => {
                let mut headers = headers;
                let body = if is_multipart(&headers) {
                    let mut fields = match &inbound.body {
                        InboundBody::Multipart(fields) => fields.clone(),
                        _ => FormParams::new(),
                    };
                    fields.remove(&self.destination_param);
                    headers.set(headers::CONTENT_TYPE, MULTIPART_FORM_DATA);
                    OutboundBody::Fields(fields)
                } else {
                    match &inbound.body {
                        InboundBody::Raw(bytes) => OutboundBody::Raw(bytes.clone()),
                        _ => OutboundBody::Raw(Bytes::new()),
                    }
                };
                OutboundRequest {
                    method,
                    url: destination.to_string(),
                    headers,
                    body,
                }
            }
        };

        Ok(outbound)
    }
}

/// Destination must be present and an absolute URL with a host.
fn validate_destination(destination: Option<&str>) -> Result<&str, InvalidReason> {
    let destination = match destination {
        Some(d) if !d.trim().is_empty() => d,
        _ => return Err(InvalidReason::MissingDestination),
    };

    match Url::parse(destination) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(destination),
        _ => Err(InvalidReason::InvalidDestination(destination.to_string())),
    }
}

/// Copy the caller's headers minus hop headers, apply the declared content
/// type and prepend the caller to `X-Forwarded-For`.
fn forward_headers(inbound: &InboundRequest) -> RelayHeaders {
    let mut headers = inbound.headers.clone();

    for name in headers::STRIPPED_HEADERS {
        headers.remove(name);
    }

    if let Some(content_type) = inbound.content_type.as_deref().filter(|ct| !ct.is_empty()) {
        headers.set(headers::CONTENT_TYPE, content_type);
    }

    let forwarded_for = match headers.get(headers::X_FORWARDED_FOR) {
        Some(prior) => [inbound.caller_ip.as_bytes(), b",", prior].concat(),
        None => inbound.caller_ip.clone().into_bytes(),
    };
    headers.set(headers::X_FORWARDED_FOR, forwarded_for);

    headers
}

fn is_multipart(headers: &RelayHeaders) -> bool {
    headers
        .get(headers::CONTENT_TYPE)
        .and_then(|ct| ct.get(..MULTIPART_FORM_DATA.len()))
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MULTIPART_FORM_DATA.as_bytes()))
}

/// Append encoded parameters, keeping any query already on the destination.
fn append_query(destination: &str, query: &FormParams) -> String {
    if query.is_empty() {
        return destination.to_string();
    }
    let separator = if destination.contains('?') { '&' } else { '?' };
    format!("{}{}{}", destination, separator, query.to_query_string())
}
