//! Values passed between the HTTP layer, the translator and the forwarder.

use axum::body::Bytes;
use axum::http::Method;

use crate::relay::headers::RelayHeaders;
use crate::relay::params::FormParams;

/// Caller IP used when the connection address is not known.
pub const UNKNOWN_CALLER: &str = "Unknown";

/// Body of the inbound request as handed over by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InboundBody {
    #[default]
    Empty,
    /// Unparsed bytes of a non-multipart POST.
    Raw(Bytes),
    /// Decoded text fields of a `multipart/form-data` POST.
    Multipart(FormParams),
}

/// Everything the relay needs to know about the caller's request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Destination URL as supplied by the caller, if any.
    pub destination: Option<String>,
    pub headers: RelayHeaders,
    pub query: FormParams,
    pub body: InboundBody,
    pub caller_ip: String,
    /// Declared content type of the body.
    pub content_type: Option<String>,
}

impl InboundRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            destination: None,
            headers: RelayHeaders::new(),
            query: FormParams::new(),
            body: InboundBody::Empty,
            caller_ip: UNKNOWN_CALLER.to_string(),
            content_type: None,
        }
    }

    /// Look up the destination parameter: query string first, then the
    /// decoded form body of a POST.
    pub fn locate_destination(&self, param: &str) -> Option<String> {
        if let Some(dest) = self.query.get(param).filter(|v| !v.is_empty()) {
            return Some(dest.to_string());
        }
        if self.method != Method::POST {
            return None;
        }
        match &self.body {
            InboundBody::Multipart(fields) => fields.get(param).map(str::to_string),
            InboundBody::Raw(bytes) if self.is_urlencoded_form() => {
                FormParams::parse(bytes).get(param).map(str::to_string)
            }
            _ => None,
        }
    }

    fn is_urlencoded_form(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                ct.to_ascii_lowercase()
                    .starts_with("application/x-www-form-urlencoded")
            })
            .unwrap_or(false)
    }
}

/// Methods the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    Get,
    Post,
}

impl RelayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMethod::Get => "GET",
            RelayMethod::Post => "POST",
        }
    }
}

impl TryFrom<&Method> for RelayMethod {
    type Error = String;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(RelayMethod::Get),
            Method::POST => Ok(RelayMethod::Post),
            _ => Err(method.to_string()),
        }
    }
}

impl std::fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the outbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutboundBody {
    #[default]
    None,
    Raw(Bytes),
    /// Field map, encoded as multipart by the client.
    Fields(FormParams),
}

/// Description of the call the forwarder makes to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: RelayMethod,
    pub url: String,
    pub headers: RelayHeaders,
    pub body: OutboundBody,
}

/// Outcome of a successful relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResult {
    /// Request head as transmitted, for diagnostics.
    pub request_head: String,
    /// Final response header block, status line first, as received.
    pub header_lines: Vec<Bytes>,
    pub body: Bytes,
    /// Lowercased media type without parameters.
    pub content_type: Option<String>,
    /// Lowercased content coding.
    pub content_encoding: Option<String>,
}

impl RelayResult {
    pub fn status_line(&self) -> Option<&[u8]> {
        self.header_lines.first().map(|line| &line[..])
    }
}
