//! Outbound HTTP client boundary.
//!
//! The forwarder only needs two things from a client: the raw bytes of the
//! final exchange and the request head that went out. [`HttpClient`] provides
//! them on top of reqwest; tests substitute their own [`UpstreamClient`].

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use reqwest::{Method, Version};

use crate::relay::error::ClientError;
use crate::relay::headers;
use crate::relay::types::{OutboundBody, OutboundRequest, RelayMethod};

/// Connect timeout applied when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw result of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExchange {
    /// Request line and headers as transmitted.
    pub request_head: String,
    /// Status line, header block, blank line and body.
    pub response: Bytes,
}

/// Executes a single outbound request.
pub trait UpstreamClient: Send + Sync {
    fn execute(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<RawExchange, ClientError>> + Send;
}

/// Settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub connect_timeout: Duration,
    /// `User-Agent` sent when the caller supplied none.
    pub user_agent: Option<String>,
    /// Route through proxies named in the environment.
    pub system_proxy: bool,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
            system_proxy: true,
        }
    }
}

/// reqwest-backed client: no redirects, no pooled connections, no total
/// timeout, connect phase bounded.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(options: HttpClientOptions) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .redirect(Policy::none())
            .pool_max_idle_per_host(0);

        if !options.system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(agent) = options.user_agent.filter(|a| !a.is_empty()) {
            builder = builder.user_agent(agent);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    fn build_request(&self, request: &OutboundRequest) -> Result<reqwest::Request, ClientError> {
        let method = match request.method {
            RelayMethod::Get => Method::GET,
            RelayMethod::Post => Method::POST,
        };
        let mut builder = self.client.request(method, &request.url);

        // A field map gets its content type (with boundary) from the multipart encoder.
        let is_field_map = matches!(request.body, OutboundBody::Fields(_));
        for (name, value) in request.headers.iter() {
            if is_field_map && name == headers::CONTENT_TYPE {
                continue;
            }
            builder = builder.header(name, value);
        }

        builder = match &request.body {
            OutboundBody::None => builder,
            OutboundBody::Raw(bytes) => builder.body(bytes.clone()),
            OutboundBody::Fields(fields) => {
                let form = fields
                    .iter()
                    .fold(reqwest::multipart::Form::new(), |form, (k, v)| {
                        form.text(k.to_string(), v.to_string())
                    });
                builder.multipart(form)
            }
        };

        Ok(builder.build()?)
    }
}

impl UpstreamClient for HttpClient {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawExchange, ClientError> {
        let outbound = self.build_request(request)?;
        let request_head = render_request_head(&outbound);

        let response = self.client.execute(outbound).await?;
        let mut raw = render_response_head(&response);
        let body = response.bytes().await?;
        raw.extend_from_slice(&body);

        Ok(RawExchange {
            request_head,
            response: Bytes::from(raw),
        })
    }
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/1.1",
    }
}

/// Request line, `Host` and the headers attached to the built request.
fn render_request_head(request: &reqwest::Request) -> String {
    let url = request.url();
    let target = &url[url::Position::BeforePath..url::Position::AfterQuery];
    let mut head = format!("{} {} HTTP/1.1\r\n", request.method(), target);

    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => head.push_str(&format!("Host: {}:{}\r\n", host, port)),
            None => head.push_str(&format!("Host: {}\r\n", host)),
        }
    }
    for (name, value) in request.headers() {
        head.push_str(&format!(
            "{}: {}\r\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    if let Some(len) = request.body().and_then(|b| b.as_bytes()).map(<[u8]>::len) {
        head.push_str(&format!("Content-Length: {}\r\n", len));
    }
    head.trim_end().to_string()
}

/// Status line and header block in wire form, ending with the blank line.
/// hyper only records the reason phrase when it differs from the canonical one.
fn render_response_head(response: &reqwest::Response) -> Vec<u8> {
    let status = response.status();
    let mut raw = format!("{} {}", version_str(response.version()), status.as_u16()).into_bytes();
    let reason = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(ReasonPhrase::as_bytes)
        .or_else(|| status.canonical_reason().map(str::as_bytes));
    if let Some(reason) = reason {
        raw.push(b' ');
        raw.extend_from_slice(reason);
    }
    raw.extend_from_slice(b"\r\n");

    for (name, value) in response.headers() {
        raw.extend_from_slice(name.as_str().as_bytes());
        raw.extend_from_slice(b": ");
        raw.extend_from_slice(value.as_bytes());
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(b"\r\n");
    raw
}
