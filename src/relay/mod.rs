//! Relay core: request translation and forwarding.
//!
//! # Data Flow
//! ```text
//! InboundRequest (built by the http layer)
//!     → translator.rs (method/destination checks, header rules, body assembly)
//!     → OutboundRequest
//!     → forwarder.rs (one call through client.rs, 100-Continue strip, head/body split)
//!     → RelayResult | RelayFailure
//!     → http/response.rs (emission, minus Transfer-Encoding)
//! ```
//!
//! # Design Decisions
//! - No shared mutable state; every value is local to one call
//! - Exactly one outbound call per inbound request, never retried
//! - Only the connect phase is time-bounded
//! - Any status returned by the destination is relayed, not treated as failure

pub mod classify;
pub mod client;
pub mod engine;
pub mod error;
pub mod forwarder;
pub mod headers;
pub mod params;
pub mod translator;
pub mod types;

pub use client::{HttpClient, HttpClientOptions, RawExchange, UpstreamClient};
pub use engine::Relay;
pub use error::{ClientError, ClientErrorKind, InvalidReason, RelayFailure};
pub use headers::RelayHeaders;
pub use params::FormParams;
pub use translator::Translator;
pub use types::{InboundBody, InboundRequest, OutboundBody, OutboundRequest, RelayMethod, RelayResult};
