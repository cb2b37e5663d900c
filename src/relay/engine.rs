//! Translate-then-forward pipeline for a single inbound request.

use std::time::Instant;

use crate::relay::client::UpstreamClient;
use crate::relay::error::RelayFailure;
use crate::relay::forwarder::Forwarder;
use crate::relay::translator::Translator;
use crate::relay::types::{InboundRequest, RelayResult};

/// The relay core. Holds no mutable state; one instance serves all requests.
#[derive(Debug, Clone)]
pub struct Relay<C> {
    translator: Translator,
    forwarder: Forwarder<C>,
}

impl<C: UpstreamClient> Relay<C> {
    pub fn new(translator: Translator, client: C) -> Self {
        Self {
            translator,
            forwarder: Forwarder::new(client),
        }
    }

    pub fn client(&self) -> &C {
        self.forwarder.client()
    }

    /// Relay one request. Nothing is sent if translation fails.
    pub async fn relay(&self, inbound: &InboundRequest) -> Result<RelayResult, RelayFailure> {
        let start = Instant::now();

        let outbound = match self.translator.translate(inbound) {
            Ok(outbound) => outbound,
            Err(failure) => {
                tracing::warn!(
                    method = %inbound.method,
                    caller = %inbound.caller_ip,
                    error = %failure,
                    "Rejecting relay request"
                );
                return Err(failure);
            }
        };

        tracing::debug!(
            method = %outbound.method,
            url = %outbound.url,
            headers = outbound.headers.len(),
            "Forwarding request"
        );

        match self.forwarder.forward(&outbound).await {
            Ok(result) => {
                tracing::debug!(request_head = %result.request_head, "Request sent");
                tracing::info!(
                    method = %outbound.method,
                    url = %outbound.url,
                    status = %String::from_utf8_lossy(result.status_line().unwrap_or_default()),
                    body_bytes = result.body.len(),
                    content_type = result.content_type.as_deref().unwrap_or("-"),
                    content_encoding = result.content_encoding.as_deref().unwrap_or("-"),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Relay complete"
                );
                Ok(result)
            }
            Err(failure) => {
                tracing::error!(
                    method = %outbound.method,
                    url = %outbound.url,
                    error = %failure,
                    "Upstream error"
                );
                Err(failure)
            }
        }
    }
}
