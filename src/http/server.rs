//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler on every path
//! - Wire up middleware (tracing, body limit, request ID)
//! - Bind server to listener with graceful shutdown
//! - Hand each request to the relay core and emit the result

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ForwardingConfig, RelayConfig};
use crate::http::request::{read_inbound, MakeRelayRequestId, X_RELAY_REQUEST_ID};
use crate::http::response::emit;
use crate::observability::metrics;
use crate::relay::{ClientError, HttpClient, HttpClientOptions, Relay, Translator, UpstreamClient};

/// Application state injected into handlers.
pub struct AppState<C> {
    pub relay: Arc<Relay<C>>,
    pub destination_param: Arc<str>,
    pub max_body_bytes: usize,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            destination_param: Arc::clone(&self.destination_param),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server backed by the reqwest client.
    pub fn new(config: RelayConfig) -> Result<Self, ClientError> {
        let client = HttpClient::new(HttpClientOptions {
            connect_timeout: config.relay.connect_timeout(),
            user_agent: Some(config.relay.user_agent.clone()),
            system_proxy: config.relay.system_proxy,
        })?;
        let relay = Relay::new(Translator::new(config.relay.destination_param.clone()), client);
        let router = build_router(relay, &config.relay);
        Ok(Self { router })
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router<C: UpstreamClient + 'static>(relay: Relay<C>, config: &ForwardingConfig) -> Router {
    let state = AppState {
        relay: Arc::new(relay),
        destination_param: Arc::from(config.destination_param.as_str()),
        max_body_bytes: config.max_body_bytes,
    };

    Router::new()
        .route("/", any(relay_handler::<C>))
        .route("/{*path}", any(relay_handler::<C>))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(&X_RELAY_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "relay",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .layer(PropagateRequestIdLayer::new(X_RELAY_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_RELAY_REQUEST_ID, MakeRelayRequestId))
}

/// Relay handler: read the inbound request, relay it, emit the result.
async fn relay_handler<C: UpstreamClient + 'static>(
    State(state): State<AppState<C>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let inbound = match read_inbound(request, &state.destination_param, state.max_body_bytes).await {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read inbound request");
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), "invalid_request", start_time);
            return response;
        }
    };

    match state.relay.relay(&inbound).await {
        Ok(result) => {
            let response = emit(result);
            metrics::record_request(&method, response.status().as_u16(), "relayed", start_time);
            response
        }
        Err(failure) => {
            metrics::record_request(&method, failure.status_code().as_u16(), failure.outcome(), start_time);
            failure.into_response()
        }
    }
}
