//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handler)
//!     → request.rs (request ID, InboundRequest extraction)
//!     → relay core (translate, forward)
//!     → response.rs (status + header lines minus Transfer-Encoding, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundError, MakeRelayRequestId, X_RELAY_REQUEST_ID};
pub use server::{build_router, HttpServer};
