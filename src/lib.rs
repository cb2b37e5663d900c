//! HTTP forwarding relay library.
//!
//! Accepts a request naming a destination URL, forwards it one hop, and hands
//! the destination's response back to the caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{Relay, RelayFailure, RelayResult};
