//! HTTP/WebSocket server
//!
//! Thin plumbing around the hub: accept, upgrade, split the socket and hand
//! it to the lifecycle handler.

pub mod config;
pub mod listener;
pub(crate) mod routes;
pub mod socket;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use listener::StationServer;
pub use socket::{WsSink, WsSource};
