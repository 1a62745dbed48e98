//! Connection lifecycle
//!
//! Bridges an already-upgraded connection into the hub and watches it until
//! it dies. Leaving the handler by any path unsubscribes the connection.

pub mod lifecycle;
pub mod subscription;

pub use lifecycle::{serve_connection, Disconnect};
pub use subscription::Subscription;
