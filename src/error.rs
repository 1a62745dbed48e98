//! Error types
//!
//! Connection-level failures never leave the connection that produced them:
//! the hub turns them into an unsubscribe and the lifecycle handler turns them
//! into a [`Disconnect`](crate::session::Disconnect). Only server startup
//! reports errors to the caller.

use std::net::SocketAddr;

/// Crate-level result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the server entry points
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured listen address could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Other socket-level failure (e.g. reading the bound address)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure on a single connection handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Peer closed the connection (close frame or end of stream)
    #[error("connection closed")]
    Closed,

    /// Transport error while reading or writing
    #[error("transport error: {0}")]
    Io(String),

    /// No frame arrived within the configured idle window
    #[error("idle timeout")]
    IdleTimeout,
}
