//! Connection lifecycle handler

use std::sync::Arc;
use std::time::Duration;

use super::subscription::Subscription;
use crate::connection::{FrameSource, Subscriber};
use crate::error::ConnectionError;
use crate::hub::Hub;

/// Why a connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disconnect {
    /// Peer sent a close frame or the stream ended
    PeerClosed,
    /// Transport failed while reading
    ReadError(String),
    /// Nothing arrived within the idle window
    IdleTimeout,
}

impl From<ConnectionError> for Disconnect {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Closed => Disconnect::PeerClosed,
            ConnectionError::IdleTimeout => Disconnect::IdleTimeout,
            ConnectionError::Io(msg) => Disconnect::ReadError(msg),
        }
    }
}

impl std::fmt::Display for Disconnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disconnect::PeerClosed => write!(f, "peer closed"),
            Disconnect::ReadError(msg) => write!(f, "read error: {}", msg),
            Disconnect::IdleTimeout => write!(f, "idle timeout"),
        }
    }
}

/// Run one connection from subscribe to close
///
/// Subscribes `subscriber`, then reads and discards inbound frames until the
/// first failure. Reads only detect disconnects; the protocol carries nothing
/// from client to server. With `idle_timeout` set, a read that waits longer
/// than that counts as a failure.
///
/// On return the sink has been closed and an unsubscribe has been enqueued.
pub async fn serve_connection<S: FrameSource>(
    hub: Hub,
    subscriber: Subscriber,
    mut source: S,
    idle_timeout: Option<Duration>,
) -> Disconnect {
    let id = subscriber.id();
    let peer = subscriber.label();
    let sink = Arc::clone(subscriber.sink());
    let subscription = Subscription::new(hub, subscriber);

    let reason = loop {
        let read = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, source.read_frame()).await {
                Ok(result) => result,
                Err(_) => Err(ConnectionError::IdleTimeout),
            },
            None => source.read_frame().await,
        };

        if let Err(e) = read {
            break Disconnect::from(e);
        }
    };

    sink.close().await;
    drop(subscription);

    tracing::info!(conn = %id, peer = %peer, reason = %reason, "Connection closed");

    reason
}
