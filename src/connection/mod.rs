//! Connection handles
//!
//! The hub never touches sockets directly. It sees a connection as a
//! [`Subscriber`]: a process-unique [`ConnectionId`] plus a shared
//! [`FrameSink`] it can write broadcast frames to. The lifecycle handler owns
//! the matching [`FrameSource`] and reads from it only to notice disconnects.

use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConnectionError;
use crate::hub::Frame;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one live connection
///
/// Two ids compare equal only if they were handed out for the same
/// connection; nothing about the peer or its traffic is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Write half of a connection
///
/// Shared between every fanout task that targets the connection, so
/// implementations must serialize concurrent writes themselves.
#[async_trait]
pub trait FrameSink: Send + Sync + 'static {
    /// Write one broadcast frame
    async fn send(&self, frame: Frame) -> Result<(), ConnectionError>;

    /// Release the connection. Further sends should fail.
    async fn close(&self);
}

/// Read half of a connection
#[async_trait]
pub trait FrameSource: Send {
    /// Wait for the next inbound frame and discard it.
    ///
    /// Returns an error once the peer is gone or the transport fails.
    async fn read_frame(&mut self) -> Result<(), ConnectionError>;
}

/// A connection as seen by the hub
#[derive(Clone)]
pub struct Subscriber {
    id: ConnectionId,
    peer_addr: Option<SocketAddr>,
    sink: Arc<dyn FrameSink>,
}

impl Subscriber {
    /// Wrap a sink under a freshly allocated id
    pub fn new(sink: Arc<dyn FrameSink>) -> Self {
        Self {
            id: ConnectionId::next(),
            peer_addr: None,
            sink,
        }
    }

    /// Attach the remote address, used only for logging
    pub fn with_peer_addr(mut self, addr: SocketAddr) -> Self {
        self.peer_addr = Some(addr);
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn sink(&self) -> &Arc<dyn FrameSink> {
        &self.sink
    }

    /// Human-readable label for log lines: the peer address if known
    pub fn label(&self) -> String {
        match self.peer_addr {
            Some(addr) => addr.to_string(),
            None => self.id.to_string(),
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Subscriber {}

impl Hash for Subscriber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
