//! WebSocket connection handle
//!
//! Splits an upgraded socket into the two halves the rest of the crate uses:
//! a shared [`WsSink`] for the hub's fanout tasks and an owned [`WsSource`]
//! for the lifecycle handler.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use crate::connection::{FrameSink, FrameSource};
use crate::error::ConnectionError;
use crate::hub::Frame;

/// Split an upgraded socket
pub fn split(socket: WebSocket) -> (WsSink, WsSource) {
    let (sink, stream) = socket.split();
    (
        WsSink {
            inner: Mutex::new(sink),
        },
        WsSource { inner: stream },
    )
}

/// Write half; sends each broadcast as one text frame
pub struct WsSink {
    inner: Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&self, frame: Frame) -> Result<(), ConnectionError> {
        let mut sink = self.inner.lock().await;
        sink.send(Message::Text(frame.as_str().into()))
            .await
            .map_err(|e| ConnectionError::Io(e.to_string()))
    }

    async fn close(&self) {
        let mut sink = self.inner.lock().await;
        if let Err(e) = sink.close().await {
            tracing::trace!(error = %e, "Close on dead socket");
        }
    }
}

/// Read half; inbound content is discarded
pub struct WsSource {
    inner: SplitStream<WebSocket>,
}

#[async_trait]
impl FrameSource for WsSource {
    async fn read_frame(&mut self) -> Result<(), ConnectionError> {
        match self.inner.next().await {
            Some(Ok(Message::Close(_))) | None => Err(ConnectionError::Closed),
            Some(Ok(_)) => Ok(()),
            Some(Err(e)) => Err(ConnectionError::Io(e.to_string())),
        }
    }
}
