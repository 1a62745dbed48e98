//! In-memory connection doubles shared by unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::connection::{FrameSink, FrameSource, Subscriber};
use crate::error::ConnectionError;
use crate::hub::{BroadcastValue, Frame, ValueSource};

/// Sink that accepts everything and records nothing
pub struct NullSink;

#[async_trait]
impl FrameSink for NullSink {
    async fn send(&self, _frame: Frame) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn close(&self) {}
}

/// Sink that forwards delivered bodies to a channel and can be told to fail
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<String>,
    fail: AtomicBool,
    attempts: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(Self {
            tx,
            fail: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        });
        (sink, rx)
    }

    /// Make every following write fail
    pub fn fail_writes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Writes attempted so far, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn send(&self, frame: Frame) -> Result<(), ConnectionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) || self.closed.load(Ordering::SeqCst) {
            return Err(ConnectionError::Io("broken pipe".into()));
        }
        let _ = self.tx.send(frame.as_str().to_owned());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Sink whose writes never complete
pub struct StalledSink;

#[async_trait]
impl FrameSink for StalledSink {
    async fn send(&self, _frame: Frame) -> Result<(), ConnectionError> {
        std::future::pending().await
    }

    async fn close(&self) {}
}

/// Source that yields a fixed number of frames, then reports the peer gone
pub struct ScriptedSource {
    remaining: usize,
    end: ConnectionError,
}

impl ScriptedSource {
    pub fn new(frames: usize, end: ConnectionError) -> Self {
        Self {
            remaining: frames,
            end,
        }
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn read_frame(&mut self) -> Result<(), ConnectionError> {
        if self.remaining == 0 {
            return Err(self.end.clone());
        }
        self.remaining -= 1;
        tokio::task::yield_now().await;
        Ok(())
    }
}

/// Source that never delivers a frame and never fails
pub struct SilentSource;

#[async_trait]
impl FrameSource for SilentSource {
    async fn read_frame(&mut self) -> Result<(), ConnectionError> {
        std::future::pending().await
    }
}

/// Value source that replays a fixed cycle
pub struct CycleSource {
    values: VecDeque<u8>,
}

impl CycleSource {
    pub fn new(values: &[u8]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

impl ValueSource for CycleSource {
    fn next_value(&mut self) -> BroadcastValue {
        let raw = self.values.pop_front().unwrap_or(0);
        self.values.push_back(raw);
        BroadcastValue::new(raw).unwrap_or(BroadcastValue::new(0).unwrap())
    }
}

/// Subscriber over a fresh [`RecordingSink`]
pub fn recording_subscriber() -> (Subscriber, Arc<RecordingSink>, mpsc::UnboundedReceiver<String>) {
    let (sink, rx) = RecordingSink::new();
    let subscriber = Subscriber::new(sink.clone());
    (subscriber, sink, rx)
}
