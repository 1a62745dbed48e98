//! Per-subscriber delivery
//!
//! Each tick spawns one task per subscriber. A task writes once; on failure it
//! logs and asks the hub to drop the subscriber. No retry. Unlimited fanout has
//! no write timeout: a stuck peer holds its own task and nothing else.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::station::Hub;
use super::value::Frame;
use crate::connection::Subscriber;
use crate::error::ConnectionError;

/// Shared bound on concurrent fanout writes
///
/// A permit is a shared resource, so a write holding one is cut off after
/// `write_timeout` and its subscriber dropped like any failed write.
#[derive(Debug, Clone)]
pub(crate) struct FanoutLimit {
    permits: Arc<Semaphore>,
    write_timeout: Duration,
}

impl FanoutLimit {
    pub(crate) fn new(max_in_flight: usize, write_timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight)),
            write_timeout,
        }
    }
}

/// Deliver `frame` to `subscriber` on a new task
///
/// With `limit` set, the task waits for a permit before writing. The wait
/// happens inside the task so the hub loop never blocks on it.
pub(crate) fn spawn_fanout(
    hub: Hub,
    subscriber: Subscriber,
    frame: Frame,
    limit: Option<FanoutLimit>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = match limit {
            Some(limit) => {
                let _permit = match limit.permits.acquire_owned().await {
                    Ok(permit) => permit,
                    // Semaphore is never closed while the hub lives
                    Err(_) => return,
                };
                match tokio::time::timeout(limit.write_timeout, subscriber.sink().send(frame)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(ConnectionError::Io(format!(
                        "write timed out after {}ms",
                        limit.write_timeout.as_millis()
                    ))),
                }
            }
            None => subscriber.sink().send(frame).await,
        };

        if let Err(e) = result {
            tracing::warn!(
                conn = %subscriber.id(),
                peer = %subscriber.label(),
                error = %e,
                "Broadcast write failed"
            );
            hub.unsubscribe(subscriber.id());
        }
    })
}
