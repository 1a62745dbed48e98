//! Scoped hub membership

use crate::connection::{ConnectionId, Subscriber};
use crate::hub::Hub;

/// Keeps a connection subscribed for as long as it is alive
///
/// Dropping the guard enqueues an unsubscribe, so a handler that returns,
/// panics, or is cancelled never leaves a stale registry entry behind.
#[derive(Debug)]
pub struct Subscription {
    hub: Hub,
    id: ConnectionId,
}

impl Subscription {
    /// Subscribe `subscriber` and return the guard that will undo it
    pub fn new(hub: Hub, subscriber: Subscriber) -> Self {
        let id = subscriber.id();
        hub.subscribe(subscriber);
        Self { hub, id }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::hub::HubConfig;
    use crate::testing::recording_subscriber;

    fn idle_hub() -> Hub {
        Hub::spawn(HubConfig::default().interval(Duration::from_secs(3600)))
    }

    #[tokio::test]
    async fn test_guard_subscribes_and_unsubscribes() {
        let hub = idle_hub();
        let (sub, _sink, _rx) = recording_subscriber();

        let guard = Subscription::new(hub.clone(), sub.clone());
        assert_eq!(guard.id(), sub.id());
        assert_eq!(hub.stats().await.subscribers, 1);

        drop(guard);
        assert_eq!(hub.stats().await.subscribers, 0);
    }

    #[tokio::test]
    async fn test_guard_released_when_task_aborted() {
        let hub = idle_hub();
        let (sub, _sink, _rx) = recording_subscriber();

        let task_hub = hub.clone();
        let task = tokio::spawn(async move {
            let _guard = Subscription::new(task_hub, sub);
            std::future::pending::<()>().await;
        });

        tokio::task::yield_now().await;
        while hub.stats().await.subscribers == 0 {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;

        assert_eq!(hub.stats().await.subscribers, 0);
    }
}
