//! Hub actor
//!
//! The registry lives inside one spawned task. [`Hub`] handles only enqueue
//! commands; the actor applies them one at a time, interleaved with timer
//! ticks, so registry mutations are totally ordered and need no lock.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::config::{clamp_interval, HubConfig};
use super::fanout::{spawn_fanout, FanoutLimit};
use super::registry::SubscriberRegistry;
use super::value::{Frame, SeededSource, ValueSource};
use crate::connection::{ConnectionId, Subscriber};
use crate::stats::HubStats;

enum Command {
    Subscribe(Subscriber),
    Unsubscribe(ConnectionId),
    Stats(oneshot::Sender<HubStats>),
}

/// Handle to a running hub
///
/// Cheap to clone. Every method returns without waiting for the actor,
/// except [`Hub::stats`] which waits for its answer.
#[derive(Clone)]
pub struct Hub {
    tx: mpsc::UnboundedSender<Command>,
}

impl Hub {
    /// Start a hub whose values come from `config.seed` (or OS entropy)
    pub fn spawn(config: HubConfig) -> Self {
        let source = SeededSource::from_optional_seed(config.seed);
        Self::spawn_with_source(config, source)
    }

    /// Start a hub with an explicit value source
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_with_source<V: ValueSource>(config: HubConfig, source: V) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let hub = Self { tx };

        let actor = HubActor::new(config, source, hub.clone(), rx);
        tokio::spawn(actor.run());

        hub
    }

    /// Register a subscriber. Subscribing twice is a no-op.
    pub fn subscribe(&self, subscriber: Subscriber) {
        self.send(Command::Subscribe(subscriber));
    }

    /// Drop a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ConnectionId) {
        self.send(Command::Unsubscribe(id));
    }

    /// Current counters, read from inside the actor
    ///
    /// Commands enqueued before this call are applied before it is answered.
    pub async fn stats(&self) -> HubStats {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stats(tx));
        rx.await.unwrap_or_default()
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::debug!("Hub loop has stopped, command dropped");
        }
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").finish_non_exhaustive()
    }
}

struct HubActor<V> {
    registry: SubscriberRegistry,
    stats: HubStats,
    source: V,
    interval: time::Duration,
    fanout_limit: Option<FanoutLimit>,
    /// Handed to fanout tasks so failed writes can unsubscribe.
    /// Holding it also keeps the queue open for the life of the process.
    hub: Hub,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl<V: ValueSource> HubActor<V> {
    fn new(config: HubConfig, source: V, hub: Hub, rx: mpsc::UnboundedReceiver<Command>) -> Self {
        let fanout_limit = if config.fanout_limit > 0 {
            Some(FanoutLimit::new(config.fanout_limit, config.write_timeout))
        } else {
            None
        };

        Self {
            registry: SubscriberRegistry::new(),
            stats: HubStats::new(),
            source,
            // Fields are public, so the builder's clamp may have been bypassed
            interval: clamp_interval(config.interval),
            fanout_limit,
            hub,
            rx,
        }
    }

    async fn run(mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(command) = self.rx.recv() => self.handle(command),
                _ = ticker.tick() => {
                    // Apply what was queued before the tick (e.g. prunes from
                    // the last tick's failed writes) before choosing
                    // recipients. Commands arriving meanwhile wait their turn.
                    for _ in 0..self.rx.len() {
                        match self.rx.try_recv() {
                            Ok(command) => self.handle(command),
                            Err(_) => break,
                        }
                    }
                    self.broadcast();
                }
            }
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Subscribe(subscriber) => {
                let id = subscriber.id();
                let peer = subscriber.label();
                if self.registry.insert(subscriber) {
                    tracing::info!(
                        conn = %id,
                        peer = %peer,
                        subscribers = self.registry.len(),
                        "Subscribed"
                    );
                }
            }
            Command::Unsubscribe(id) => {
                if let Some(subscriber) = self.registry.remove(id) {
                    self.stats.record_prune();
                    tracing::info!(
                        conn = %id,
                        peer = %subscriber.label(),
                        subscribers = self.registry.len(),
                        "Unsubscribed"
                    );
                }
            }
            Command::Stats(reply) => {
                let stats = HubStats {
                    subscribers: self.registry.len(),
                    ..self.stats
                };
                let _ = reply.send(stats);
            }
        }
    }

    fn broadcast(&mut self) {
        if self.registry.is_empty() {
            return;
        }

        let frame = Frame::new(self.source.next_value());
        let recipients = self.registry.snapshot();

        tracing::debug!(
            subscribers = recipients.len(),
            value = %frame.value(),
            "Broadcasting"
        );
        self.stats.record_tick(recipients.len());

        for subscriber in recipients {
            spawn_fanout(
                self.hub.clone(),
                subscriber,
                frame.clone(),
                self.fanout_limit.clone(),
            );
        }
    }
}
