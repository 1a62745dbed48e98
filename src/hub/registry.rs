//! Subscriber registry
//!
//! Owned by the hub actor and never shared, so it carries no lock. Every
//! mutation arrives as a command on the hub's queue.

use std::collections::HashMap;

use crate::connection::{ConnectionId, Subscriber};

/// Set of subscribed connections, keyed by identity
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    subscribers: HashMap<ConnectionId, Subscriber>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Returns false if it was already present.
    pub fn insert(&mut self, subscriber: Subscriber) -> bool {
        let id = subscriber.id();
        if self.subscribers.contains_key(&id) {
            return false;
        }
        self.subscribers.insert(id, subscriber);
        true
    }

    /// Remove a subscriber. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Subscriber> {
        self.subscribers.remove(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Subscribers registered right now, for one fanout pass
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers.values().cloned().collect()
    }
}
