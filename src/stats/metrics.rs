//! Hub counters
//!
//! Counters are plain fields owned by the hub actor. Callers get a copy via
//! [`Hub::stats`](crate::hub::Hub::stats), which is answered from inside the
//! actor loop.

/// Snapshot of hub state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Subscribers currently registered
    pub subscribers: usize,
    /// Ticks that found at least one subscriber
    pub ticks: u64,
    /// Fanout tasks launched across all ticks
    pub fanouts: u64,
    /// Registry entries removed by unsubscribe
    pub pruned: u64,
}

impl HubStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick that fanned out to `recipients` subscribers
    pub(crate) fn record_tick(&mut self, recipients: usize) {
        self.ticks += 1;
        self.fanouts += recipients as u64;
    }

    /// Record a removal
    pub(crate) fn record_prune(&mut self) {
        self.pruned += 1;
    }
}
