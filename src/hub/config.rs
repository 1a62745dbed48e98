//! Hub configuration

use std::time::Duration;

/// Longest accepted broadcast interval (one year)
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Hub configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Time between broadcast ticks
    pub interval: Duration,

    /// Maximum fanout writes in flight at once (0 = unlimited)
    pub fanout_limit: usize,

    /// Longest a write may hold a fanout permit before the subscriber is
    /// dropped. Only applies when `fanout_limit` is set.
    pub write_timeout: Duration,

    /// Seed for the value source (None = seeded from OS entropy)
    pub seed: Option<u64>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            fanout_limit: 0, // Unlimited
            write_timeout: Duration::from_secs(5),
            seed: None,
        }
    }
}

impl HubConfig {
    /// Set the broadcast interval
    ///
    /// Clamped to `1ms..=MAX_INTERVAL`; the timer cannot fire with a zero
    /// period and cannot schedule past the clock's range.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = clamp_interval(interval);
        self
    }

    /// Set how long a limited fanout write may run
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Bound concurrent fanout writes
    pub fn fanout_limit(mut self, limit: usize) -> Self {
        self.fanout_limit = limit;
        self
    }

    /// Use a deterministic value sequence
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub(crate) fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(Duration::from_millis(1), MAX_INTERVAL)
}
