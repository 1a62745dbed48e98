//! Statistics for the broadcast hub

pub mod metrics;

pub use metrics::HubStats;
