//! number-station: a WebSocket broadcast hub
//!
//! Clients connect to `GET /` and receive, on a fixed interval, one text frame
//! holding a random value in `00`..=`fe`. Every subscriber gets the same
//! value on a given tick. Connections whose writes fail are pruned.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use number_station::{ServerConfig, StationServer};
//!
//! # async fn run() -> number_station::Result<()> {
//! let config = ServerConfig::default().interval(Duration::from_millis(500));
//! StationServer::new(config).run().await
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod hub;
pub mod server;
pub mod session;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{ConnectionId, FrameSink, FrameSource, Subscriber};
pub use error::{ConnectionError, Error, Result};
pub use hub::{BroadcastValue, Frame, Hub, HubConfig, SeededSource, ValueSource};
pub use server::{ServerConfig, StationServer};
pub use session::{serve_connection, Disconnect, Subscription};
pub use stats::HubStats;
