//! Broadcast hub
//!
//! A single actor owns the subscriber registry and a fixed-interval timer.
//! On every tick with at least one subscriber it draws one value and spawns a
//! fanout task per subscriber, all carrying the same [`Frame`].
//!
//! # Architecture
//!
//! ```text
//!    Hub (handle, Clone)              HubActor (one task)
//!   ┌──────────────────┐  commands  ┌──────────────────────────┐
//!   │ subscribe()      │──────────► │ registry: HashMap<Id, _> │
//!   │ unsubscribe()    │  (mpsc)    │ source:   ValueSource    │
//!   │ stats()          │            │ ticker:   interval       │
//!   └──────────────────┘            └────────────┬─────────────┘
//!            ▲                                   │ tick
//!            │ unsubscribe on                    ▼
//!            │ write failure        ┌────────────┼────────────┐
//!            │                      ▼            ▼            ▼
//!            └─────────────────  [fanout]     [fanout]     [fanout]
//!                                sink.send()  sink.send()  sink.send()
//! ```
//!
//! The registry is never shared. Every read and write goes through the
//! actor's queue, so there is no lock around it.

pub mod config;
mod fanout;
pub mod registry;
pub mod station;
pub mod value;

pub use config::{HubConfig, MAX_INTERVAL};
pub use registry::SubscriberRegistry;
pub use station::Hub;
pub use value::{BroadcastValue, Frame, SeededSource, ValueSource, MAX_VALUE};
