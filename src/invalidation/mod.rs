//! Invalidation Module
//!
//! Explicit invalidation events and the in-process bus that fans them out
//! to shards and any other subscriber (e.g. replicas).

mod bus;
mod event;
mod pattern;

pub use bus::{InvalidationBus, SubscriptionId};
pub use event::{InvalidationEvent, InvalidationTarget};
pub use pattern::KeyPattern;
