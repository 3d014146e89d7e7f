//! Events Module
//!
//! Notifies interested parties when a resource family is mutated.

mod bus;
mod kind;

pub use bus::{listener, CacheEvent, EventBus, Listener, Subscription};
pub use kind::EventKind;
