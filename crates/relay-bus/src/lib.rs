//! relay-bus: a typed publish/subscribe event bus.
//!
//! Events are plain values routed by string channel names, with a reserved
//! `"*"` channel for handlers that want every emission. Dispatch is
//! synchronous and ordered, and handler lists are snapshotted per emission so
//! handlers can re-enter the bus safely.
//!
//! Features:
//! - Channel names derived from the event type, one [`BusEvent`] impl per app
//! - Ordered, exactly-once dispatch per emission, named before wildcard
//! - Pointer-identity unsubscribe, the same `Arc` that was subscribed
//! - [`SubscriptionSet`] for binding subscriptions to a component lifetime

pub mod bus;
pub mod subscription;

pub use bus::{
    BusEvent, EventBus, Handler, WILDCARD, WildcardHandler, handler, wildcard_handler,
};
pub use subscription::SubscriptionSet;
