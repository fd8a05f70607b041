//! The event bus itself: string-keyed channels, ordered handler lists,
//! synchronous dispatch.
//!
//! Design principles:
//! - Emission never runs user code under the registry lock. Handler lists are
//!   snapshotted first, so handlers can freely subscribe, unsubscribe and emit
//!   from inside a dispatch without deadlocking or seeing a half-updated list.
//! - A panicking handler is caught, logged and skipped; the remaining handlers
//!   of the emission still run.
//! - Handlers are identified by pointer, not by value. Unsubscribing removes
//!   every stored occurrence of the given handler from that channel.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

use log::{debug, error};

/// Reserved channel name for handlers that observe every emission.
pub const WILDCARD: &str = "*";

/// An event that can travel over an [`EventBus`].
///
/// The channel name is derived from the event value itself, so a producer can
/// never emit a payload on the wrong channel.
pub trait BusEvent: 'static {
    /// Channel this event is published on. Must be non-empty and must not be
    /// the reserved [`WILDCARD`] name.
    fn channel(&self) -> &str;
}

/// Shared handler for one named channel.
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Shared handler for the wildcard channel; also receives the channel name.
pub type WildcardHandler<E> = Arc<dyn Fn(&str, &E) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
///
/// The returned `Arc` is the handler's identity: keep a clone of it around to
/// unsubscribe later. Wrapping the same closure twice yields two distinct
/// handlers.
pub fn handler<E, F>(f: F) -> Handler<E>
where
    E: BusEvent,
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`WildcardHandler`]. Same identity rules as
/// [`handler`].
pub fn wildcard_handler<E, F>(f: F) -> WildcardHandler<E>
where
    E: BusEvent,
    F: Fn(&str, &E) + Send + Sync + 'static,
{
    Arc::new(f)
}

struct Registry<E: BusEvent> {
    channels: HashMap<String, Vec<Handler<E>>>,
    wildcard: Vec<WildcardHandler<E>>,
}

impl<E: BusEvent> Registry<E> {
    fn new() -> Self {
        Self {
            channels: HashMap::new(),
            wildcard: Vec::new(),
        }
    }
}

/// Publish/subscribe hub for one event type.
///
/// Cloning is cheap and every clone addresses the same registry, so the bus
/// can be handed to each producer and consumer at construction time.
pub struct EventBus<E: BusEvent> {
    inner: Arc<RwLock<Registry<E>>>,
}

impl<E: BusEvent> EventBus<E> {
    /// Create a bus with no subscriptions.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry::new())),
        }
    }

    /// Append `handler` to the end of `channel`'s handler list.
    ///
    /// Subscribing the same handler again appends another occurrence, which
    /// then runs once more per emission.
    ///
    /// # Panics
    /// Panics if `channel` is empty or the reserved wildcard name; handlers
    /// for every channel are attached with [`EventBus::subscribe_all`].
    pub fn subscribe(&self, channel: &str, handler: Handler<E>) {
        assert_valid_channel(channel);
        let mut registry = self.inner.write().expect("bus registry lock poisoned");
        registry
            .channels
            .entry(channel.to_string())
            .or_default()
            .push(handler);
        debug!("handler subscribed to '{channel}'");
    }

    /// Append a wildcard handler, invoked after the named handlers of every
    /// emission.
    pub fn subscribe_all(&self, handler: WildcardHandler<E>) {
        let mut registry = self.inner.write().expect("bus registry lock poisoned");
        registry.wildcard.push(handler);
        debug!("wildcard handler subscribed");
    }

    /// Remove every occurrence of `handler` from `channel`.
    ///
    /// Matching is by pointer identity, the same `Arc` that was subscribed.
    /// Unknown channels and handlers that were never subscribed are ignored.
    ///
    /// # Panics
    /// Panics if `channel` is empty or the reserved wildcard name.
    pub fn unsubscribe(&self, channel: &str, handler: &Handler<E>) {
        assert_valid_channel(channel);
        let mut registry = self.inner.write().expect("bus registry lock poisoned");
        if let Some(handlers) = registry.channels.get_mut(channel) {
            let before = handlers.len();
            handlers.retain(|h| !Arc::ptr_eq(h, handler));
            let removed = before - handlers.len();
            if removed > 0 {
                debug!("{removed} handler(s) unsubscribed from '{channel}'");
            }
        }
    }

    /// Remove every occurrence of `handler` from the wildcard list.
    pub fn unsubscribe_all(&self, handler: &WildcardHandler<E>) {
        let mut registry = self.inner.write().expect("bus registry lock poisoned");
        let before = registry.wildcard.len();
        registry.wildcard.retain(|h| !Arc::ptr_eq(h, handler));
        let removed = before - registry.wildcard.len();
        if removed > 0 {
            debug!("{removed} wildcard handler(s) unsubscribed");
        }
    }

    /// Publish `event` on its channel, synchronously.
    ///
    /// The handler lists are snapshotted once at the start of the emission:
    /// first the channel's handlers run in subscription order, then the
    /// wildcard handlers, each exactly once. Registry changes made by a
    /// handler apply from the next emission on. Emitting with no subscribers
    /// is a no-op.
    pub fn emit(&self, event: E) {
        let channel = event.channel();
        debug_assert!(
            !channel.is_empty() && channel != WILDCARD,
            "event mapped to an invalid channel name"
        );

        let (named, wildcard) = {
            let registry = self.inner.read().expect("bus registry lock poisoned");
            let named = registry.channels.get(channel).cloned().unwrap_or_default();
            let wildcard = registry.wildcard.clone();
            (named, wildcard)
        };
        debug!(
            "emit '{channel}' to {} named + {} wildcard handler(s)",
            named.len(),
            wildcard.len()
        );

        for handler in &named {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                error!(
                    "handler on '{channel}' panicked, skipping it: {}",
                    panic_message(&panic)
                );
            }
        }
        for handler in &wildcard {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(channel, &event))) {
                error!(
                    "wildcard handler panicked on '{channel}', skipping it: {}",
                    panic_message(&panic)
                );
            }
        }
    }

    /// Number of handlers currently subscribed to `channel`. Passing
    /// [`WILDCARD`] counts the wildcard handlers.
    pub fn handler_count(&self, channel: &str) -> usize {
        let registry = self.inner.read().expect("bus registry lock poisoned");
        if channel == WILDCARD {
            registry.wildcard.len()
        } else {
            registry.channels.get(channel).map_or(0, Vec::len)
        }
    }

    /// Drop every subscription, named and wildcard.
    pub fn clear(&self) {
        let mut registry = self.inner.write().expect("bus registry lock poisoned");
        registry.channels.clear();
        registry.wildcard.clear();
        debug!("all subscriptions cleared");
    }
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        // Clones share the registry; this is a handle, not a copy.
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn assert_valid_channel(channel: &str) {
    assert!(!channel.is_empty(), "channel name must be non-empty");
    assert_ne!(
        channel, WILDCARD,
        "'{WILDCARD}' is reserved; use subscribe_all / unsubscribe_all"
    );
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
