//! Lifecycle binding between a component and its bus subscriptions.
//!
//! A component declares its handlers once, up front, and the set registers
//! and unregisters all of them as a unit. Pairing happens in one place, so a
//! component cannot end up half-subscribed or leak a handler on teardown.

use std::sync::Arc;

use log::debug;

use crate::bus::{BusEvent, EventBus, Handler, WildcardHandler, assert_valid_channel};

/// A component's bus subscriptions, bound to its active lifetime.
///
/// Handlers declared with [`SubscriptionSet::on`] and
/// [`SubscriptionSet::on_any`] are subscribed exactly once by
/// [`SubscriptionSet::activate`] and unsubscribed exactly once by
/// [`SubscriptionSet::deactivate`]. Both are idempotent, and dropping an
/// active set deactivates it, so no teardown path can leave a handler behind.
pub struct SubscriptionSet<E: BusEvent> {
    bus: EventBus<E>,
    named: Vec<(String, Handler<E>)>,
    wildcard: Vec<WildcardHandler<E>>,
    active: bool,
}

impl<E: BusEvent> SubscriptionSet<E> {
    /// Create an empty, inactive set bound to `bus`.
    pub fn new(bus: &EventBus<E>) -> Self {
        Self {
            bus: bus.clone(),
            named: Vec::new(),
            wildcard: Vec::new(),
            active: false,
        }
    }

    /// Declare a handler for a named channel.
    ///
    /// # Panics
    /// Panics if the channel name is empty or reserved, or if the set is
    /// currently active. The declared set must be complete before the first
    /// activation so that activate and deactivate always cover the same
    /// handlers.
    pub fn on(&mut self, channel: &str, handler: Handler<E>) {
        assert!(!self.active, "cannot declare handlers while the set is active");
        assert_valid_channel(channel);
        self.named.push((channel.to_string(), handler));
    }

    /// Declare a wildcard handler.
    ///
    /// # Panics
    /// Panics if the set is currently active.
    pub fn on_any(&mut self, handler: WildcardHandler<E>) {
        assert!(!self.active, "cannot declare handlers while the set is active");
        self.wildcard.push(handler);
    }

    /// Subscribe every declared handler. Does nothing when already active.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        for (channel, handler) in &self.named {
            self.bus.subscribe(channel, Arc::clone(handler));
        }
        for handler in &self.wildcard {
            self.bus.subscribe_all(Arc::clone(handler));
        }
        self.active = true;
        debug!(
            "subscription set activated ({} named, {} wildcard)",
            self.named.len(),
            self.wildcard.len()
        );
    }

    /// Unsubscribe every declared handler. Does nothing when already
    /// inactive.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        for (channel, handler) in &self.named {
            self.bus.unsubscribe(channel, handler);
        }
        for handler in &self.wildcard {
            self.bus.unsubscribe_all(handler);
        }
        self.active = false;
        debug!(
            "subscription set deactivated ({} named, {} wildcard)",
            self.named.len(),
            self.wildcard.len()
        );
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<E: BusEvent> Drop for SubscriptionSet<E> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{WILDCARD, handler, wildcard_handler};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tick;

    impl BusEvent for Tick {
        fn channel(&self) -> &str {
            "tick"
        }
    }

    fn counting(count: &Arc<AtomicUsize>) -> Handler<Tick> {
        let count = Arc::clone(count);
        handler(move |_: &Tick| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_declared_handlers_stay_detached_until_activation() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut subs = SubscriptionSet::new(&bus);
        subs.on("tick", counting(&count));

        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.handler_count("tick"), 0);
        assert!(!subs.is_active());

        subs.activate();
        assert!(subs.is_active());
        assert_eq!(bus.handler_count("tick"), 1);
        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deactivate_detaches_named_and_wildcard_handlers() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut subs = SubscriptionSet::new(&bus);
        subs.on("tick", counting(&count));
        let tap_count = Arc::new(AtomicUsize::new(0));
        let tap = Arc::clone(&tap_count);
        subs.on_any(wildcard_handler(move |_, _: &Tick| {
            tap.fetch_add(1, Ordering::SeqCst);
        }));

        subs.activate();
        bus.emit(Tick);
        subs.deactivate();
        bus.emit(Tick);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(tap_count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count("tick"), 0);
        assert_eq!(bus.handler_count(WILDCARD), 0);
    }

    #[test]
    fn test_activate_is_idempotent() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut subs = SubscriptionSet::new(&bus);
        subs.on("tick", counting(&count));

        subs.activate();
        subs.activate();
        assert_eq!(bus.handler_count("tick"), 1);

        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut subs = SubscriptionSet::new(&bus);
        subs.on("tick", counting(&count));

        subs.activate();
        subs.deactivate();
        subs.deactivate();

        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_repeated_cycles_do_not_accumulate_handlers() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut subs = SubscriptionSet::new(&bus);
        subs.on("tick", counting(&count));

        for _ in 0..5 {
            subs.activate();
            subs.deactivate();
        }
        assert_eq!(bus.handler_count("tick"), 0);

        subs.activate();
        assert_eq!(bus.handler_count("tick"), 1);
        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_an_active_set_unsubscribes() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        {
            let mut subs = SubscriptionSet::new(&bus);
            subs.on("tick", counting(&count));
            subs.activate();
            bus.emit(Tick);
        }

        bus.emit(Tick);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count("tick"), 0);
    }

    #[test]
    #[should_panic(expected = "while the set is active")]
    fn test_declaring_on_an_active_set_panics() {
        let bus: EventBus<Tick> = EventBus::new();
        let mut subs = SubscriptionSet::new(&bus);
        subs.activate();
        subs.on("tick", handler(|_: &Tick| {}));
    }
}
