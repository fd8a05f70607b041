//! Notification panel with timed expiry.
//!
//! Collects `notification` events into a visible list; every item is removed
//! again a fixed delay after it appeared, each on its own timer. Unmounting
//! the panel cancels all pending removals and drops the visible list, so
//! nothing mutates a dismissed panel afterwards.
//!
//! The panel also observes `userAction` and the wildcard channel purely for
//! diagnostics; neither affects the visible list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info};
use relay_bus::{EventBus, SubscriptionSet, handler, wildcard_handler};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::events::{AppEvent, NotificationKind, channel, now_millis};
use crate::panels::Panel;

/// How long a notification stays visible.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// One visible notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    /// Monotonic per-panel id, never reused.
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    /// Arrival time, epoch milliseconds.
    pub timestamp: i64,
}

impl Notification {
    /// Arrival time rendered as a local wall-clock string.
    pub fn arrival_time(&self) -> String {
        format_millis(self.timestamp)
    }
}

/// Aborts the removal task when dropped, so a cancelled dismissal can never
/// touch the list afterwards.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Default)]
struct CenterState {
    items: Vec<Notification>,
    timers: HashMap<u64, AbortOnDrop>,
}

/// Display panel for transient notifications.
///
/// Cheap to clone; clones share state and subscriptions.
#[derive(Clone)]
pub struct NotificationCenter {
    state: Arc<Mutex<CenterState>>,
    subs: Arc<Mutex<SubscriptionSet<AppEvent>>>,
}

impl NotificationCenter {
    /// Create the panel with the standard dismiss delay.
    ///
    /// # Panics
    /// Panics outside a tokio runtime context: dismissal timers are spawned
    /// on the current runtime.
    pub fn new(bus: &EventBus<AppEvent>) -> Self {
        Self::with_dismiss_after(bus, DISMISS_AFTER)
    }

    /// Create the panel with a custom dismiss delay.
    pub fn with_dismiss_after(bus: &EventBus<AppEvent>, dismiss_after: Duration) -> Self {
        let runtime = Handle::current();
        let state = Arc::new(Mutex::new(CenterState::default()));
        let next_id = AtomicU64::new(0);

        let mut subs = SubscriptionSet::new(bus);

        let sink = Arc::clone(&state);
        subs.on(
            channel::NOTIFICATION,
            handler(move |event: &AppEvent| {
                let AppEvent::Notification { kind, message } = event else {
                    return;
                };
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                let item = Notification {
                    id,
                    kind: *kind,
                    message: message.clone(),
                    timestamp: now_millis(),
                };
                debug!("notification #{id} [{}] {}", item.kind.label(), item.message);

                let mut center = sink.lock().expect("notification state lock poisoned");
                center.items.push(item);

                // Schedule the dismissal; the guard in `timers` cancels it if
                // the panel unmounts first.
                let list = Arc::clone(&sink);
                let task = runtime.spawn(async move {
                    sleep(dismiss_after).await;
                    let mut center = list.lock().expect("notification state lock poisoned");
                    center.items.retain(|item| item.id != id);
                    center.timers.remove(&id);
                    debug!("notification #{id} dismissed");
                });
                center.timers.insert(id, AbortOnDrop(task));
            }),
        );

        // Observed for diagnostics only, never rendered.
        subs.on(
            channel::USER_ACTION,
            handler(|event: &AppEvent| {
                if let AppEvent::UserAction { action, timestamp } = event {
                    info!("user action '{action}' at {}", format_millis(*timestamp));
                }
            }),
        );

        // Wildcard tap: dumps every emission for debugging the channel model.
        subs.on_any(wildcard_handler(|name, event: &AppEvent| {
            let payload = serde_json::to_string(event)
                .unwrap_or_else(|_| "<unserializable>".to_string());
            debug!("event emitted: {name} {payload}");
        }));

        Self {
            state,
            subs: Arc::new(Mutex::new(subs)),
        }
    }

    /// Snapshot of the visible notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .expect("notification state lock poisoned")
            .items
            .clone()
    }

    /// The visible items as display lines, oldest first.
    pub fn render_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("notification state lock poisoned")
            .items
            .iter()
            .map(|item| {
                format!(
                    "#{} {} {}: {} [{}]",
                    item.id,
                    item.arrival_time(),
                    item.kind.label(),
                    item.message,
                    item.kind.style_class(),
                )
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state
            .lock()
            .expect("notification state lock poisoned")
            .items
            .is_empty()
    }
}

impl Panel for NotificationCenter {
    fn name(&self) -> &'static str {
        "notification-center"
    }

    fn activate(&self) {
        self.subs.lock().expect("subscription lock poisoned").activate();
    }

    fn deactivate(&self) {
        self.subs
            .lock()
            .expect("subscription lock poisoned")
            .deactivate();

        // Cancel pending dismissals before dropping the list; a remount
        // starts from the initial empty state.
        let mut state = self.state.lock().expect("notification state lock poisoned");
        state.timers.clear();
        state.items.clear();
    }
}

/// Render an epoch-millisecond timestamp in local time for log lines.
fn format_millis(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(time) => time.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
        None => format!("{millis}ms"),
    }
}
