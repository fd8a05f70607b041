//! Latest-message display panel.
//!
//! Shows the payload of the most recent `buttonClicked` event; each event
//! overwrites the previous one. Empty until the first event arrives, and
//! reset to empty on unmount.

use std::sync::{Arc, Mutex, RwLock};

use relay_bus::{EventBus, SubscriptionSet, handler};

use crate::events::{AppEvent, channel};
use crate::panels::Panel;

/// Display panel for the most recent `buttonClicked` message.
///
/// Cheap to clone; clones share state and subscriptions, so the panel manager
/// can own one clone while the demo queries another.
#[derive(Clone)]
pub struct MessageDisplay {
    message: Arc<RwLock<String>>,
    subs: Arc<Mutex<SubscriptionSet<AppEvent>>>,
}

impl MessageDisplay {
    pub fn new(bus: &EventBus<AppEvent>) -> Self {
        let message = Arc::new(RwLock::new(String::new()));

        let mut subs = SubscriptionSet::new(bus);
        let sink = Arc::clone(&message);
        subs.on(
            channel::BUTTON_CLICKED,
            handler(move |event: &AppEvent| {
                if let AppEvent::ButtonClicked { message } = event {
                    *sink.write().expect("message state lock poisoned") = message.clone();
                }
            }),
        );

        Self {
            message,
            subs: Arc::new(Mutex::new(subs)),
        }
    }

    /// The displayed message; empty before the first event.
    pub fn message(&self) -> String {
        self.message
            .read()
            .expect("message state lock poisoned")
            .clone()
    }
}

impl Panel for MessageDisplay {
    fn name(&self) -> &'static str {
        "message-display"
    }

    fn activate(&self) {
        self.subs.lock().expect("subscription lock poisoned").activate();
    }

    fn deactivate(&self) {
        self.subs
            .lock()
            .expect("subscription lock poisoned")
            .deactivate();
        // A remount starts from the initial empty state.
        self.message
            .write()
            .expect("message state lock poisoned")
            .clear();
    }
}
