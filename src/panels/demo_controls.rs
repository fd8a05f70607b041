//! Multi-event control panel, one method per demo button.
//!
//! Every trigger is exactly one emission with a hardcoded payload; there is
//! no validation, no batching and no retry.

use relay_bus::EventBus;

use crate::events::{AppEvent, NotificationKind, now_millis};
use crate::panels::Panel;

/// Emits the demo's canned notifications and user actions.
#[derive(Clone)]
pub struct DemoControls {
    bus: EventBus<AppEvent>,
}

impl DemoControls {
    pub fn new(bus: &EventBus<AppEvent>) -> Self {
        Self { bus: bus.clone() }
    }

    pub fn send_success_notification(&self) {
        self.notify(NotificationKind::Success, "Operation completed successfully!");
    }

    pub fn send_error_notification(&self) {
        self.notify(NotificationKind::Error, "Something went wrong!");
    }

    pub fn send_info_notification(&self) {
        self.notify(NotificationKind::Info, "This is some useful information.");
    }

    /// Publish a `userAction` breadcrumb stamped with the current time.
    pub fn trigger_user_action(&self) {
        self.bus.emit(AppEvent::UserAction {
            action: "demo_button_clicked".to_string(),
            timestamp: now_millis(),
        });
    }

    fn notify(&self, kind: NotificationKind, message: &str) {
        self.bus.emit(AppEvent::Notification {
            kind,
            message: message.to_string(),
        });
    }
}

impl Panel for DemoControls {
    fn name(&self) -> &'static str {
        "demo-controls"
    }
}
