//! Application event catalog.
//!
//! One enum variant per channel; the bus key is derived from the variant, so
//! a payload can never go out on the wrong channel. Payloads serialize to the
//! wire-style JSON shapes the diagnostic log prints.

use chrono::Utc;
use relay_bus::BusEvent;
use serde::Serialize;

/// Channel names, as subscribed to by the panels.
pub mod channel {
    pub const BUTTON_CLICKED: &str = "buttonClicked";
    pub const USER_ACTION: &str = "userAction";
    pub const NOTIFICATION: &str = "notification";
}

/// Severity class of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Styling class a renderer keys off.
    pub fn style_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "notification-success",
            NotificationKind::Error => "notification-error",
            NotificationKind::Info => "notification-info",
        }
    }

    /// Uppercase label for rendered notification lines.
    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Success => "SUCCESS",
            NotificationKind::Error => "ERROR",
            NotificationKind::Info => "INFO",
        }
    }
}

/// Everything the demo panels exchange.
///
/// Serialization is untagged: only the payload fields appear, the channel
/// name is carried separately by the bus.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AppEvent {
    /// A demo button was pressed.
    ButtonClicked { message: String },
    /// Analytics-style breadcrumb for something the user did.
    UserAction {
        action: String,
        /// Producer-side time, epoch milliseconds.
        timestamp: i64,
    },
    /// A transient toast for the notification panel.
    Notification {
        #[serde(rename = "type")]
        kind: NotificationKind,
        message: String,
    },
}

impl BusEvent for AppEvent {
    fn channel(&self) -> &str {
        match self {
            AppEvent::ButtonClicked { .. } => channel::BUTTON_CLICKED,
            AppEvent::UserAction { .. } => channel::USER_ACTION,
            AppEvent::Notification { .. } => channel::NOTIFICATION,
        }
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
