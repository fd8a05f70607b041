//! The demo panels.
//!
//! Emitter panels publish events, display panels subscribe through a
//! [`SubscriptionSet`](relay_bus::SubscriptionSet) bound to their mounted
//! lifetime. Panels hold the state a renderer would draw; the binary prints
//! it.

pub mod demo_controls;
pub mod emit_button;
pub mod message_display;
pub mod notification_center;

pub use demo_controls::DemoControls;
pub use emit_button::EmitButton;
pub use message_display::MessageDisplay;
pub use notification_center::{DISMISS_AFTER, NotificationCenter};

/// A mountable UI unit, driven by the panel manager.
pub trait Panel {
    /// Stable name for log lines.
    fn name(&self) -> &'static str;

    /// Called when the panel is mounted.
    fn activate(&self) {}

    /// Called when the panel is unmounted. Safe to call repeatedly.
    fn deactivate(&self) {}
}
