//! The basic demo button: one trigger, one `buttonClicked` event.

use relay_bus::EventBus;

use crate::events::AppEvent;
use crate::panels::Panel;

/// Message every click publishes.
pub const CLICK_MESSAGE: &str = "Hello from the relay event bus!";

/// Stateless emitter control. Clones share the same bus handle.
#[derive(Clone)]
pub struct EmitButton {
    bus: EventBus<AppEvent>,
}

impl EmitButton {
    pub fn new(bus: &EventBus<AppEvent>) -> Self {
        Self { bus: bus.clone() }
    }

    /// Publish `buttonClicked` with the fixed message.
    pub fn click(&self) {
        self.bus.emit(AppEvent::ButtonClicked {
            message: CLICK_MESSAGE.to_string(),
        });
    }
}

impl Panel for EmitButton {
    fn name(&self) -> &'static str {
        "emit-button"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_bus::handler;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_every_click_emits_button_clicked() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(
            crate::events::channel::BUTTON_CLICKED,
            handler(move |event: &AppEvent| {
                sink.lock().unwrap().push(event.clone());
            }),
        );

        let button = EmitButton::new(&bus);
        button.click();
        button.click();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(
            matches!(&seen[0], AppEvent::ButtonClicked { message } if message == CLICK_MESSAGE)
        );
        assert_eq!(seen[0], seen[1]);
    }
}
