//! RelayDeck - typed event bus demo harness
//!
//! Four independent panels wired to one shared bus: a click button, a
//! multi-event control panel, a message display and a notification panel
//! with timed expiry. Run with `demo` for a scripted walkthrough, or with no
//! arguments for an interactive prompt.

mod events;
mod panel_manager;
mod panels;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use log::info;
use relay_bus::EventBus;

use events::AppEvent;
use panel_manager::PanelManager;
use panels::{DISMISS_AFTER, DemoControls, EmitButton, MessageDisplay, NotificationCenter};

/// Pause between scripted demo steps, long enough to read the output.
const DEMO_STEP_PAUSE: Duration = Duration::from_millis(400);

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // The notification panel schedules its dismissal timers on this runtime;
    // keep it alive for the whole session.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    // One bus for the whole process, handed to every panel explicitly.
    let bus: EventBus<AppEvent> = EventBus::new();

    let button = EmitButton::new(&bus);
    let controls = DemoControls::new(&bus);
    let display = MessageDisplay::new(&bus);
    let notifications = NotificationCenter::new(&bus);

    let mut manager = PanelManager::new();
    manager.register(Box::new(button.clone()));
    manager.register(Box::new(controls.clone()));
    manager.register(Box::new(display.clone()));
    manager.register(Box::new(notifications.clone()));
    manager.mount_all();

    print_banner();

    let scripted = std::env::args().nth(1).as_deref() == Some("demo");
    if scripted {
        run_scripted_demo(&mut manager, &button, &controls, &display, &notifications);
    } else {
        run_interactive(&mut manager, &button, &controls, &display, &notifications)?;
    }

    manager.unmount_all();
    info!("bye");
    Ok(())
}

fn print_banner() {
    println!("RelayDeck - event bus demo");
    println!();
    println!("How it works:");
    println!("  - 'click' emits buttonClicked; the message display shows its payload");
    println!("  - 'success', 'error' and 'info' emit notification events that");
    println!("    auto-dismiss after {} ms", DISMISS_AFTER.as_millis());
    println!("  - 'action' emits userAction, observed for diagnostics only");
    println!("  - a wildcard tap logs every emission (RUST_LOG=debug to see it)");
    println!();
}

fn run_scripted_demo(
    manager: &mut PanelManager,
    button: &EmitButton,
    controls: &DemoControls,
    display: &MessageDisplay,
    notifications: &NotificationCenter,
) {
    println!("-- scripted walkthrough --");

    step("clicking the basic button");
    button.click();
    show_panels(display, notifications);

    step("clicking again (every click overwrites the displayed message)");
    button.click();
    show_panels(display, notifications);

    step("sending one notification of each kind");
    controls.send_success_notification();
    controls.send_error_notification();
    controls.send_info_notification();
    println!("visible: {}", notifications.notifications().len());
    show_panels(display, notifications);

    step("triggering a user action (observed, not rendered)");
    controls.trigger_user_action();
    show_panels(display, notifications);

    step("waiting for the notifications to expire");
    thread::sleep(DISMISS_AFTER + Duration::from_millis(200));
    show_panels(display, notifications);

    step("unmounting every panel, then emitting again");
    manager.unmount_all();
    button.click();
    controls.send_error_notification();
    show_panels(display, notifications);
    println!("(no panel reacted: unmounting detached every subscription)");
}

fn run_interactive(
    manager: &mut PanelManager,
    button: &EmitButton,
    controls: &DemoControls,
    display: &MessageDisplay,
    notifications: &NotificationCenter,
) -> io::Result<()> {
    print_help();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "click" => button.click(),
            "success" => controls.send_success_notification(),
            "error" => controls.send_error_notification(),
            "info" => controls.send_info_notification(),
            "action" => controls.trigger_user_action(),
            "show" => show_panels(display, notifications),
            "mount" => {
                if manager.is_mounted() {
                    println!("panels are already mounted");
                } else {
                    manager.mount_all();
                    println!("{} panel(s) mounted", manager.len());
                }
            }
            "unmount" => {
                if manager.is_mounted() {
                    manager.unmount_all();
                    println!("panels unmounted");
                } else {
                    println!("panels are already unmounted");
                }
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            "" => {}
            other => println!("unknown command '{other}' (try 'help')"),
        }
    }
    Ok(())
}

fn print_help() {
    println!("commands: click, success, error, info, action, show, mount, unmount, help, quit");
}

fn show_panels(display: &MessageDisplay, notifications: &NotificationCenter) {
    let message = display.message();
    if message.is_empty() {
        println!("message: (none)");
    } else {
        println!("message: {message}");
    }

    if notifications.is_empty() {
        println!("notifications: none");
    } else {
        println!("notifications:");
        for line in notifications.render_lines() {
            println!("  {line}");
        }
    }
}

fn step(what: &str) {
    thread::sleep(DEMO_STEP_PAUSE);
    println!();
    println!("== {what}");
}
