//! Panel lifecycle coordination.
//!
//! Stands in for the rendering layer: owns every registered panel and drives
//! the activate/deactivate hooks on mount and unmount, in registration order.

use log::{debug, info};

use crate::panels::Panel;

/// The manager that coordinates panel mounting.
pub struct PanelManager {
    panels: Vec<Box<dyn Panel>>,
    mounted: bool,
}

impl PanelManager {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            mounted: false,
        }
    }

    /// Register a panel. A panel registered while the set is mounted is
    /// activated immediately, so the mounted set stays consistent.
    pub fn register(&mut self, panel: Box<dyn Panel>) {
        debug!("registered panel '{}'", panel.name());
        if self.mounted {
            panel.activate();
        }
        self.panels.push(panel);
    }

    /// Mount every panel. Does nothing when already mounted.
    pub fn mount_all(&mut self) {
        if self.mounted {
            return;
        }
        for panel in &self.panels {
            debug!("mounting '{}'", panel.name());
            panel.activate();
        }
        self.mounted = true;
        info!("{} panel(s) mounted", self.panels.len());
    }

    /// Unmount every panel. Does nothing when already unmounted.
    pub fn unmount_all(&mut self) {
        if !self.mounted {
            return;
        }
        for panel in &self.panels {
            debug!("unmounting '{}'", panel.name());
            panel.deactivate();
        }
        self.mounted = false;
        info!("{} panel(s) unmounted", self.panels.len());
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ProbePanel {
        activated: Arc<AtomicUsize>,
        deactivated: Arc<AtomicUsize>,
    }

    impl Panel for ProbePanel {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn activate(&self) {
            self.activated.fetch_add(1, Ordering::SeqCst);
        }

        fn deactivate(&self) {
            self.deactivated.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe(manager: &mut PanelManager) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let activated = Arc::new(AtomicUsize::new(0));
        let deactivated = Arc::new(AtomicUsize::new(0));
        manager.register(Box::new(ProbePanel {
            activated: Arc::clone(&activated),
            deactivated: Arc::clone(&deactivated),
        }));
        (activated, deactivated)
    }

    #[test]
    fn test_mount_and_unmount_reach_every_panel_once() {
        let mut manager = PanelManager::new();
        let (first_up, first_down) = probe(&mut manager);
        let (second_up, second_down) = probe(&mut manager);

        manager.mount_all();
        assert!(manager.is_mounted());
        assert_eq!(first_up.load(Ordering::SeqCst), 1);
        assert_eq!(second_up.load(Ordering::SeqCst), 1);

        manager.mount_all();
        assert_eq!(first_up.load(Ordering::SeqCst), 1);

        manager.unmount_all();
        assert!(!manager.is_mounted());
        assert_eq!(first_down.load(Ordering::SeqCst), 1);
        assert_eq!(second_down.load(Ordering::SeqCst), 1);

        manager.unmount_all();
        assert_eq!(first_down.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registering_into_a_mounted_set_activates_immediately() {
        let mut manager = PanelManager::new();
        manager.mount_all();

        let (activated, _) = probe(&mut manager);
        assert_eq!(activated.load(Ordering::SeqCst), 1);

        manager.unmount_all();
        manager.mount_all();
        assert_eq!(activated.load(Ordering::SeqCst), 2);
    }
}
