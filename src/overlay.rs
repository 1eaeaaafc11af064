use std::sync::{Arc, Mutex};

use crate::lock;
use crate::view::View;

/// Full-screen loading indicator shared by every overlay-guarded operation.
///
/// Operations may overlap, so visibility is reference counted: the overlay
/// shows on the first [`Overlay::acquire`] and hides when the last
/// [`OverlayGuard`] is dropped.
pub struct Overlay {
    view: Arc<dyn View>,
    active: Mutex<usize>,
}

impl Overlay {
    pub fn new(view: Arc<dyn View>) -> Arc<Self> {
        Arc::new(Self {
            view,
            active: Mutex::new(0),
        })
    }

    pub fn acquire(self: &Arc<Self>) -> OverlayGuard {
        let mut active = lock(&self.active);
        *active += 1;
        if *active == 1 {
            self.view.toggle_overlay(true);
        }
        OverlayGuard {
            overlay: Arc::clone(self),
        }
    }

    pub fn is_visible(&self) -> bool {
        *lock(&self.active) > 0
    }

    fn release(&self) {
        let mut active = lock(&self.active);
        *active = active.saturating_sub(1);
        if *active == 0 {
            self.view.toggle_overlay(false);
        }
    }
}

/// Hides the overlay on drop, whichever way the guarded operation exits.
#[must_use = "the overlay hides as soon as the guard is dropped"]
pub struct OverlayGuard {
    overlay: Arc<Overlay>,
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        self.overlay.release();
    }
}
