//! The page's single live application and the host listeners feeding it.
//!
//! Listeners hold clones of the handle, so replacing the handle alone would
//! leave the old application alive and still receiving events. [`LiveSlot`]
//! detaches every listener of the outgoing handle before letting it go.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;

/// A host registration that can be undone.
pub trait Detach {
    /// Unregister from the host. Must be safe to call on a registration the
    /// host already dropped.
    fn detach(&self);
}

/// Owner of the live handle and its listeners.
pub struct LiveSlot<A, L: Detach> {
    app: Option<Rc<RefCell<A>>>,
    listeners: Vec<L>,
}

impl<A, L: Detach> LiveSlot<A, L> {
    #[must_use]
    pub const fn new() -> Self {
        Self { app: None, listeners: Vec::new() }
    }

    /// Install `app` as the live handle. Listeners of the previous handle are
    /// detached and dropped first.
    pub fn replace(&mut self, app: Rc<RefCell<A>>) {
        self.clear();
        self.app = Some(app);
    }

    /// Detach all listeners and release the live handle.
    pub fn clear(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.app = None;
    }

    /// Record a listener registered for the current handle.
    pub fn attach(&mut self, listener: L) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub fn app(&self) -> Option<&Rc<RefCell<A>>> {
        self.app.as_ref()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<A, L: Detach> Default for LiveSlot<A, L> {
    fn default() -> Self {
        Self::new()
    }
}
