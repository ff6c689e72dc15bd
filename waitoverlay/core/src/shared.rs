//! Shared Engine Handle
//!
//! [`SharedWaitOverlay`] wraps one [`WaitOverlay`] so every call site of an
//! application can hold a clone and still drive the same instance. Cloning
//! the handle never creates a second engine.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::{TextUpdate, WaitOverlay};
use crate::events::OverlayEvent;
use crate::merge::PartialSettings;
use crate::progress::ProgressUpdate;
use crate::state::OverlayPhase;
use crate::surface::{ContainerId, Surface};

/// Cloneable handle to a single engine instance
pub struct SharedWaitOverlay<S: Surface> {
    inner: Arc<Mutex<WaitOverlay<S>>>,
}

impl<S: Surface> Clone for SharedWaitOverlay<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Surface> SharedWaitOverlay<S> {
    /// Wrap an engine
    pub fn new(engine: WaitOverlay<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut WaitOverlay<S>) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Whether two handles drive the same engine
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// See [`WaitOverlay::show`]
    pub fn show(&self, options: Option<&PartialSettings>, container: Option<ContainerId>) {
        self.inner.lock().show(options, container);
    }

    /// See [`WaitOverlay::hide`]
    pub fn hide(&self, force: bool, container: Option<ContainerId>) {
        self.inner.lock().hide(force, container);
    }

    /// See [`WaitOverlay::resize`]
    pub fn resize(&self, container: Option<ContainerId>) {
        self.inner.lock().resize(container);
    }

    /// See [`WaitOverlay::text`]
    pub fn text(&self, value: impl Into<TextUpdate>, container: Option<ContainerId>) {
        self.inner.lock().text(value, container);
    }

    /// See [`WaitOverlay::progress`]
    pub fn progress(&self, value: impl Into<ProgressUpdate>, container: Option<ContainerId>) {
        self.inner.lock().progress(value, container);
    }

    /// See [`WaitOverlay::destroy`]
    pub fn destroy(&self, container: Option<ContainerId>) {
        self.inner.lock().destroy(container);
    }

    /// See [`WaitOverlay::configure`]
    pub fn configure(&self, partial: &PartialSettings) {
        self.inner.lock().configure(partial);
    }

    /// See [`WaitOverlay::handle_event`]
    pub fn handle_event(&self, event: OverlayEvent) {
        self.inner.lock().handle_event(event);
    }

    /// See [`WaitOverlay::phase`]
    pub fn phase(&self, container: Option<ContainerId>) -> OverlayPhase {
        self.inner.lock().phase(container)
    }

    /// See [`WaitOverlay::show_count`]
    pub fn show_count(&self, container: Option<ContainerId>) -> u32 {
        self.inner.lock().show_count(container)
    }
}

impl<S: Surface> From<WaitOverlay<S>> for SharedWaitOverlay<S> {
    fn from(engine: WaitOverlay<S>) -> Self {
        Self::new(engine)
    }
}
