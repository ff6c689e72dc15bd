//! Overlay Events
//!
//! Events sent from a surface back to the engine. Every deferred effect the
//! engine schedules (repaint ticks, fallback timers, transition completions,
//! fetches, size observations) resolves through one of these.
//!
//! # Design Philosophy
//!
//! Surfaces report what happened; they don't decide what it means. An event
//! that no longer matches live engine state (the overlay it was scheduled for
//! has since been destroyed) is discarded by the engine.

use crate::surface::{ContainerId, ElementId, FetchError, FetchHandle, FrameHandle, TimerHandle};

/// Events from a Surface to the engine
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    /// A repaint tick requested with `request_frame` arrived
    FrameReady(FrameHandle),

    /// A delayed callback scheduled with `set_timeout` fired
    TimerFired(TimerHandle),

    /// A style transition completed on an element with a pending listener
    TransitionEnded(ElementId),

    /// An observed container changed size
    ContainerResized(ContainerId),

    /// The host dropped a container; its overlay state must be released
    ContainerRemoved(ContainerId),

    /// A fetch started with `fetch_text` finished
    FetchCompleted {
        /// Handle returned by `fetch_text`
        handle: FetchHandle,
        /// Fetched text, or why the fetch failed
        result: Result<String, FetchError>,
    },
}

impl OverlayEvent {
    /// Short event name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FrameReady(_) => "frame_ready",
            Self::TimerFired(_) => "timer_fired",
            Self::TransitionEnded(_) => "transition_ended",
            Self::ContainerResized(_) => "container_resized",
            Self::ContainerRemoved(_) => "container_removed",
            Self::FetchCompleted { .. } => "fetch_completed",
        }
    }
}
