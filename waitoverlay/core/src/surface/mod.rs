//! Surface Collaborator
//!
//! The engine never touches a rendering toolkit directly. Everything visual
//! goes through the [`Surface`] trait: creating elements, styling them,
//! measuring containers and scheduling deferred work. Deferred outcomes
//! (repaint ticks, timers, transition completions, fetch results, observed
//! resizes) come back to the engine as [`OverlayEvent`](crate::events::OverlayEvent)s.
//!
//! # Architecture
//!
//! ```text
//!   WaitOverlay (engine)
//!       │  Surface calls (down)         OverlayEvent (up)
//!       ▼                                     ▲
//!   ┌───────────────┐  ┌──────────────┐  ┌────┴──────────┐
//!   │ Browser / DOM │  │   Native     │  │   Headless    │
//!   │   binding     │  │   toolkit    │  │ (tests, demo) │
//!   └───────────────┘  └──────────────┘  └───────────────┘
//! ```
//!
//! All calls are synchronous. A surface that needs to do real asynchronous
//! work (e.g. fetching vector markup) returns a handle immediately and later
//! reports the outcome through the event path.

pub mod headless;

pub use headless::{HeadlessElement, HeadlessSurface};

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! surface_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Create an identifier from a raw value chosen by the surface
            #[must_use]
            pub const fn from_raw(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw numeric value
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

surface_id!(
    /// Stable identity of a host container
    ///
    /// Registry entries are keyed by this handle, never by container contents.
    ContainerId,
    "container"
);
surface_id!(
    /// Identity of an element created through [`Surface::create_element`]
    ElementId,
    "element"
);
surface_id!(
    /// Pending one-shot repaint callback
    FrameHandle,
    "frame"
);
surface_id!(
    /// Pending one-shot delayed callback
    TimerHandle,
    "timer"
);
surface_id!(
    /// Active container size subscription
    ObserverHandle,
    "observer"
);
surface_id!(
    /// In-flight text fetch
    FetchHandle,
    "fetch"
);

/// Layout measurements of a container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// Outer layout width (including borders)
    pub offset_width: f64,
    /// Outer layout height (including borders)
    pub offset_height: f64,
    /// Inner width available to children
    pub client_width: f64,
    /// Inner height available to children
    pub client_height: f64,
}

impl ContainerMetrics {
    /// Metrics for a borderless box of the given size
    #[must_use]
    pub fn uniform(width: f64, height: f64) -> Self {
        Self {
            offset_width: width,
            offset_height: height,
            client_width: width,
            client_height: height,
        }
    }

    /// Whether the container currently occupies any layout space
    #[must_use]
    pub fn occupies_space(&self) -> bool {
        self.offset_width > 0.0 || self.offset_height > 0.0
    }
}

/// Outcome of a failed [`Surface::fetch_text`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The resource answered with a non-success status
    #[error("resource answered with status {0}")]
    Status(u16),

    /// The resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The transport failed before a response arrived
    #[error("fetch failed: {0}")]
    Transport(String),
}

/// Rendering and scheduling primitives consumed by the engine
pub trait Surface {
    /// The page-level default target
    fn page_root(&self) -> ContainerId;

    /// Create a detached element
    fn create_element(&mut self) -> ElementId;

    /// Attach an element as the last child of a container
    fn append_to_container(&mut self, container: ContainerId, element: ElementId);

    /// Attach an element as the last child of another element
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Detach and drop an element together with its subtree
    fn remove_element(&mut self, element: ElementId);

    /// Set one style property
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// Set a batch of style properties in order
    fn apply_css(&mut self, element: ElementId, css: &[(&str, &str)]) {
        for (property, value) in css {
            self.set_style(element, property, value);
        }
    }

    /// Add a class name
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Check for a class name
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Replace the element's content with plain text
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Replace the element's content with markup
    fn set_markup(&mut self, element: ElementId, markup: &str);

    /// Style the vector image root produced by injected markup, if there is one
    fn style_markup_root(&mut self, element: ElementId, css: &[(&str, &str)]);

    /// Style every descendant produced by injected markup
    fn style_markup_descendants(&mut self, element: ElementId, css: &[(&str, &str)]);

    /// Current layout box of a container
    fn container_metrics(&self, container: ContainerId) -> ContainerMetrics;

    /// Current viewport size as `(width, height)`
    fn viewport_size(&self) -> (f64, f64);

    /// Resolved vertical offset of an element inside its positioned parent
    fn offset_top(&self, element: ElementId) -> f64;

    /// Start observing size changes of a container
    fn observe_resize(&mut self, container: ContainerId) -> ObserverHandle;

    /// Stop a size subscription
    fn disconnect_observer(&mut self, handle: ObserverHandle);

    /// Schedule a callback on the next repaint tick
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending repaint callback
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Schedule a delayed callback
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a pending delayed callback
    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Report the next completed style transition on this element, once
    fn listen_transition_end(&mut self, element: ElementId);

    /// Drop a pending transition completion subscription
    fn cancel_transition_end(&mut self, element: ElementId);

    /// Start fetching a URL as text
    fn fetch_text(&mut self, url: &str) -> FetchHandle;
}
