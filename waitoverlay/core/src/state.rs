//! Per-container overlay state.

use crate::progress::ProgressData;
use crate::settings::Settings;
use crate::surface::{ElementId, FetchHandle, FrameHandle, ObserverHandle, TimerHandle};

/// Lifecycle phase of a container, as seen from outside the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    /// No registry entry
    #[default]
    Absent,
    /// Overlay rendered, `show_count >= 1` (or force-shown)
    Visible,
    /// Fade-out running, cleanup pending
    FadingOut,
}

/// Kind of a sub-element child of the overlay root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubElementKind {
    /// Image (vector, fetched vector or raster)
    Image,
    /// Custom markup
    Custom,
    /// Text
    Text,
    /// Progress bar
    Progress,
}

/// A sub-element together with its resize parameters
#[derive(Clone, Debug, PartialEq)]
pub struct SubElement {
    /// Element handle
    pub element: ElementId,
    /// What it renders
    pub kind: SubElementKind,
    /// Whether observed resizes scale it
    pub auto_resize: bool,
    /// Multiplier applied to the base size
    pub resize_factor: f64,
}

/// Vector markup fetch that will be injected on completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingFetch {
    pub(crate) handle: FetchHandle,
    pub(crate) element: ElementId,
    pub(crate) generation: u64,
}

/// Everything the engine tracks for one container
///
/// Owns the overlay root and, through it, every descendant element.
#[derive(Debug)]
pub struct OverlayState {
    pub(crate) whole_page: bool,
    pub(crate) settings: Settings,
    pub(crate) overlay: Option<ElementId>,
    pub(crate) text_element: Option<ElementId>,
    pub(crate) progress: Option<ProgressData>,
    pub(crate) sub_elements: Vec<SubElement>,
    pub(crate) resize_observer: Option<ObserverHandle>,
    pub(crate) fade_frame: Option<FrameHandle>,
    pub(crate) fade_timer: Option<TimerHandle>,
    pub(crate) pending_fetch: Option<PendingFetch>,
    pub(crate) fading_out: bool,
    pub(crate) generation: u64,
    pub(crate) show_count: u32,
}

impl OverlayState {
    /// Fresh state for a container with nothing rendered
    #[must_use]
    pub fn new(whole_page: bool) -> Self {
        Self {
            whole_page,
            settings: Settings::default(),
            overlay: None,
            text_element: None,
            progress: None,
            sub_elements: Vec::new(),
            resize_observer: None,
            fade_frame: None,
            fade_timer: None,
            pending_fetch: None,
            fading_out: false,
            generation: 0,
            show_count: 0,
        }
    }

    /// Whether the container is the page-level target
    #[must_use]
    pub fn whole_page(&self) -> bool {
        self.whole_page
    }

    /// Effective settings in force
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The overlay root, if rendered
    #[must_use]
    pub fn overlay_element(&self) -> Option<ElementId> {
        self.overlay
    }

    /// The text sub-element, if built
    #[must_use]
    pub fn text_element(&self) -> Option<ElementId> {
        self.text_element
    }

    /// Resolved progress state, if the bar was built
    #[must_use]
    pub fn progress(&self) -> Option<&ProgressData> {
        self.progress.as_ref()
    }

    /// Sub-elements in construction order
    #[must_use]
    pub fn sub_elements(&self) -> &[SubElement] {
        &self.sub_elements
    }

    /// Outstanding show calls
    #[must_use]
    pub fn show_count(&self) -> u32 {
        self.show_count
    }

    /// Incarnation counter of the rendered overlay
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        match (self.overlay, self.fading_out) {
            (None, _) => OverlayPhase::Absent,
            (Some(_), false) => OverlayPhase::Visible,
            (Some(_), true) => OverlayPhase::FadingOut,
        }
    }

    /// Whether a vector fetch is still in flight for this overlay
    #[must_use]
    pub fn is_fetch_pending(&self) -> bool {
        self.pending_fetch.is_some()
    }
}
