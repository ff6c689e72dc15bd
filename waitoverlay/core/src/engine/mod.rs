//! Overlay Lifecycle Engine
//!
//! [`WaitOverlay`] is the state machine behind every "please wait" overlay.
//! It tracks reference-counted visibility per container, merges configuration
//! when an overlay is first rendered, drives fades and resize passes, and
//! releases everything on full hide or destroy.
//!
//! # State Machine
//!
//! ```text
//!            show                       hide (count → 0) / hide(force)
//!  Absent ─────────▶ Visible ─────────────────────────────▶ FadingOut
//!    ▲              │  ▲  show / hide (count > 0)               │
//!    │              │  └───────────── show (revive) ────────────┤
//!    │  destroy /   │                                           │
//!    │  no fade     ▼                    transition end / timer ▼
//!    └──────────────┴───────────────────────────────────────────┘
//! ```
//!
//! # Deferred Effects
//!
//! The engine never blocks. Fade-in flips, fade-out cleanup and fetched
//! vector markup are applied when the surface reports the matching
//! [`OverlayEvent`]. Effects belonging to an overlay that has since been
//! cleaned up find no live state and are discarded.

mod build;
mod fade;
mod resize;

pub use fade::FADE_OUT_GRACE;
pub use resize::{resolve_size, ResolvedSize};

use crate::animation;
use crate::events::OverlayEvent;
use crate::merge::{merge, Merge, PartialSettings};
use crate::progress::ProgressUpdate;
use crate::registry::ContainerRegistry;
use crate::settings::Settings;
use crate::state::{OverlayPhase, OverlayState};
use crate::surface::{
    ContainerId, ElementId, FetchError, FetchHandle, FrameHandle, Surface, TimerHandle,
};

/// Argument of a text update
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextUpdate {
    /// Hide the text element
    Hide,
    /// Show the text element with this content
    Show(String),
}

impl From<&str> for TextUpdate {
    fn from(text: &str) -> Self {
        Self::Show(text.to_string())
    }
}

impl From<String> for TextUpdate {
    fn from(text: String) -> Self {
        Self::Show(text)
    }
}

impl From<Option<String>> for TextUpdate {
    fn from(text: Option<String>) -> Self {
        text.map_or(Self::Hide, Self::Show)
    }
}

/// The overlay lifecycle engine
///
/// One instance drives every overlaid container of a surface. Construct it
/// once and hand it (or a [`SharedWaitOverlay`](crate::shared::SharedWaitOverlay))
/// to every call site.
pub struct WaitOverlay<S: Surface> {
    surface: S,
    settings: Settings,
    registry: ContainerRegistry,
    generation: u64,
}

impl<S: Surface> WaitOverlay<S> {
    /// Create an engine with the built-in default settings
    pub fn new(surface: S) -> Self {
        Self::with_settings(surface, Settings::default())
    }

    /// Create an engine with a custom settings baseline
    pub fn with_settings(surface: S, settings: Settings) -> Self {
        Self {
            surface,
            settings,
            registry: ContainerRegistry::new(),
            generation: 0,
        }
    }

    /// The surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Library-wide settings baseline used by future shows
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// State of a container (`None` = page root)
    pub fn state(&self, container: Option<ContainerId>) -> Option<&OverlayState> {
        self.registry.get(self.target(container))
    }

    /// Lifecycle phase of a container (`None` = page root)
    pub fn phase(&self, container: Option<ContainerId>) -> OverlayPhase {
        self.state(container)
            .map_or(OverlayPhase::Absent, OverlayState::phase)
    }

    /// Outstanding show calls of a container (`None` = page root)
    pub fn show_count(&self, container: Option<ContainerId>) -> u32 {
        self.state(container).map_or(0, OverlayState::show_count)
    }

    /// Number of containers with live state
    pub fn container_count(&self) -> usize {
        self.registry.count()
    }

    fn target(&self, container: Option<ContainerId>) -> ContainerId {
        container.unwrap_or_else(|| self.surface.page_root())
    }

    /// Show (or re-reference) the overlay on a container
    ///
    /// `options` apply only when nothing is rendered yet; while an overlay
    /// is visible its configuration is frozen.
    pub fn show(&mut self, options: Option<&PartialSettings>, container: Option<ContainerId>) {
        let target = self.target(container);
        let whole_page = target == self.surface.page_root();
        let rendered = self
            .registry
            .get(target)
            .is_some_and(|state| state.overlay.is_some());
        let effective = (!rendered).then(|| {
            let mut settings = merge(&self.settings, options);
            animation::normalize_names(&mut settings);
            settings
        });

        let state = self
            .registry
            .get_or_create(target, || OverlayState::new(whole_page));
        if let Some(settings) = effective {
            state.settings = settings;
        }
        state.show_count = state.show_count.saturating_add(1);

        match state.overlay {
            None => {
                self.generation += 1;
                build::construct(&mut self.surface, state, target, self.generation);
                if state.settings.resize {
                    resize::run(&mut self.surface, state, target, true);
                    state.resize_observer = Some(self.surface.observe_resize(target));
                }
                if let Some(overlay) = state.overlay {
                    fade::start_fade_in(&mut self.surface, state, overlay);
                }
                tracing::info!(
                    container = %target,
                    generation = state.generation,
                    "Overlay shown"
                );
            }
            Some(overlay) if state.fading_out => {
                fade::revive(&mut self.surface, state, overlay);
                tracing::debug!(container = %target, "Fade-out aborted by show");
            }
            Some(_) => {}
        }
        tracing::debug!(container = %target, show_count = state.show_count, "Show");
    }

    /// Release one show reference, or all of them with `force`
    ///
    /// The overlay is removed (after its fade-out) once no references remain.
    pub fn hide(&mut self, force: bool, container: Option<ContainerId>) {
        let target = self.target(container);
        let Some(state) = self.registry.get_mut(target) else {
            tracing::debug!(container = %target, "Hide ignored, no overlay state");
            return;
        };
        state.show_count = if force {
            0
        } else {
            state.show_count.saturating_sub(1)
        };
        if state.show_count > 0 {
            tracing::debug!(container = %target, show_count = state.show_count, "Hide");
            return;
        }

        let fade_out = state.settings.fade_out_ms();
        match (state.overlay, state.fading_out) {
            (Some(_), true) => {
                tracing::debug!(container = %target, "Hide ignored, already fading out");
            }
            (Some(overlay), false) if fade_out > 0 => {
                fade::begin_fade_out(&mut self.surface, state, overlay, fade_out);
                tracing::debug!(container = %target, fade_out_ms = fade_out, "Fading out");
            }
            _ => self.cleanup(target),
        }
    }

    /// Force a full resize pass on a rendered overlay
    pub fn resize(&mut self, container: Option<ContainerId>) {
        let target = self.target(container);
        if let Some(state) = self.registry.get(target) {
            if state.overlay.is_some() {
                resize::run(&mut self.surface, state, target, true);
            }
        }
    }

    /// Update or hide the text sub-element
    pub fn text(&mut self, value: impl Into<TextUpdate>, container: Option<ContainerId>) {
        let target = self.target(container);
        let Some(element) = self
            .registry
            .get(target)
            .and_then(|state| state.text_element)
        else {
            return;
        };
        self.surface.set_style(element, "display", "none");
        if let TextUpdate::Show(text) = value.into() {
            self.surface.set_style(element, "display", "");
            self.surface.set_text(element, &text);
        }
    }

    /// Update or hide the progress bar
    ///
    /// Values are ignored when the configured range is empty (`max <= min`).
    pub fn progress(&mut self, value: impl Into<ProgressUpdate>, container: Option<ContainerId>) {
        let target = self.target(container);
        let Some(progress) = self.registry.get(target).and_then(OverlayState::progress) else {
            return;
        };
        match value.into() {
            ProgressUpdate::Hide => self.surface.set_style(progress.bar, "display", "none"),
            ProgressUpdate::Value(value) => {
                let Some(percent) = progress.percent(value) else {
                    return;
                };
                let bar = progress.bar;
                let transition = format!("width {}ms", progress.speed);
                self.surface.set_style(bar, "display", "");
                self.surface.set_style(bar, "transition", &transition);
                self.surface.set_style(bar, "width", &format!("{percent}%"));
            }
        }
    }

    /// Remove a container's overlay immediately, regardless of show count
    pub fn destroy(&mut self, container: Option<ContainerId>) {
        let target = self.target(container);
        self.cleanup(target);
    }

    /// Merge `partial` into the library-wide baseline
    ///
    /// Affects only overlays rendered after this call.
    pub fn configure(&mut self, partial: &PartialSettings) {
        self.settings.merge_from(partial);
        tracing::debug!("Settings baseline updated");
    }

    /// Apply an event reported by the surface
    pub fn handle_event(&mut self, event: OverlayEvent) {
        tracing::trace!(event = event.name(), "Surface event");
        match event {
            OverlayEvent::FrameReady(handle) => self.on_frame(handle),
            OverlayEvent::TimerFired(handle) => self.on_timer(handle),
            OverlayEvent::TransitionEnded(element) => self.on_transition_end(element),
            OverlayEvent::ContainerResized(container) => self.on_container_resized(container),
            OverlayEvent::ContainerRemoved(container) => {
                tracing::debug!(container = %container, "Container removed by host");
                self.cleanup(container);
            }
            OverlayEvent::FetchCompleted { handle, result } => self.on_fetch(handle, result),
        }
    }

    fn on_frame(&mut self, handle: FrameHandle) {
        let Some(target) = self
            .registry
            .find(|state| state.fade_frame == Some(handle))
        else {
            tracing::debug!(frame = %handle, "Stale frame ignored");
            return;
        };
        let Some(state) = self.registry.get_mut(target) else {
            return;
        };
        state.fade_frame = None;
        if let Some(overlay) = state.overlay {
            self.surface.set_style(overlay, "opacity", "1");
        }
    }

    fn on_timer(&mut self, handle: TimerHandle) {
        let Some(target) = self
            .registry
            .find(|state| state.fade_timer == Some(handle))
        else {
            tracing::debug!(timer = %handle, "Stale timer ignored");
            return;
        };
        if let Some(state) = self.registry.get_mut(target) {
            state.fade_timer = None;
        }
        self.cleanup(target);
    }

    fn on_transition_end(&mut self, element: ElementId) {
        let Some(target) = self
            .registry
            .find(|state| state.fading_out && state.overlay == Some(element))
        else {
            return;
        };
        self.cleanup(target);
    }

    fn on_container_resized(&mut self, container: ContainerId) {
        if let Some(state) = self.registry.get(container) {
            if state.overlay.is_some() && state.resize_observer.is_some() {
                resize::run(&mut self.surface, state, container, false);
            }
        }
    }

    fn on_fetch(&mut self, handle: FetchHandle, result: Result<String, FetchError>) {
        let Some(target) = self.registry.find(|state| {
            state
                .pending_fetch
                .is_some_and(|pending| pending.handle == handle)
        }) else {
            tracing::debug!(fetch = %handle, "Fetch result for a removed overlay discarded");
            return;
        };
        let Some(state) = self.registry.get_mut(target) else {
            return;
        };
        let Some(pending) = state.pending_fetch.take() else {
            return;
        };
        if state.overlay.is_none() || state.generation != pending.generation {
            return;
        }
        match result {
            Ok(markup) if markup.trim_start().starts_with('<') => {
                self.surface.set_markup(pending.element, &markup);
                build::apply_vector_styles(&mut self.surface, pending.element, &state.settings.image);
            }
            Ok(_) => {
                tracing::debug!(fetch = %handle, "Fetched image is not markup, discarded");
            }
            Err(error) => {
                tracing::debug!(fetch = %handle, error = %error, "Vector image fetch failed");
            }
        }
    }

    /// Release everything a container owns; a no-op for containers without state
    fn cleanup(&mut self, target: ContainerId) {
        let Some(mut state) = self.registry.remove(target) else {
            return;
        };
        if let Some(observer) = state.resize_observer.take() {
            self.surface.disconnect_observer(observer);
        }
        if let Some(frame) = state.fade_frame.take() {
            self.surface.cancel_frame(frame);
        }
        if let Some(timer) = state.fade_timer.take() {
            self.surface.clear_timeout(timer);
        }
        if let Some(overlay) = state.overlay.take() {
            if state.fading_out {
                self.surface.cancel_transition_end(overlay);
            }
            self.surface.remove_element(overlay);
            tracing::info!(
                container = %target,
                generation = state.generation,
                "Overlay removed"
            );
        }
    }
}

impl<S: Surface> std::fmt::Debug for WaitOverlay<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitOverlay")
            .field("registry", &self.registry)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
