//! Opacity fades on show and hide.

use std::time::Duration;

use crate::state::OverlayState;
use crate::surface::{ElementId, Surface};

/// Extra time the fade-out fallback timer waits beyond the fade itself
pub const FADE_OUT_GRACE: Duration = Duration::from_millis(50);

fn opacity_transition(ms: u64) -> String {
    format!("opacity {ms}ms")
}

/// Make a freshly built overlay visible, fading in on the next repaint tick
pub(super) fn start_fade_in<S: Surface>(
    surface: &mut S,
    state: &mut OverlayState,
    overlay: ElementId,
) {
    surface.set_style(overlay, "opacity", "1");
    let fade_in = state.settings.fade_in_ms();
    if fade_in > 0 {
        surface.set_style(overlay, "opacity", "0");
        surface.set_style(overlay, "transition", &opacity_transition(fade_in));
        state.fade_frame = Some(surface.request_frame());
    }
}

/// Start fading out; cleanup follows on transition end or the fallback timer
pub(super) fn begin_fade_out<S: Surface>(
    surface: &mut S,
    state: &mut OverlayState,
    overlay: ElementId,
    fade_out: u64,
) {
    // A fade-in tick arriving now would flip opacity back up
    if let Some(frame) = state.fade_frame.take() {
        surface.cancel_frame(frame);
    }
    surface.set_style(overlay, "transition", &opacity_transition(fade_out));
    surface.listen_transition_end(overlay);
    state.fade_timer =
        Some(surface.set_timeout(Duration::from_millis(fade_out) + FADE_OUT_GRACE));
    surface.set_style(overlay, "opacity", "0");
    state.fading_out = true;
}

/// Abort a running fade-out and bring the overlay back to full opacity
pub(super) fn revive<S: Surface>(surface: &mut S, state: &mut OverlayState, overlay: ElementId) {
    if let Some(timer) = state.fade_timer.take() {
        surface.clear_timeout(timer);
    }
    surface.cancel_transition_end(overlay);
    let fade_in = state.settings.fade_in_ms();
    surface.set_style(overlay, "transition", &opacity_transition(fade_in));
    surface.set_style(overlay, "opacity", "1");
    state.fading_out = false;
}
