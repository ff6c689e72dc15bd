//! Resize pass: keeps overlay geometry in step with its container.
//!
//! Runs on initial show and explicit resize (forced: every sub-element
//! scales) and on observed container size changes (only sub-elements with
//! auto-resize enabled scale).

use crate::progress::ProgressPosition;
use crate::settings::{Settings, Units};
use crate::state::{OverlayState, SubElementKind};
use crate::styles::{ICON_FONT_CLASS, OVERLAY_DISPLAY};
use crate::surface::{ContainerId, Surface};

/// Base size after unit resolution and clamping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedSize {
    /// Numeric size
    pub value: f64,
    /// Unit the size is written in
    pub units: Units,
}

impl ResolvedSize {
    /// Format `value * factor` with the resolved unit
    #[must_use]
    pub fn scaled(&self, factor: f64) -> String {
        format!("{}{}", self.value * factor, self.units.as_str())
    }
}

/// Resolve the configured base size against the available `(width, height)`
///
/// Returns `None` when the base size is not positive, in which case
/// sub-elements keep whatever size they have.
#[must_use]
pub fn resolve_size(settings: &Settings, available: (f64, f64)) -> Option<ResolvedSize> {
    let mut value = settings.size.value;
    if value <= 0.0 {
        return None;
    }
    if settings.size.units == Units::Auto {
        value = available.0.min(available.1) * value / 100.0;
        if settings.max_size != 0.0 && value > settings.max_size {
            value = settings.max_size;
        }
        if settings.min_size != 0.0 && value < settings.min_size {
            value = settings.min_size;
        }
    }
    Some(ResolvedSize {
        value,
        units: settings.size.units.resolved(),
    })
}

pub(super) fn run<S: Surface>(
    surface: &mut S,
    state: &OverlayState,
    container: ContainerId,
    force: bool,
) {
    let Some(overlay) = state.overlay else {
        return;
    };
    let metrics = surface.container_metrics(container);
    let display = if metrics.occupies_space() {
        OVERLAY_DISPLAY
    } else {
        "none"
    };
    surface.set_style(overlay, "display", display);

    if !state.whole_page {
        let width = format!("{}px", metrics.offset_width);
        let height = format!("{}px", metrics.offset_height);
        surface.apply_css(
            overlay,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", width.as_str()),
                ("height", height.as_str()),
            ],
        );
    }

    let available = if state.whole_page {
        surface.viewport_size()
    } else {
        (metrics.client_width, metrics.client_height)
    };
    let Some(size) = resolve_size(&state.settings, available) else {
        return;
    };
    tracing::debug!(
        container = %container,
        size = size.value,
        units = size.units.as_str(),
        force,
        "Resize pass"
    );

    for sub in &state.sub_elements {
        if !force && !sub.auto_resize {
            continue;
        }
        let value = size.scaled(sub.resize_factor);
        let text_like =
            sub.kind == SubElementKind::Text || surface.has_class(sub.element, ICON_FONT_CLASS);
        if text_like {
            surface.set_style(sub.element, "font-size", &value);
        } else if sub.kind == SubElementKind::Progress {
            let Some(progress) = &state.progress else {
                continue;
            };
            surface.set_style(progress.bar, "height", &value);
            match progress.position {
                ProgressPosition::Top => {
                    surface.set_style(sub.element, "top", &progress.margin);
                    let current_top = surface.offset_top(sub.element);
                    let bar_top = current_top - size.value * sub.resize_factor * 0.5;
                    surface.set_style(
                        progress.bar,
                        "top",
                        &format!("{bar_top}{}", size.units.as_str()),
                    );
                }
                ProgressPosition::Bottom => {
                    surface.set_style(sub.element, "top", "auto");
                    surface.set_style(sub.element, "bottom", &progress.margin);
                }
                ProgressPosition::Flow => {}
            }
        } else {
            surface.set_style(sub.element, "width", &value);
            surface.set_style(sub.element, "height", &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SizeSettings;

    #[test]
    fn test_auto_size_uses_lesser_dimension() {
        let mut settings = Settings::default();
        settings.max_size = 0.0;
        settings.min_size = 0.0;
        let size = resolve_size(&settings, (800.0, 300.0)).unwrap();
        assert!((size.value - 150.0).abs() < f64::EPSILON);
        assert_eq!(size.units, Units::Px);
        assert_eq!(size.scaled(0.5), "75px");
    }

    #[test]
    fn test_auto_size_clamps_to_bounds() {
        let settings = Settings::default(); // 50%, [20, 120]
        let big = resolve_size(&settings, (1000.0, 1000.0)).unwrap();
        assert!((big.value - 120.0).abs() < f64::EPSILON);
        let small = resolve_size(&settings, (10.0, 10.0)).unwrap();
        assert!((small.value - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_units_skip_clamping() {
        let settings = Settings {
            size: SizeSettings {
                value: 500.0,
                units: Units::Em,
            },
            ..Default::default()
        };
        let size = resolve_size(&settings, (10.0, 10.0)).unwrap();
        assert!((size.value - 500.0).abs() < f64::EPSILON);
        assert_eq!(size.scaled(0.25), "125em");
    }

    #[test]
    fn test_non_positive_size_disables_scaling() {
        let settings = Settings {
            size: SizeSettings {
                value: 0.0,
                units: Units::Auto,
            },
            ..Default::default()
        };
        assert_eq!(resolve_size(&settings, (100.0, 100.0)), None);
    }
}
