//! Progress Model
//!
//! Maps externally supplied progress values onto a clamped bar width, and
//! holds the resolved per-overlay progress state.

use crate::settings::ProgressSettings;
use crate::styles::is_valid_size;
use crate::surface::ElementId;

/// Map `value` in `[min, max]` to a percentage clamped to `[0, 100]`
///
/// A NaN `value` is treated as 0. Callers must only invoke this with
/// `max > min`; the engine handles the degenerate range separately.
#[must_use]
pub fn to_percent(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_nan() { 0.0 } else { value };
    let percent = (value - min) * 100.0 / (max - min);
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Argument of a progress update
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressUpdate {
    /// Hide the bar
    Hide,
    /// Show the bar at this value
    Value(f64),
}

impl From<f64> for ProgressUpdate {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<Option<f64>> for ProgressUpdate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Hide, Self::Value)
    }
}

/// Where the progress element is pinned inside the overlay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProgressPosition {
    /// In the flex flow with the other sub-elements
    #[default]
    Flow,
    /// Pinned to the top edge
    Top,
    /// Pinned to the bottom edge
    Bottom,
}

impl ProgressPosition {
    /// Resolve a configured position; anything outside the allow-list is `Flow`
    #[must_use]
    pub fn resolve(position: &str) -> Self {
        match position {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Flow,
        }
    }
}

/// Resolved progress state of a rendered overlay
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressData {
    /// The progress sub-element
    pub element: ElementId,
    /// The bar inside it
    pub bar: ElementId,
    /// Resolved position
    pub position: ProgressPosition,
    /// Validated margin, "0" when the configured one is malformed
    pub margin: String,
    /// Value mapped to 0%
    pub min: f64,
    /// Value mapped to 100%
    pub max: f64,
    /// Width transition duration in milliseconds
    pub speed: u64,
}

impl ProgressData {
    /// Resolve configured progress settings for a freshly built bar
    #[must_use]
    pub fn resolve(settings: &ProgressSettings, element: ElementId, bar: ElementId) -> Self {
        let margin = if is_valid_size(&settings.margin) {
            settings.margin.clone()
        } else {
            "0".to_string()
        };
        Self {
            element,
            bar,
            position: ProgressPosition::resolve(&settings.position),
            margin,
            min: settings.min,
            max: settings.max,
            speed: settings.speed,
        }
    }

    /// Whether values can be mapped onto the bar at all
    #[must_use]
    pub fn has_range(&self) -> bool {
        self.max > self.min
    }

    /// Percentage for `value`, or `None` for a degenerate range
    #[must_use]
    pub fn percent(&self, value: f64) -> Option<f64> {
        self.has_range().then(|| to_percent(value, self.min, self.max))
    }
}
