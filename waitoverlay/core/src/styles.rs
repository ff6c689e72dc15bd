//! Style tables and class names shared by the tree builder and resize pass.

use std::sync::LazyLock;

use regex::Regex;

/// Class on the overlay root
pub const OVERLAY_CLASS: &str = "waitoverlay";
/// Class on every sub-element
pub const ELEMENT_CLASS: &str = "waitoverlay_element";
/// Class on the text sub-element
pub const TEXT_CLASS: &str = "waitoverlay_text";
/// Class on the progress sub-element
pub const PROGRESS_CLASS: &str = "waitoverlay_progress";
/// Class marking icon-font elements, scaled like text
pub const ICON_FONT_CLASS: &str = "waitoverlay_fa";
/// Prefix of the keyframe names referenced by sub-element animations
pub const ANIMATION_PREFIX: &str = "waitoverlay_animation__";

/// `display` value of a visible overlay root
pub const OVERLAY_DISPLAY: &str = "flex";

pub(crate) const OVERLAY_CSS: &[(&str, &str)] = &[
    ("box-sizing", "border-box"),
    ("position", "relative"),
    ("display", OVERLAY_DISPLAY),
    ("flex-wrap", "nowrap"),
    ("align-items", "center"),
    ("justify-content", "space-around"),
];

pub(crate) const ELEMENT_CSS: &[(&str, &str)] = &[
    ("box-sizing", "border-box"),
    ("overflow", "visible"),
    ("flex", "0 0 auto"),
    ("display", "flex"),
    ("justify-content", "center"),
    ("align-items", "center"),
];

pub(crate) const SVG_CSS: &[(&str, &str)] = &[("width", "100%"), ("height", "100%")];

pub(crate) const PROGRESS_BAR_CSS: &[(&str, &str)] = &[("position", "absolute"), ("left", "0")];

pub(crate) const PROGRESS_FIXED_CSS: &[(&str, &str)] =
    &[("position", "absolute"), ("left", "0"), ("width", "100%")];

pub(crate) const PROGRESS_WRAPPER_CSS: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
];

pub(crate) const FIXED_POSITIONING_CSS: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
];

static VALID_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0*(?:\.\d*[1-9]\d*|[1-9]\d*(?:\.\d+)?))(vm(?:in|ax)|r?em|in|p[tcx]|v[hw]|[cm]m|%)$")
        .expect("size grammar is a valid regex")
});

/// Whether `value` is a positive number followed by a known size unit
#[must_use]
pub fn is_valid_size(value: &str) -> bool {
    VALID_SIZE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sizes() {
        for value in [
            "10px", "0.5em", "1.25rem", "3vh", "100%", "2vmin", "4vmax", ".5cm", "007mm",
        ] {
            assert!(is_valid_size(value), "{value} should be accepted");
        }
    }

    #[test]
    fn test_invalid_sizes() {
        for value in [
            "", "0", "0px", "px", "10", "-4px", "10 px", "1.px", "5furlong", "10PX", "2vmix",
        ] {
            assert!(!is_valid_size(value), "{value} should be rejected");
        }
    }
}
