//! Sub-element Animations
//!
//! Sub-elements may loop one of a small set of named keyframe animations.
//! The engine only describes the animation; the surface is expected to know
//! the keyframes named `waitoverlay_animation__<name>`.
//!
//! Unknown names are cleared from the effective settings when an overlay is
//! rendered. Malformed durations leave the element without an animation.

use std::sync::LazyLock;

use regex::Regex;

use crate::settings::{Animation, Settings};
use crate::styles::ANIMATION_PREFIX;

/// Animation names the keyframe stylesheet provides
pub const ANIMATION_NAMES: &[&str] = &["rotate_right", "rotate_left", "fadein", "pulse"];

static VALID_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?(?:ms|s)$").expect("time grammar is a valid regex")
});

/// Whether `time` is a CSS duration such as "2000ms" or "1.5s"
#[must_use]
pub fn is_valid_time(time: &str) -> bool {
    VALID_TIME.is_match(time)
}

/// Clear animation names the keyframe stylesheet does not provide
pub fn normalize_names(settings: &mut Settings) {
    for animation in [
        &mut settings.image.animation,
        &mut settings.custom.animation,
        &mut settings.text.animation,
    ] {
        if !ANIMATION_NAMES.contains(&animation.name.as_str()) {
            animation.name.clear();
        }
    }
}

/// Validated animation, ready to be written as style properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAnimation {
    /// Keyframe name, prefixed
    pub keyframes: String,
    /// Duration as configured
    pub duration: String,
}

impl ResolvedAnimation {
    /// Validate an animation description
    ///
    /// Returns `None` when the name is empty or unknown, or the time is malformed.
    #[must_use]
    pub fn resolve(animation: &Animation) -> Option<Self> {
        if !ANIMATION_NAMES.contains(&animation.name.as_str()) || !is_valid_time(&animation.time) {
            return None;
        }
        Some(Self {
            keyframes: format!("{ANIMATION_PREFIX}{}", animation.name),
            duration: animation.time.clone(),
        })
    }

    /// Style properties that start the animation
    #[must_use]
    pub fn css(&self) -> [(&str, &str); 4] {
        [
            ("animation-name", self.keyframes.as_str()),
            ("animation-duration", self.duration.as_str()),
            ("animation-timing-function", "linear"),
            ("animation-iteration-count", "infinite"),
        ]
    }
}
