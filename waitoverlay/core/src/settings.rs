//! Settings Tree
//!
//! The effective configuration governing one overlay. Every leaf has a
//! type-stable default; partial overrides (see [`crate::merge`]) can only
//! replace leaves with values of the same type.

use serde::{Deserialize, Serialize};

/// Built-in eight-dot spinner markup used as the default image
pub const DEFAULT_IMAGE: &str = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1000 1000'><circle r='80' cx='500' cy='90'/><circle r='80' cx='500' cy='910'/><circle r='80' cx='90' cy='500'/><circle r='80' cx='910' cy='500'/><circle r='80' cx='212' cy='212'/><circle r='80' cx='788' cy='212'/><circle r='80' cx='212' cy='788'/><circle r='80' cx='788' cy='788'/></svg>";

/// Complete overlay configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Keep sub-elements sized to the container while visible
    pub resize: bool,
    /// Background style, used when `background_class` is empty
    pub background: String,
    /// Background class, takes precedence over `background`
    pub background_class: String,
    /// Image sub-element
    pub image: ImageSettings,
    /// Custom markup sub-element
    pub custom: CustomSettings,
    /// Text sub-element
    pub text: TextSettings,
    /// Progress bar sub-element
    pub progress: ProgressSettings,
    /// Base size that sub-elements scale from
    pub size: SizeSettings,
    /// Upper bound for automatic sizing (0 = unbounded)
    pub max_size: f64,
    /// Lower bound for automatic sizing (0 = unbounded)
    pub min_size: f64,
    /// Flex direction of the overlay: "row" or "column"
    pub direction: String,
    /// Fade durations in milliseconds: `[fade_in, fade_out]`
    pub fade: [u64; 2],
    /// Stacking order of the overlay root, if any
    pub z_index: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resize: true,
            background: "rgba(255, 255, 255, 0.8)".to_string(),
            background_class: String::new(),
            image: ImageSettings::default(),
            custom: CustomSettings::default(),
            text: TextSettings::default(),
            progress: ProgressSettings::default(),
            size: SizeSettings::default(),
            max_size: 120.0,
            min_size: 20.0,
            direction: "column".to_string(),
            fade: [400, 200],
            z_index: Some(2_147_483_647),
        }
    }
}

impl Settings {
    /// Fade-in duration in milliseconds
    #[must_use]
    pub fn fade_in_ms(&self) -> u64 {
        self.fade[0]
    }

    /// Fade-out duration in milliseconds
    #[must_use]
    pub fn fade_out_ms(&self) -> u64 {
        self.fade[1]
    }

    /// Whether the overlay lays its sub-elements out in a row
    #[must_use]
    pub fn is_row(&self) -> bool {
        self.direction.eq_ignore_ascii_case("row")
    }
}

/// Named looping animation applied to a sub-element
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    /// Animation name, e.g. "rotate_right"
    pub name: String,
    /// CSS-style duration, e.g. "2000ms" or "1.5s"
    pub time: String,
}

impl Animation {
    /// Create an animation description
    pub fn new(name: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
        }
    }
}

/// Fill and stroke colors for vector images
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageColor {
    /// Fill color applied to every vector descendant
    pub fill: String,
    /// Optional stroke color
    pub stroke: Option<String>,
}

impl Default for ImageColor {
    fn default() -> Self {
        Self {
            fill: "#202020".to_string(),
            stroke: None,
        }
    }
}

/// Image sub-element configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSettings {
    /// Whether the element is built
    pub enabled: bool,
    /// Inline vector markup, a vector image URL or a raster image URL
    pub value: String,
    /// Extra class name
    pub class: String,
    /// Participate in observed resizes
    pub auto_resize: bool,
    /// Multiplier applied to the base size
    pub resize_factor: f64,
    /// Colors for vector images
    pub color: ImageColor,
    /// Flex order
    pub order: i32,
    /// Looping animation
    pub animation: Animation,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            value: DEFAULT_IMAGE.to_string(),
            class: String::new(),
            auto_resize: true,
            resize_factor: 1.0,
            color: ImageColor::default(),
            order: 1,
            animation: Animation::new("rotate_right", "2000ms"),
        }
    }
}

/// Custom markup sub-element configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSettings {
    /// Whether the element is built
    pub enabled: bool,
    /// Markup injected verbatim
    pub value: String,
    /// Participate in observed resizes
    pub auto_resize: bool,
    /// Multiplier applied to the base size
    pub resize_factor: f64,
    /// Flex order
    pub order: i32,
    /// Looping animation
    pub animation: Animation,
}

impl Default for CustomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            value: String::new(),
            auto_resize: true,
            resize_factor: 1.0,
            order: 3,
            animation: Animation::default(),
        }
    }
}

/// Text sub-element configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    /// Whether the element is built
    pub enabled: bool,
    /// Initial text content
    pub value: String,
    /// Extra class name, takes precedence over `color`
    pub class: String,
    /// Participate in observed resizes
    pub auto_resize: bool,
    /// Multiplier applied to the base size (font size)
    pub resize_factor: f64,
    /// Text color
    pub color: String,
    /// Flex order
    pub order: i32,
    /// Looping animation
    pub animation: Animation,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            value: String::new(),
            class: String::new(),
            auto_resize: true,
            resize_factor: 0.5,
            color: "#202020".to_string(),
            order: 4,
            animation: Animation::default(),
        }
    }
}

/// Progress bar sub-element configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSettings {
    /// Whether the element is built
    pub enabled: bool,
    /// Extra class name for the bar, takes precedence over `color`
    pub class: String,
    /// Participate in observed resizes
    pub auto_resize: bool,
    /// Multiplier applied to the base size (bar thickness)
    pub resize_factor: f64,
    /// Value mapped to 0%
    pub min: f64,
    /// Value mapped to 100%
    pub max: f64,
    /// Width transition duration in milliseconds
    pub speed: u64,
    /// "" (in flow), "top" or "bottom"
    pub position: String,
    /// Distance from the chosen edge, e.g. "10px"
    pub margin: String,
    /// Bar color
    pub color: String,
    /// Flex order
    pub order: i32,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            class: String::new(),
            auto_resize: true,
            resize_factor: 0.25,
            min: 0.0,
            max: 100.0,
            speed: 200,
            position: String::new(),
            margin: String::new(),
            color: "#a0a0a0".to_string(),
            order: 5,
        }
    }
}

/// Base size configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeSettings {
    /// Size value; with [`Units::Auto`] a percentage of the container
    pub value: f64,
    /// Unit of `value`
    pub units: Units,
}

impl Default for SizeSettings {
    fn default() -> Self {
        Self {
            value: 50.0,
            units: Units::Auto,
        }
    }
}

/// Size units accepted by `size.units`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    /// Percentage of the lesser container dimension, resolved to pixels
    #[default]
    #[serde(rename = "")]
    Auto,
    /// Percent of the smaller viewport dimension
    #[serde(rename = "vmin")]
    Vmin,
    /// Percent of the larger viewport dimension
    #[serde(rename = "vmax")]
    Vmax,
    /// Relative to the element font size
    #[serde(rename = "em")]
    Em,
    /// Relative to the root font size
    #[serde(rename = "rem")]
    Rem,
    /// Points
    #[serde(rename = "pt")]
    Pt,
    /// Picas
    #[serde(rename = "pc")]
    Pc,
    /// Inches
    #[serde(rename = "in")]
    In,
    /// Centimeters
    #[serde(rename = "cm")]
    Cm,
    /// Millimeters
    #[serde(rename = "mm")]
    Mm,
    /// Percent of the viewport height
    #[serde(rename = "vh")]
    Vh,
    /// Percent of the viewport width
    #[serde(rename = "vw")]
    Vw,
    /// Pixels
    #[serde(rename = "px")]
    Px,
}

impl Units {
    /// Unit suffix as written after a number ("" for automatic sizing)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Vh => "vh",
            Self::Vw => "vw",
            Self::Px => "px",
        }
    }

    /// Unit used when writing resolved sizes; automatic sizing resolves to pixels
    #[must_use]
    pub fn resolved(self) -> Self {
        match self {
            Self::Auto => Self::Px,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.resize);
        assert!(settings.image.enabled);
        assert!(!settings.text.enabled);
        assert_eq!(settings.fade, [400, 200]);
        assert_eq!(settings.z_index, Some(2_147_483_647));
        assert_eq!(settings.image.animation.name, "rotate_right");
        assert_eq!(settings.progress.order, 5);
        assert_eq!(settings.size.units, Units::Auto);
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        let mut settings = Settings::default();
        assert!(!settings.is_row());
        settings.direction = "ROW".to_string();
        assert!(settings.is_row());
    }

    #[test]
    fn test_units_serde_names() {
        let auto: Units = serde_json::from_str("\"\"").unwrap();
        assert_eq!(auto, Units::Auto);
        let vmin: Units = serde_json::from_str("\"vmin\"").unwrap();
        assert_eq!(vmin, Units::Vmin);
        assert!(serde_json::from_str::<Units>("\"furlong\"").is_err());
        assert_eq!(serde_json::to_string(&Units::Px).unwrap(), "\"px\"");
    }

    #[test]
    fn test_units_resolved() {
        assert_eq!(Units::Auto.resolved(), Units::Px);
        assert_eq!(Units::Em.resolved(), Units::Em);
        assert_eq!(Units::Auto.resolved().as_str(), "px");
    }

    #[test]
    fn test_settings_from_camel_case_json() {
        let json = r#"{ "backgroundClass": "dim", "maxSize": 80, "zIndex": null }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.background_class, "dim");
        assert!((settings.max_size - 80.0).abs() < f64::EPSILON);
        assert_eq!(settings.z_index, None);
        // Missing keys take their defaults
        assert_eq!(settings.fade, [400, 200]);
    }
}
