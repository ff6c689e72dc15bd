//! Configuration Merging
//!
//! Partial override trees and the deep-merge that folds them over a base
//! [`Settings`] tree.
//!
//! # Merge Rule
//!
//! Applied key by key, recursively:
//! - nested sub-trees present in the override are merged into the base sub-tree
//! - leaves present in the override replace the base leaf (sequences such as
//!   `fade` are replaced wholesale, never element-merged)
//! - keys absent from the override leave the base untouched
//!
//! Optional leaves (`zIndex`, `image.color.stroke`) distinguish an absent key
//! from an explicit `null`, which clears the leaf.
//!
//! The result is always a fresh tree; neither the base nor any override is
//! modified or aliased.

use serde::{Deserialize, Deserializer, Serialize};

use crate::settings::{
    Animation, CustomSettings, ImageColor, ImageSettings, ProgressSettings, Settings, SizeSettings,
    TextSettings, Units,
};

/// Fold a partial tree into `self`
pub trait Merge {
    /// Override shape accepted by this tree
    type Partial;

    /// Apply `partial` over `self`, leaf by leaf
    fn merge_from(&mut self, partial: &Self::Partial);
}

/// Deep-merge `overrides` left to right over a copy of `base`
pub fn merge<'a>(
    base: &Settings,
    overrides: impl IntoIterator<Item = &'a PartialSettings>,
) -> Settings {
    let mut result = base.clone();
    for partial in overrides {
        result.merge_from(partial);
    }
    result
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial [`Settings`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSettings {
    /// See [`Settings::resize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<bool>,
    /// See [`Settings::background`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// See [`Settings::background_class`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_class: Option<String>,
    /// See [`Settings::image`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PartialImage>,
    /// See [`Settings::custom`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<PartialCustom>,
    /// See [`Settings::text`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<PartialText>,
    /// See [`Settings::progress`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<PartialProgress>,
    /// See [`Settings::size`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<PartialSize>,
    /// See [`Settings::max_size`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    /// See [`Settings::min_size`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    /// See [`Settings::direction`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// See [`Settings::fade`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade: Option<[u64; 2]>,
    /// See [`Settings::z_index`]; `Some(None)` clears it
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub z_index: Option<Option<i64>>,
}

impl PartialSettings {
    /// Parse an override tree from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a leaf has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether this override changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial [`Animation`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialAnimation {
    /// See [`Animation::name`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// See [`Animation::time`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Partial [`ImageColor`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialImageColor {
    /// See [`ImageColor::fill`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// See [`ImageColor::stroke`]; `Some(None)` clears it
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke: Option<Option<String>>,
}

/// Partial [`ImageSettings`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialImage {
    /// See [`ImageSettings::enabled`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// See [`ImageSettings::value`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// See [`ImageSettings::class`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// See [`ImageSettings::auto_resize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    /// See [`ImageSettings::resize_factor`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_factor: Option<f64>,
    /// See [`ImageSettings::color`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<PartialImageColor>,
    /// See [`ImageSettings::order`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// See [`ImageSettings::animation`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<PartialAnimation>,
}

/// Partial [`CustomSettings`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialCustom {
    /// See [`CustomSettings::enabled`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// See [`CustomSettings::value`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// See [`CustomSettings::auto_resize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    /// See [`CustomSettings::resize_factor`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_factor: Option<f64>,
    /// See [`CustomSettings::order`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// See [`CustomSettings::animation`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<PartialAnimation>,
}

/// Partial [`TextSettings`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialText {
    /// See [`TextSettings::enabled`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// See [`TextSettings::value`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// See [`TextSettings::class`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// See [`TextSettings::auto_resize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    /// See [`TextSettings::resize_factor`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_factor: Option<f64>,
    /// See [`TextSettings::color`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// See [`TextSettings::order`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// See [`TextSettings::animation`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<PartialAnimation>,
}

/// Partial [`ProgressSettings`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialProgress {
    /// See [`ProgressSettings::enabled`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// See [`ProgressSettings::class`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// See [`ProgressSettings::auto_resize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_resize: Option<bool>,
    /// See [`ProgressSettings::resize_factor`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_factor: Option<f64>,
    /// See [`ProgressSettings::min`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// See [`ProgressSettings::max`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// See [`ProgressSettings::speed`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u64>,
    /// See [`ProgressSettings::position`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// See [`ProgressSettings::margin`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    /// See [`ProgressSettings::color`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// See [`ProgressSettings::order`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Partial [`SizeSettings`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSize {
    /// See [`SizeSettings::value`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// See [`SizeSettings::units`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
}

// Implements `Merge` for a full tree and for its partial shape, so partials
// can be layered over each other before being applied.
macro_rules! impl_merge {
    ($full:ty => $partial:ty { leaves: [$($leaf:ident),*], nested: [$($nested:ident),*] }) => {
        impl Merge for $full {
            type Partial = $partial;

            fn merge_from(&mut self, partial: &$partial) {
                $(
                    if let Some(value) = &partial.$leaf {
                        self.$leaf.clone_from(value);
                    }
                )*
                $(
                    if let Some(subtree) = &partial.$nested {
                        self.$nested.merge_from(subtree);
                    }
                )*
            }
        }

        impl Merge for $partial {
            type Partial = $partial;

            fn merge_from(&mut self, partial: &$partial) {
                $(
                    if partial.$leaf.is_some() {
                        self.$leaf.clone_from(&partial.$leaf);
                    }
                )*
                $(
                    if let Some(subtree) = &partial.$nested {
                        self.$nested
                            .get_or_insert_with(Default::default)
                            .merge_from(subtree);
                    }
                )*
            }
        }
    };
}

impl_merge!(Settings => PartialSettings {
    leaves: [resize, background, background_class, max_size, min_size, direction, fade, z_index],
    nested: [image, custom, text, progress, size]
});
impl_merge!(Animation => PartialAnimation { leaves: [name, time], nested: [] });
impl_merge!(ImageColor => PartialImageColor { leaves: [fill, stroke], nested: [] });
impl_merge!(ImageSettings => PartialImage {
    leaves: [enabled, value, class, auto_resize, resize_factor, order],
    nested: [color, animation]
});
impl_merge!(CustomSettings => PartialCustom {
    leaves: [enabled, value, auto_resize, resize_factor, order],
    nested: [animation]
});
impl_merge!(TextSettings => PartialText {
    leaves: [enabled, value, class, auto_resize, resize_factor, color, order],
    nested: [animation]
});
impl_merge!(ProgressSettings => PartialProgress {
    leaves: [enabled, class, auto_resize, resize_factor, min, max, speed, position, margin, color, order],
    nested: []
});
impl_merge!(SizeSettings => PartialSize { leaves: [value, units], nested: [] });
