//! Construction of the overlay visual tree.

use crate::animation::ResolvedAnimation;
use crate::progress::{ProgressData, ProgressPosition};
use crate::settings::{Animation, ImageSettings};
use crate::state::{OverlayState, PendingFetch, SubElement, SubElementKind};
use crate::styles::{
    ELEMENT_CLASS, ELEMENT_CSS, FIXED_POSITIONING_CSS, OVERLAY_CLASS, OVERLAY_CSS, PROGRESS_BAR_CSS,
    PROGRESS_CLASS, PROGRESS_FIXED_CSS, PROGRESS_WRAPPER_CSS, SVG_CSS, TEXT_CLASS,
};
use crate::surface::{ContainerId, ElementId, Surface};

/// How an image value gets onto the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ImageSource {
    /// Vector markup given inline
    InlineMarkup,
    /// Vector image that has to be fetched and injected
    RemoteVector,
    /// Anything else, drawn as a background image
    Raster,
}

impl ImageSource {
    pub(crate) fn classify(value: &str) -> Self {
        let lower = value.to_lowercase();
        if lower.starts_with("<svg") && lower.ends_with("</svg>") {
            Self::InlineMarkup
        } else if lower.ends_with(".svg") || lower.starts_with("data:image/svg") {
            Self::RemoteVector
        } else {
            Self::Raster
        }
    }
}

/// Build the overlay root and its sub-elements, then attach it to `target`
pub(super) fn construct<S: Surface>(
    surface: &mut S,
    state: &mut OverlayState,
    target: ContainerId,
    generation: u64,
) {
    let settings = &state.settings;
    let overlay = surface.create_element();
    surface.add_class(overlay, OVERLAY_CLASS);
    surface.apply_css(overlay, OVERLAY_CSS);
    surface.set_style(
        overlay,
        "flex-direction",
        if settings.is_row() { "row" } else { "column" },
    );
    if settings.background_class.is_empty() {
        surface.set_style(overlay, "background", &settings.background);
    } else {
        surface.add_class(overlay, &settings.background_class);
    }
    if state.whole_page {
        surface.apply_css(overlay, FIXED_POSITIONING_CSS);
    }
    if let Some(z_index) = settings.z_index {
        surface.set_style(overlay, "z-index", &z_index.to_string());
    }

    let mut sub_elements = Vec::new();
    let mut pending_fetch = None;
    let mut text_element = None;
    let mut progress = None;

    if settings.image.enabled {
        let image = &settings.image;
        let element = sub_element(
            surface,
            overlay,
            &mut sub_elements,
            SubElementKind::Image,
            image.order,
            image.auto_resize,
            image.resize_factor,
            Some(&image.animation),
        );
        match ImageSource::classify(&image.value) {
            ImageSource::InlineMarkup => {
                surface.set_markup(element, &image.value);
                apply_vector_styles(surface, element, image);
            }
            ImageSource::RemoteVector => {
                let handle = surface.fetch_text(&image.value);
                tracing::debug!(fetch = %handle, url = %image.value, "Fetching vector image");
                pending_fetch = Some(PendingFetch {
                    handle,
                    element,
                    generation,
                });
            }
            ImageSource::Raster => {
                let url = format!("url({})", image.value);
                surface.apply_css(
                    element,
                    &[
                        ("background-image", url.as_str()),
                        ("background-position", "center"),
                        ("background-repeat", "no-repeat"),
                        ("background-size", "cover"),
                    ],
                );
            }
        }
        if !image.class.is_empty() {
            surface.add_class(element, &image.class);
        }
    }

    if settings.custom.enabled {
        let custom = &settings.custom;
        let element = sub_element(
            surface,
            overlay,
            &mut sub_elements,
            SubElementKind::Custom,
            custom.order,
            custom.auto_resize,
            custom.resize_factor,
            Some(&custom.animation),
        );
        surface.set_markup(element, &custom.value);
    }

    if settings.text.enabled {
        let text = &settings.text;
        let element = sub_element(
            surface,
            overlay,
            &mut sub_elements,
            SubElementKind::Text,
            text.order,
            text.auto_resize,
            text.resize_factor,
            Some(&text.animation),
        );
        surface.add_class(element, TEXT_CLASS);
        surface.set_text(element, &text.value);
        if !text.class.is_empty() {
            surface.add_class(element, &text.class);
        } else if !text.color.is_empty() {
            surface.set_style(element, "color", &text.color);
        }
        text_element = Some(element);
    }

    if settings.progress.enabled {
        let config = &settings.progress;
        let element = sub_element(
            surface,
            overlay,
            &mut sub_elements,
            SubElementKind::Progress,
            config.order,
            config.auto_resize,
            config.resize_factor,
            None,
        );
        surface.add_class(element, PROGRESS_CLASS);
        let wrapper = surface.create_element();
        surface.apply_css(wrapper, PROGRESS_WRAPPER_CSS);
        surface.append_child(element, wrapper);
        let bar = surface.create_element();
        surface.apply_css(bar, PROGRESS_BAR_CSS);
        surface.append_child(wrapper, bar);

        let data = ProgressData::resolve(config, element, bar);
        surface.apply_css(element, PROGRESS_FIXED_CSS);
        match data.position {
            ProgressPosition::Top => surface.set_style(element, "top", &data.margin),
            ProgressPosition::Bottom => {
                surface.set_style(element, "top", "auto");
                surface.set_style(element, "bottom", &data.margin);
            }
            ProgressPosition::Flow => {}
        }
        if !config.class.is_empty() {
            surface.add_class(bar, &config.class);
        } else if !config.color.is_empty() {
            surface.set_style(bar, "background", &config.color);
        }
        progress = Some(data);
    }

    state.overlay = Some(overlay);
    state.sub_elements = sub_elements;
    state.pending_fetch = pending_fetch;
    state.text_element = text_element;
    state.progress = progress;
    state.generation = generation;
    state.fading_out = false;
    surface.append_to_container(target, overlay);
}

#[allow(clippy::too_many_arguments)]
fn sub_element<S: Surface>(
    surface: &mut S,
    overlay: ElementId,
    sub_elements: &mut Vec<SubElement>,
    kind: SubElementKind,
    order: i32,
    auto_resize: bool,
    resize_factor: f64,
    animation: Option<&Animation>,
) -> ElementId {
    let element = surface.create_element();
    surface.add_class(element, ELEMENT_CLASS);
    surface.set_style(element, "order", &order.to_string());
    surface.apply_css(element, ELEMENT_CSS);
    surface.append_child(overlay, element);
    if let Some(resolved) = animation.and_then(ResolvedAnimation::resolve) {
        surface.apply_css(element, &resolved.css());
    }
    sub_elements.push(SubElement {
        element,
        kind,
        auto_resize,
        resize_factor,
    });
    element
}

/// Size injected vector markup to its element and apply the configured colors
pub(super) fn apply_vector_styles<S: Surface>(
    surface: &mut S,
    element: ElementId,
    image: &ImageSettings,
) {
    surface.style_markup_root(element, SVG_CSS);
    if image.class.is_empty() && !image.color.fill.is_empty() {
        let mut css = vec![("fill", image.color.fill.as_str())];
        if let Some(stroke) = image.color.stroke.as_deref().filter(|s| !s.is_empty()) {
            css.push(("stroke", stroke));
        }
        surface.style_markup_descendants(element, &css);
    }
}
