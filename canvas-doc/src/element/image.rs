//! Image element payload.
//!
//! The pixels themselves live in the external asset cache; an image element
//! only carries its source reference and whatever the loader reported back.
//! [`LoadState::Unloaded`] is a normal, permanent-if-need-be state.

use serde::{Deserialize, Serialize};

use super::menu::ContextMenuOption;
use super::{finite_or, Element, ElementContent};
use crate::control::{ControlConfig, ControlOverride, ControlOverrides, ControlValue};

/// Edge length of a freshly created image box.
const DEFAULT_EXTENT: f32 = 200.0;

pub(super) const CONTROL_IDS: &[&str] = &[
    "positionX",
    "positionY",
    "width",
    "height",
    "rotation",
    "opacity",
    "imageSrc",
    "imageAlt",
    "brightness",
    "contrast",
    "saturation",
    "hue",
    "blur",
];

/// Whether the referenced image has been decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadState {
    /// Not loaded yet (or failed); dimensions unknown.
    #[default]
    Unloaded,
    /// Loaded with known natural dimensions.
    Loaded {
        /// Intrinsic width in pixels.
        natural_width: u32,
        /// Intrinsic height in pixels.
        natural_height: u32,
    },
}

/// Region of the source image to display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge in source pixels.
    pub x: f32,
    /// Top edge in source pixels.
    pub y: f32,
    /// Width in source pixels.
    pub width: f32,
    /// Height in source pixels.
    pub height: f32,
}

impl CropRect {
    /// Create a crop rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Image adjustments. `None` means "not applied", distinct from a neutral value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    /// Brightness in `[-1, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Contrast in `[-1, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    /// Saturation in `[-1, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f32>,
    /// Hue rotation in degrees, `[0, 360)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<f32>,
    /// Blur radius, never negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
}

impl ImageFilters {
    /// Set brightness, clamped to `[-1, 1]`.
    pub fn set_brightness(&mut self, value: f32) {
        self.brightness = Some(clamp_signed_unit(value));
    }

    /// Set contrast, clamped to `[-1, 1]`.
    pub fn set_contrast(&mut self, value: f32) {
        self.contrast = Some(clamp_signed_unit(value));
    }

    /// Set saturation, clamped to `[-1, 1]`.
    pub fn set_saturation(&mut self, value: f32) {
        self.saturation = Some(clamp_signed_unit(value));
    }

    /// Set hue rotation, wrapped into `[0, 360)`.
    pub fn set_hue(&mut self, degrees: f32) {
        let wrapped = finite_or(degrees, 0.0).rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to exactly 360
        self.hue = Some(if wrapped >= 360.0 { 0.0 } else { wrapped });
    }

    /// Set blur radius, clamped to be non-negative.
    pub fn set_blur(&mut self, radius: f32) {
        self.blur = Some(finite_or(radius, 0.0).max(0.0));
    }

    /// Whether no filter is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_signed_unit(value: f32) -> f32 {
    finite_or(value, 0.0).clamp(-1.0, 1.0)
}

/// Image source, load state, crop and filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// URI or inline data URL.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Load state reported by the asset loader.
    #[serde(default)]
    pub load_state: LoadState,
    /// Optional crop region.
    #[serde(default)]
    pub crop: Option<CropRect>,
    /// Adjustments.
    #[serde(default)]
    pub filters: ImageFilters,
}

impl ImageData {
    /// Create an unloaded image.
    #[must_use]
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            load_state: LoadState::Unloaded,
            crop: None,
            filters: ImageFilters::default(),
        }
    }

    /// Point at a new source. The image becomes unloaded again.
    pub fn set_src(&mut self, src: impl Into<String>) {
        self.src = src.into();
        self.load_state = LoadState::Unloaded;
    }

    /// Set the alternative text.
    pub fn set_alt(&mut self, alt: impl Into<String>) {
        self.alt = alt.into();
    }

    /// Whether the loader has reported dimensions.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.load_state, LoadState::Loaded { .. })
    }

    /// Natural `(width, height)` once loaded.
    #[must_use]
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match self.load_state {
            LoadState::Loaded {
                natural_width,
                natural_height,
            } => Some((natural_width, natural_height)),
            LoadState::Unloaded => None,
        }
    }

    /// Width over height of the natural image, or 1 when unknown.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        match self.natural_size() {
            Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
            _ => 1.0,
        }
    }

    /// Crop to a region of the source.
    pub fn set_crop(&mut self, crop: CropRect) {
        self.crop = Some(crop);
    }

    /// Show the whole source again.
    pub fn remove_crop(&mut self) {
        self.crop = None;
    }

    /// Drop every filter.
    pub fn reset_filters(&mut self) {
        self.filters = ImageFilters::default();
    }
}

impl Element {
    /// Record that this element's image finished loading.
    ///
    /// A box still at its creation size is reshaped to the image's aspect
    /// ratio, keeping the longer side at 200px. Returns `false` if this is not
    /// an image element.
    pub fn image_loaded(&mut self, natural_width: u32, natural_height: u32) -> bool {
        let ElementContent::Image(data) = &mut self.content else {
            return false;
        };
        data.load_state = LoadState::Loaded {
            natural_width,
            natural_height,
        };
        let ratio = data.aspect_ratio();
        let untouched = (self.transform.width - DEFAULT_EXTENT).abs() < f32::EPSILON
            && (self.transform.height - DEFAULT_EXTENT).abs() < f32::EPSILON;
        if untouched {
            if ratio > 1.0 {
                self.transform
                    .set_size(DEFAULT_EXTENT, DEFAULT_EXTENT / ratio);
            } else {
                self.transform
                    .set_size(DEFAULT_EXTENT * ratio, DEFAULT_EXTENT);
            }
        }
        true
    }

    /// Scale a loaded image to fit inside a container, preserving aspect ratio.
    ///
    /// Returns `false` (and changes nothing) for unloaded images and other kinds.
    pub fn fit_image_to(&mut self, container_width: f32, container_height: f32) -> bool {
        let Some(data) = self.as_image() else {
            return false;
        };
        if !data.is_loaded() || container_height <= 0.0 {
            return false;
        }
        let ratio = data.aspect_ratio();
        if ratio > container_width / container_height {
            self.transform
                .set_size(container_width, container_width / ratio);
        } else {
            self.transform
                .set_size(container_height * ratio, container_height);
        }
        true
    }
}

pub(super) fn context_menu_options() -> Vec<ContextMenuOption> {
    vec![
        ContextMenuOption::item("Replace Image", "replace-image", "🖼️"),
        ContextMenuOption::item("Duplicate", "duplicate", "📋"),
        ContextMenuOption::item("Delete", "delete", "🗑️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Crop Image", "crop-image", "✂️"),
        ContextMenuOption::item("Reset Filters", "reset-filters", "🔄"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Fit to Original Size", "fit-original", "📐"),
        ContextMenuOption::item("Bring to Front", "bring-to-front", "⬆️"),
        ContextMenuOption::item("Send to Back", "send-to-back", "⬇️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Lock Element", "lock", "🔒"),
        ContextMenuOption::item("Download Image", "download-image", "💾"),
    ]
}

/// Width and height edits keep the natural aspect ratio.
pub(super) fn control_overrides() -> ControlOverrides {
    ControlOverrides::from([
        (
            "width",
            ControlOverride::default()
                .with_setter(set_width_keep_aspect)
                .with_config(size_config),
        ),
        (
            "height",
            ControlOverride::default().with_setter(set_height_keep_aspect),
        ),
    ])
}

fn size_config() -> ControlConfig {
    ControlConfig::number().min(1.0).step(1.0)
}

fn set_width_keep_aspect(element: &mut Element, value: &ControlValue) {
    let ratio = element.as_image().map_or(1.0, ImageData::aspect_ratio);
    element.transform.set_width(value.as_number_or(1.0));
    let width = element.transform.width;
    element.transform.set_height(width / ratio);
}

fn set_height_keep_aspect(element: &mut Element, value: &ControlValue) {
    let ratio = element.as_image().map_or(1.0, ImageData::aspect_ratio);
    element.transform.set_height(value.as_number_or(1.0));
    let height = element.transform.height;
    element.transform.set_width(height * ratio);
}
