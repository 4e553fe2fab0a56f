//! The id-keyed table of reusable control descriptors.
//!
//! Built-in accessors check the element kind before touching kind-specific
//! fields. Against the wrong kind a getter returns an inert default and a
//! setter does nothing; filtering by kind is left to the visibility predicates.

use std::collections::HashMap;

use super::{
    ControlConfig, ControlDescriptor, ControlOption, ControlValue, EditorKind,
};
use crate::element::{Element, ElementKind, LinkTarget};

/// Immutable table of control descriptors.
///
/// Construct it once through [`ControlCatalog::builder`] (or
/// [`ControlCatalog::builtin`]) and pass it by reference to whatever needs to
/// resolve controls.
#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    descriptors: HashMap<&'static str, ControlDescriptor>,
    order: Vec<&'static str>,
}

impl ControlCatalog {
    /// Start an empty catalog.
    #[must_use]
    pub fn builder() -> ControlCatalogBuilder {
        ControlCatalogBuilder::default()
    }

    /// Catalog holding every built-in descriptor.
    #[must_use]
    pub fn builtin() -> Self {
        Self::builder().with_builtins().build()
    }

    /// Look up a descriptor by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ControlDescriptor> {
        self.descriptors.get(id)
    }

    /// Whether a descriptor is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builder for [`ControlCatalog`].
#[derive(Debug, Default)]
pub struct ControlCatalogBuilder {
    catalog: ControlCatalog,
}

impl ControlCatalogBuilder {
    /// Add a descriptor. A later registration with the same id replaces the
    /// earlier one but keeps its position.
    #[must_use]
    pub fn register(mut self, descriptor: ControlDescriptor) -> Self {
        if self
            .catalog
            .descriptors
            .insert(descriptor.id, descriptor)
            .is_some()
        {
            tracing::debug!("Control '{}' re-registered", descriptor.id);
        } else {
            self.catalog.order.push(descriptor.id);
        }
        self
    }

    /// Add every built-in descriptor.
    #[must_use]
    pub fn with_builtins(self) -> Self {
        builtin_descriptors()
            .into_iter()
            .fold(self, ControlCatalogBuilder::register)
    }

    /// Freeze the catalog.
    #[must_use]
    pub fn build(self) -> ControlCatalog {
        self.catalog
    }
}

fn builtin_descriptors() -> Vec<ControlDescriptor> {
    vec![
        // Transform
        ControlDescriptor::new("positionX", EditorKind::Input, "X", get_x, set_x)
            .icon("↔️")
            .config(step_one)
            .disabled_when(is_locked),
        ControlDescriptor::new("positionY", EditorKind::Input, "Y", get_y, set_y)
            .icon("↕️")
            .config(step_one)
            .disabled_when(is_locked),
        ControlDescriptor::new("width", EditorKind::Input, "W", get_width, set_width)
            .icon("↔️")
            .config(extent_config)
            .disabled_when(is_locked),
        ControlDescriptor::new("height", EditorKind::Input, "H", get_height, set_height)
            .icon("↕️")
            .config(extent_config)
            .disabled_when(is_locked),
        ControlDescriptor::new(
            "rotation",
            EditorKind::Slider,
            "Rotation",
            get_rotation,
            set_rotation,
        )
        .icon("🔄")
        .config(|| ControlConfig::slider(0.0, 360.0, 1.0))
        .disabled_when(is_locked),
        ControlDescriptor::new(
            "opacity",
            EditorKind::Slider,
            "Opacity",
            get_opacity,
            set_opacity,
        )
        .icon("👁️")
        .config(|| ControlConfig::slider(0.0, 1.0, 0.01)),
        // Text
        ControlDescriptor::new(
            "textContent",
            EditorKind::Input,
            "Text",
            get_text_content,
            set_text_content,
        )
        .icon("📝")
        .config(|| ControlConfig::input("text"))
        .visible_when(is_text),
        ControlDescriptor::new(
            "fontSize",
            EditorKind::Slider,
            "Font Size",
            get_font_size,
            set_font_size,
        )
        .icon("🔤")
        .config(|| ControlConfig::slider(8.0, 72.0, 1.0))
        .visible_when(is_text),
        ControlDescriptor::new(
            "fontFamily",
            EditorKind::Select,
            "Font",
            get_font_family,
            set_font_family,
        )
        .icon("🔤")
        .options(font_options)
        .visible_when(is_text),
        ControlDescriptor::new(
            "textColor",
            EditorKind::Color,
            "Color",
            get_text_color,
            set_text_color,
        )
        .icon("🎨")
        .visible_when(is_text),
        // Image
        ControlDescriptor::new(
            "imageSrc",
            EditorKind::Input,
            "Image URL",
            get_image_src,
            set_image_src,
        )
        .icon("🔗")
        .config(|| ControlConfig::input("url"))
        .visible_when(is_image),
        ControlDescriptor::new(
            "imageAlt",
            EditorKind::Input,
            "Alt Text",
            get_image_alt,
            set_image_alt,
        )
        .icon("📝")
        .config(|| ControlConfig::input("text"))
        .visible_when(is_image),
        ControlDescriptor::new(
            "brightness",
            EditorKind::Slider,
            "Brightness",
            get_brightness,
            set_brightness,
        )
        .icon("☀️")
        .config(signed_unit_config)
        .visible_when(is_image),
        ControlDescriptor::new(
            "contrast",
            EditorKind::Slider,
            "Contrast",
            get_contrast,
            set_contrast,
        )
        .icon("◐")
        .config(signed_unit_config)
        .visible_when(is_image),
        ControlDescriptor::new(
            "saturation",
            EditorKind::Slider,
            "Saturation",
            get_saturation,
            set_saturation,
        )
        .icon("🌈")
        .config(signed_unit_config)
        .visible_when(is_image),
        ControlDescriptor::new("hue", EditorKind::Slider, "Hue", get_hue, set_hue)
            .icon("🎨")
            .config(|| ControlConfig::slider(0.0, 360.0, 1.0))
            .visible_when(is_image),
        ControlDescriptor::new("blur", EditorKind::Slider, "Blur", get_blur, set_blur)
            .icon("💧")
            .config(|| ControlConfig::slider(0.0, 20.0, 0.5))
            .visible_when(is_image),
        // Button
        ControlDescriptor::new(
            "buttonText",
            EditorKind::Input,
            "Button Text",
            get_button_text,
            set_button_text,
        )
        .icon("📝")
        .visible_when(is_button),
        ControlDescriptor::new(
            "buttonUrl",
            EditorKind::Input,
            "URL",
            get_button_url,
            set_button_url,
        )
        .icon("🔗")
        .config(|| ControlConfig::input("url").placeholder("https://"))
        .visible_when(is_button),
        ControlDescriptor::new(
            "backgroundColor",
            EditorKind::Color,
            "Background",
            get_background_color,
            set_background_color,
        )
        .icon("🎨")
        .visible_when(is_button),
        ControlDescriptor::new(
            "buttonTarget",
            EditorKind::Select,
            "Open In",
            get_button_target,
            set_button_target,
        )
        .icon("↗️")
        .options(target_options)
        .visible_when(is_button),
        ControlDescriptor::new(
            "buttonDisabled",
            EditorKind::Toggle,
            "Disabled",
            get_button_disabled,
            set_button_disabled,
        )
        .icon("🚫")
        .visible_when(is_button),
    ]
}

// ---------------------------------------------------------------------------
// Predicates and providers
// ---------------------------------------------------------------------------

fn is_text(element: &Element) -> bool {
    element.kind() == ElementKind::Text
}

fn is_image(element: &Element) -> bool {
    element.kind() == ElementKind::Image
}

fn is_button(element: &Element) -> bool {
    element.kind() == ElementKind::Button
}

fn is_locked(element: &Element) -> bool {
    element.locked
}

fn step_one() -> ControlConfig {
    ControlConfig::number().step(1.0)
}

fn extent_config() -> ControlConfig {
    ControlConfig::number().min(1.0).step(1.0)
}

fn signed_unit_config() -> ControlConfig {
    ControlConfig::slider(-1.0, 1.0, 0.01)
}

fn font_options() -> Vec<ControlOption> {
    vec![
        ControlOption::text("Arial", "Arial"),
        ControlOption::text("Georgia", "Georgia"),
        ControlOption::text("Times New Roman", "Times"),
        ControlOption::text("Courier New", "Courier"),
        ControlOption::text("Helvetica", "Helvetica"),
    ]
}

fn target_options() -> Vec<ControlOption> {
    vec![
        ControlOption::text("_blank", "New Tab"),
        ControlOption::text("_self", "Same Tab"),
        ControlOption::text("_parent", "Parent Frame"),
        ControlOption::text("_top", "Top Frame"),
    ]
}

// ---------------------------------------------------------------------------
// Transform accessors
// ---------------------------------------------------------------------------

fn get_x(element: &Element) -> ControlValue {
    ControlValue::Number(element.transform.x.round())
}

fn set_x(element: &mut Element, value: &ControlValue) {
    let y = element.transform.y;
    element.set_position(value.as_number_or(0.0), y);
}

fn get_y(element: &Element) -> ControlValue {
    ControlValue::Number(element.transform.y.round())
}

fn set_y(element: &mut Element, value: &ControlValue) {
    let x = element.transform.x;
    element.set_position(x, value.as_number_or(0.0));
}

fn get_width(element: &Element) -> ControlValue {
    ControlValue::Number(element.transform.width.round())
}

fn set_width(element: &mut Element, value: &ControlValue) {
    element.transform.set_width(value.as_number_or(1.0));
}

fn get_height(element: &Element) -> ControlValue {
    ControlValue::Number(element.transform.height.round())
}

fn set_height(element: &mut Element, value: &ControlValue) {
    element.transform.set_height(value.as_number_or(1.0));
}

fn get_rotation(element: &Element) -> ControlValue {
    ControlValue::Number(element.transform.rotation.round())
}

fn set_rotation(element: &mut Element, value: &ControlValue) {
    element.set_rotation(value.as_number_or(0.0));
}

fn get_opacity(element: &Element) -> ControlValue {
    ControlValue::Number(element.opacity)
}

fn set_opacity(element: &mut Element, value: &ControlValue) {
    element.set_opacity(value.as_number_or(1.0));
}

// ---------------------------------------------------------------------------
// Text accessors
// ---------------------------------------------------------------------------

fn get_text_content(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_text().map(|t| t.text.clone()).unwrap_or_default())
}

fn set_text_content(element: &mut Element, value: &ControlValue) {
    if let Some(text) = element.as_text_mut() {
        text.set_text(value.as_text());
    }
}

fn get_font_size(element: &Element) -> ControlValue {
    ControlValue::Number(element.as_text().map_or(16.0, |t| t.style.font_size))
}

fn set_font_size(element: &mut Element, value: &ControlValue) {
    if let Some(text) = element.as_text_mut() {
        text.set_font_size(value.as_number_or(16.0));
    }
}

fn get_font_family(element: &Element) -> ControlValue {
    ControlValue::Text(
        element
            .as_text()
            .map_or_else(|| "Arial".to_string(), |t| t.style.font_family.clone()),
    )
}

fn set_font_family(element: &mut Element, value: &ControlValue) {
    if let Some(text) = element.as_text_mut() {
        text.set_font_family(value.as_text());
    }
}

fn get_text_color(element: &Element) -> ControlValue {
    ControlValue::Text(
        element
            .as_text()
            .map_or_else(|| "#000000".to_string(), |t| t.style.fill.clone()),
    )
}

fn set_text_color(element: &mut Element, value: &ControlValue) {
    if let Some(text) = element.as_text_mut() {
        text.set_fill(value.as_text());
    }
}

// ---------------------------------------------------------------------------
// Image accessors
// ---------------------------------------------------------------------------

fn get_image_src(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_image().map(|i| i.src.clone()).unwrap_or_default())
}

fn set_image_src(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.set_src(value.as_text());
    }
}

fn get_image_alt(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_image().map(|i| i.alt.clone()).unwrap_or_default())
}

fn set_image_alt(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.set_alt(value.as_text());
    }
}

fn get_brightness(element: &Element) -> ControlValue {
    ControlValue::Number(
        element
            .as_image()
            .and_then(|i| i.filters.brightness)
            .unwrap_or(0.0),
    )
}

fn set_brightness(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.filters.set_brightness(value.as_number_or(0.0));
    }
}

fn get_contrast(element: &Element) -> ControlValue {
    ControlValue::Number(
        element
            .as_image()
            .and_then(|i| i.filters.contrast)
            .unwrap_or(0.0),
    )
}

fn set_contrast(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.filters.set_contrast(value.as_number_or(0.0));
    }
}

fn get_saturation(element: &Element) -> ControlValue {
    ControlValue::Number(
        element
            .as_image()
            .and_then(|i| i.filters.saturation)
            .unwrap_or(0.0),
    )
}

fn set_saturation(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.filters.set_saturation(value.as_number_or(0.0));
    }
}

fn get_hue(element: &Element) -> ControlValue {
    ControlValue::Number(element.as_image().and_then(|i| i.filters.hue).unwrap_or(0.0))
}

fn set_hue(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.filters.set_hue(value.as_number_or(0.0));
    }
}

fn get_blur(element: &Element) -> ControlValue {
    ControlValue::Number(element.as_image().and_then(|i| i.filters.blur).unwrap_or(0.0))
}

fn set_blur(element: &mut Element, value: &ControlValue) {
    if let Some(image) = element.as_image_mut() {
        image.filters.set_blur(value.as_number_or(0.0));
    }
}

// ---------------------------------------------------------------------------
// Button accessors
// ---------------------------------------------------------------------------

fn get_button_text(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_button().map(|b| b.text.clone()).unwrap_or_default())
}

fn set_button_text(element: &mut Element, value: &ControlValue) {
    if let Some(button) = element.as_button_mut() {
        button.set_text(value.as_text());
    }
}

fn get_button_url(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_button().map(|b| b.url.clone()).unwrap_or_default())
}

fn set_button_url(element: &mut Element, value: &ControlValue) {
    if let Some(button) = element.as_button_mut() {
        button.set_url(value.as_text());
    }
}

fn get_background_color(element: &Element) -> ControlValue {
    ControlValue::Text(element.as_button().map_or_else(
        || "#3498db".to_string(),
        |b| b.style.background_color.clone(),
    ))
}

fn set_background_color(element: &mut Element, value: &ControlValue) {
    if let Some(button) = element.as_button_mut() {
        button.set_background_color(value.as_text());
    }
}

fn get_button_target(element: &Element) -> ControlValue {
    let target = element
        .as_button()
        .map_or(LinkTarget::default(), |b| b.target);
    ControlValue::Text(target.as_str().to_string())
}

/// Unknown keywords leave the current target in place.
fn set_button_target(element: &mut Element, value: &ControlValue) {
    if let Some(button) = element.as_button_mut() {
        if let Some(target) = LinkTarget::parse(&value.as_text()) {
            button.set_target(target);
        }
    }
}

fn get_button_disabled(element: &Element) -> ControlValue {
    ControlValue::Bool(element.as_button().is_some_and(|b| b.disabled))
}

fn set_button_disabled(element: &mut Element, value: &ControlValue) {
    if let Some(button) = element.as_button_mut() {
        button.set_disabled(value.as_bool());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_declared_control() {
        let catalog = ControlCatalog::builtin();
        for element in [
            Element::text("Hi", 0.0, 0.0),
            Element::image("a.png", "", 0.0, 0.0),
            Element::button("Go", 0.0, 0.0),
        ] {
            for id in element.control_ids() {
                assert!(catalog.contains(id), "missing built-in control {id}");
            }
        }
    }

    #[test]
    fn test_register_replaces_in_place() {
        let first = ControlDescriptor::new("a", EditorKind::Input, "A", get_x, set_x);
        let second = ControlDescriptor::new("b", EditorKind::Input, "B", get_y, set_y);
        let replacement = ControlDescriptor::new("a", EditorKind::Slider, "A2", get_x, set_x);
        let catalog = ControlCatalog::builder()
            .register(first)
            .register(second)
            .register(replacement)
            .build();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.get("a").map(|d| d.label), Some("A2"));
    }

    #[test]
    fn test_kind_mismatch_is_inert() {
        let catalog = ControlCatalog::builtin();
        let mut button = Element::button("Go", 0.0, 0.0);
        let before = button.clone();

        let text_color = catalog.get("textColor").expect("textColor");
        assert_eq!((text_color.get)(&button), ControlValue::from("#000000"));
        (text_color.set)(&mut button, &ControlValue::from("#ff0000"));

        let src = catalog.get("imageSrc").expect("imageSrc");
        assert_eq!((src.get)(&button), ControlValue::from(""));
        (src.set)(&mut button, &ControlValue::from("x.png"));

        assert_eq!(button, before);
    }

    #[test]
    fn test_position_setter_coerces_bad_input() {
        let catalog = ControlCatalog::builtin();
        let mut element = Element::text("Hi", 30.0, 40.0);
        let x = catalog.get("positionX").expect("positionX");
        (x.set)(&mut element, &ControlValue::from("not a number"));
        assert!(element.transform.x.abs() < f32::EPSILON);
        assert!((element.transform.y - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_transform_controls_disabled_when_locked() {
        let catalog = ControlCatalog::builtin();
        let mut element = Element::text("Hi", 0.0, 0.0);
        let x = catalog.get("positionX").expect("positionX");
        let opacity = catalog.get("opacity").expect("opacity");
        assert!(!x.is_disabled(&element));
        element.set_locked(true);
        assert!(x.is_disabled(&element));
        assert!(!opacity.is_disabled(&element));
    }

    #[test]
    fn test_button_target_select() {
        let catalog = ControlCatalog::builtin();
        let mut element = Element::button("Go", 0.0, 0.0);
        let target = catalog.get("buttonTarget").expect("buttonTarget");
        (target.set)(&mut element, &ControlValue::from("_top"));
        assert_eq!((target.get)(&element), ControlValue::from("_top"));
        (target.set)(&mut element, &ControlValue::from("bogus"));
        assert_eq!((target.get)(&element), ControlValue::from("_top"));
        assert_eq!((target.options.expect("options"))().len(), 4);
    }
}
