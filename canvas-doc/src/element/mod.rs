//! Canvas elements - the objects placed on the design surface.
//!
//! Every element shares a common header (identity, transform, z-index,
//! visibility, lock, opacity) and carries one of three content payloads.
//! Kind-specific behaviour is dispatched by matching on [`ElementContent`]:
//!
//! | capability               | free function               | method                         |
//! |--------------------------|-----------------------------|--------------------------------|
//! | context menu             | [`context_menu_options`]    | [`Element::context_menu_options`] |
//! | clone with new identity  | [`duplicate`]               | [`Element::duplicate`]         |
//! | structural record        | -                           | [`Element::serialize`]         |
//! | control list             | [`control_ids`]             | [`Element::control_ids`]       |
//! | control overrides        | [`control_overrides`]       | [`Element::control_overrides`] |

mod button;
mod image;
mod menu;
mod text;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::control::ControlOverrides;
use crate::schema::ElementDocument;

pub use button::{
    ButtonData, ButtonStyle, ButtonStyleOverlay, InteractionState, LinkTarget, Padding, Shadow,
};
pub use image::{CropRect, ImageData, ImageFilters, LoadState};
pub use menu::{canvas_menu_options, ContextMenuOption};
pub use text::{
    FontStyle, FontWeight, Stroke, TextAlign, TextData, TextDecoration, TextStyle, VerticalAlign,
};

/// Smallest width or height an element may have.
pub const MIN_EXTENT: f32 = 1.0;

/// Positional offset applied to a duplicated element.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant of an element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Styled text block.
    Text,
    /// Raster or vector image.
    Image,
    /// Interactive link button.
    Button,
}

impl ElementKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box after scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Scaled width.
    pub width: f32,
    /// Scaled height.
    pub height: f32,
}

/// Transform for positioning and sizing elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels, never below [`MIN_EXTENT`] through the setters.
    pub width: f32,
    /// Height in pixels, never below [`MIN_EXTENT`] through the setters.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    /// Create an unrotated, unscaled transform.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut transform = Self::default();
        transform.set_position(x, y);
        transform.set_size(width, height);
        transform
    }

    /// Move the top-left corner.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = finite_or(x, 0.0);
        self.y = finite_or(y, 0.0);
    }

    /// Resize, clamping both extents to at least [`MIN_EXTENT`].
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Set the width, clamped to at least [`MIN_EXTENT`].
    pub fn set_width(&mut self, width: f32) {
        self.width = clamp_extent(width);
    }

    /// Set the height, clamped to at least [`MIN_EXTENT`].
    pub fn set_height(&mut self, height: f32) {
        self.height = clamp_extent(height);
    }

    /// Set the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = finite_or(degrees, 0.0);
    }

    /// Set independent scale factors.
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = finite_or(scale_x, 1.0);
        self.scale_y = finite_or(scale_y, 1.0);
    }

    /// Bounding box with scale applied (rotation ignored).
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width * self.scale_x,
            height: self.height * self.scale_y,
        }
    }
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementContent {
    /// Text block.
    Text(TextData),
    /// Image.
    Image(ImageData),
    /// Button.
    Button(ButtonData),
}

impl ElementContent {
    /// The kind tag of this payload.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Text(_) => ElementKind::Text,
            Self::Image(_) => ElementKind::Image,
            Self::Button(_) => ElementKind::Button,
        }
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Unique identifier, fixed at creation.
    pub id: ElementId,
    /// Position, size, rotation and scale.
    pub transform: Transform,
    /// Paint and hit-test order; higher is on top.
    pub z_index: i32,
    /// Whether the element is shown and hit-testable.
    pub visible: bool,
    /// Whether the element is protected from interactive edits.
    pub locked: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Kind-specific payload.
    pub content: ElementContent,
}

impl Element {
    /// Create a new element with the given content and transform.
    #[must_use]
    pub fn new(content: ElementContent, transform: Transform) -> Self {
        Self {
            id: ElementId::new(),
            transform,
            z_index: 0,
            visible: true,
            locked: false,
            opacity: 1.0,
            content,
        }
    }

    /// Create a 200x50 text element at the given position.
    #[must_use]
    pub fn text(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self::new(
            ElementContent::Text(TextData::new(text)),
            Transform::new(x, y, 200.0, 50.0),
        )
    }

    /// Create a 200x200 image element at the given position.
    #[must_use]
    pub fn image(src: impl Into<String>, alt: impl Into<String>, x: f32, y: f32) -> Self {
        Self::new(
            ElementContent::Image(ImageData::new(src, alt)),
            Transform::new(x, y, 200.0, 200.0),
        )
    }

    /// Create a 120x40 button element at the given position.
    #[must_use]
    pub fn button(label: impl Into<String>, x: f32, y: f32) -> Self {
        Self::new(
            ElementContent::Button(ButtonData::new(label)),
            Transform::new(x, y, 120.0, 40.0),
        )
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the size, clamped.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.set_size(width, height);
        self
    }

    /// The kind of this element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Move the element.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.set_position(x, y);
    }

    /// Resize the element, clamping to [`MIN_EXTENT`].
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.transform.set_size(width, height);
    }

    /// Rotate the element (degrees).
    pub fn set_rotation(&mut self, degrees: f32) {
        self.transform.set_rotation(degrees);
    }

    /// Scale the element.
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.transform.set_scale(scale_x, scale_y);
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_unit(opacity);
    }

    /// Set the z-index.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Show or hide the element.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Lock or unlock the element.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Scaled bounding box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.transform.bounds()
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let b = self.bounds();
        x >= b.x && x <= b.x + b.width && y >= b.y && y <= b.y + b.height
    }

    /// Text payload, if this is a text element.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextData> {
        match &self.content {
            ElementContent::Text(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable text payload, if this is a text element.
    pub fn as_text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.content {
            ElementContent::Text(data) => Some(data),
            _ => None,
        }
    }

    /// Image payload, if this is an image element.
    #[must_use]
    pub fn as_image(&self) -> Option<&ImageData> {
        match &self.content {
            ElementContent::Image(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable image payload, if this is an image element.
    pub fn as_image_mut(&mut self) -> Option<&mut ImageData> {
        match &mut self.content {
            ElementContent::Image(data) => Some(data),
            _ => None,
        }
    }

    /// Button payload, if this is a button element.
    #[must_use]
    pub fn as_button(&self) -> Option<&ButtonData> {
        match &self.content {
            ElementContent::Button(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable button payload, if this is a button element.
    pub fn as_button_mut(&mut self) -> Option<&mut ButtonData> {
        match &mut self.content {
            ElementContent::Button(data) => Some(data),
            _ => None,
        }
    }

    /// Font family this element renders with, if any.
    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text(data) => Some(&data.style.font_family),
            ElementContent::Button(data) => Some(&data.style.font_family),
            ElementContent::Image(_) => None,
        }
    }

    /// Context menu entries for this element.
    #[must_use]
    pub fn context_menu_options(&self) -> Vec<ContextMenuOption> {
        context_menu_options(self)
    }

    /// Copy with a fresh identity, offset by [`DUPLICATE_OFFSET`].
    #[must_use]
    pub fn duplicate(&self) -> Self {
        duplicate(self)
    }

    /// Plain structural record of this element.
    #[must_use]
    pub fn serialize(&self) -> ElementDocument {
        ElementDocument::from(self)
    }

    /// Ordered ids of the controls relevant to this element.
    #[must_use]
    pub fn control_ids(&self) -> &'static [&'static str] {
        control_ids(self)
    }

    /// Per-element control overrides.
    #[must_use]
    pub fn control_overrides(&self) -> ControlOverrides {
        control_overrides(self)
    }
}

/// Context menu entries for an element, in display order.
#[must_use]
pub fn context_menu_options(element: &Element) -> Vec<ContextMenuOption> {
    match element.content {
        ElementContent::Text(_) => text::context_menu_options(),
        ElementContent::Image(_) => image::context_menu_options(),
        ElementContent::Button(_) => button::context_menu_options(),
    }
}

/// Deep copy of an element with a new id, shifted by [`DUPLICATE_OFFSET`].
///
/// Transient state (text editing) is not carried over.
#[must_use]
pub fn duplicate(element: &Element) -> Element {
    let mut copy = element.clone();
    copy.id = ElementId::new();
    copy.transform.x += DUPLICATE_OFFSET;
    copy.transform.y += DUPLICATE_OFFSET;
    if let ElementContent::Text(data) = &mut copy.content {
        data.is_editing = false;
    }
    copy
}

/// Ordered control ids declared by an element's kind.
#[must_use]
pub fn control_ids(element: &Element) -> &'static [&'static str] {
    match element.content {
        ElementContent::Text(_) => text::CONTROL_IDS,
        ElementContent::Image(_) => image::CONTROL_IDS,
        ElementContent::Button(_) => button::CONTROL_IDS,
    }
}

/// Control overrides declared by an element's kind.
#[must_use]
pub fn control_overrides(element: &Element) -> ControlOverrides {
    match element.content {
        ElementContent::Text(_) => ControlOverrides::new(),
        ElementContent::Image(_) => image::control_overrides(),
        ElementContent::Button(_) => button::control_overrides(),
    }
}

pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

pub(crate) fn clamp_extent(value: f32) -> f32 {
    if value.is_nan() {
        MIN_EXTENT
    } else {
        value.max(MIN_EXTENT)
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
