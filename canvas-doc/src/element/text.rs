//! Text element payload.

use serde::{Deserialize, Serialize};

use super::menu::ContextMenuOption;
use super::finite_or;

/// Smallest font size a text or button style accepts.
pub const MIN_FONT_SIZE: f32 = 8.0;

const MIN_LINE_HEIGHT: f32 = 0.5;
const DEFAULT_FONT_SIZE: f32 = 18.0;
const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

pub(super) const CONTROL_IDS: &[&str] = &[
    "positionX",
    "positionY",
    "width",
    "height",
    "rotation",
    "opacity",
    "textContent",
    "fontSize",
    "fontFamily",
    "textColor",
];

/// Font slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

/// CSS-style font weight.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "100")]
    W100,
    #[serde(rename = "200")]
    W200,
    #[serde(rename = "300")]
    W300,
    #[serde(rename = "400")]
    W400,
    #[serde(rename = "500")]
    W500,
    #[serde(rename = "600")]
    W600,
    #[serde(rename = "700")]
    W700,
    #[serde(rename = "800")]
    W800,
    #[serde(rename = "900")]
    W900,
}

/// Horizontal text alignment.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Text decoration line.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Outline drawn around glyphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke color.
    pub color: String,
    /// Stroke width, never negative.
    pub width: f32,
}

/// Visual style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in pixels, at least [`MIN_FONT_SIZE`].
    pub font_size: f32,
    /// CSS font family list.
    pub font_family: String,
    /// Slant.
    pub font_style: FontStyle,
    /// Weight.
    pub font_weight: FontWeight,
    /// Fill color.
    pub fill: String,
    /// Optional outline.
    pub stroke: Option<Stroke>,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub vertical_align: VerticalAlign,
    /// Decoration line.
    pub decoration: TextDecoration,
    /// Line height multiplier, at least 0.5.
    pub line_height: f32,
    /// Extra spacing between glyphs.
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Normal,
            fill: "#000000".to_string(),
            stroke: None,
            align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            decoration: TextDecoration::None,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

/// Text content, style and edit flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// Displayed string.
    pub text: String,
    /// Visual style.
    #[serde(default)]
    pub style: TextStyle,
    /// Whether the text is currently being edited inline.
    #[serde(default)]
    pub is_editing: bool,
}

impl Default for TextData {
    fn default() -> Self {
        Self::new("New Text")
    }
}

impl TextData {
    /// Create text with the default style.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            is_editing: false,
        }
    }

    /// Replace the displayed string.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Set the font size, floored at [`MIN_FONT_SIZE`].
    pub fn set_font_size(&mut self, size: f32) {
        self.style.font_size = finite_or(size, DEFAULT_FONT_SIZE).max(MIN_FONT_SIZE);
    }

    /// Set the font family.
    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.style.font_family = family.into();
    }

    /// Set the slant.
    pub fn set_font_style(&mut self, style: FontStyle) {
        self.style.font_style = style;
    }

    /// Set the weight.
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.style.font_weight = weight;
    }

    /// Set the fill color.
    pub fn set_fill(&mut self, fill: impl Into<String>) {
        self.style.fill = fill.into();
    }

    /// Add or replace the outline. Negative widths clamp to zero.
    pub fn set_stroke(&mut self, color: impl Into<String>, width: f32) {
        self.style.stroke = Some(Stroke {
            color: color.into(),
            width: finite_or(width, 1.0).max(0.0),
        });
    }

    /// Remove the outline.
    pub fn clear_stroke(&mut self) {
        self.style.stroke = None;
    }

    /// Set horizontal alignment.
    pub fn set_align(&mut self, align: TextAlign) {
        self.style.align = align;
    }

    /// Set vertical alignment.
    pub fn set_vertical_align(&mut self, align: VerticalAlign) {
        self.style.vertical_align = align;
    }

    /// Set the decoration line.
    pub fn set_decoration(&mut self, decoration: TextDecoration) {
        self.style.decoration = decoration;
    }

    /// Set the line height multiplier, floored at 0.5.
    pub fn set_line_height(&mut self, line_height: f32) {
        self.style.line_height = finite_or(line_height, 1.2).max(MIN_LINE_HEIGHT);
    }

    /// Set letter spacing.
    pub fn set_letter_spacing(&mut self, spacing: f32) {
        self.style.letter_spacing = finite_or(spacing, 0.0);
    }

    /// Enter inline editing.
    pub fn start_editing(&mut self) {
        self.is_editing = true;
    }

    /// Leave inline editing.
    pub fn stop_editing(&mut self) {
        self.is_editing = false;
    }
}

pub(super) fn context_menu_options() -> Vec<ContextMenuOption> {
    vec![
        ContextMenuOption::item("Edit Text", "edit-text", "✏️"),
        ContextMenuOption::item("Duplicate", "duplicate", "📋"),
        ContextMenuOption::item("Delete", "delete", "🗑️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Bring to Front", "bring-to-front", "⬆️"),
        ContextMenuOption::item("Send to Back", "send-to-back", "⬇️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Lock Element", "lock", "🔒"),
        ContextMenuOption::item("Copy Style", "copy-style", "🎨"),
        ContextMenuOption::item("Paste Style", "paste-style", "🖌️"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_floor() {
        let mut text = TextData::new("Hi");
        text.set_font_size(4.0);
        assert!((text.style.font_size - MIN_FONT_SIZE).abs() < f32::EPSILON);
        text.set_font_size(32.0);
        assert!((text.style.font_size - 32.0).abs() < f32::EPSILON);
        text.set_font_size(f32::NAN);
        assert!((text.style.font_size - DEFAULT_FONT_SIZE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_line_height_and_stroke_clamps() {
        let mut text = TextData::default();
        text.set_line_height(0.1);
        assert!((text.style.line_height - 0.5).abs() < f32::EPSILON);

        text.set_stroke("#ff0000", -3.0);
        let stroke = text.style.stroke.as_ref().expect("stroke set");
        assert!(stroke.width.abs() < f32::EPSILON);
        text.clear_stroke();
        assert!(text.style.stroke.is_none());
    }

    #[test]
    fn test_edit_flag() {
        let mut text = TextData::default();
        assert_eq!(text.text, "New Text");
        text.start_editing();
        assert!(text.is_editing);
        text.stop_editing();
        assert!(!text.is_editing);
    }

    #[test]
    fn test_style_serializes_enums_as_css_keywords() {
        let mut style = TextStyle::default();
        style.font_weight = FontWeight::W600;
        style.decoration = TextDecoration::LineThrough;
        let json = serde_json::to_value(&style).expect("serialize");
        assert_eq!(json["font_weight"], "600");
        assert_eq!(json["decoration"], "line-through");
        assert_eq!(json["vertical_align"], "top");
    }

    #[test]
    fn test_menu_starts_with_edit() {
        let menu = context_menu_options();
        assert_eq!(menu[0].action, "edit-text");
        assert_eq!(menu.iter().filter(|o| o.divider).count(), 2);
    }
}
