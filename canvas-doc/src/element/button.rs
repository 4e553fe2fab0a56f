//! Button element payload.

use serde::{Deserialize, Serialize};

use super::finite_or;
use super::menu::ContextMenuOption;
use super::text::{FontWeight, MIN_FONT_SIZE};
use crate::control::{ControlConfig, ControlOverride, ControlOverrides};

pub(super) const CONTROL_IDS: &[&str] = &[
    "positionX",
    "positionY",
    "rotation",
    "opacity",
    "buttonText",
    "buttonUrl",
    "backgroundColor",
    "buttonTarget",
    "buttonDisabled",
];

/// Browsing context a button link opens in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// New tab or window.
    #[default]
    #[serde(rename = "_blank")]
    Blank,
    /// Same frame.
    #[serde(rename = "_self")]
    SelfFrame,
    /// Parent frame.
    #[serde(rename = "_parent")]
    Parent,
    /// Top-level frame.
    #[serde(rename = "_top")]
    Top,
}

impl LinkTarget {
    /// Every target, in menu order.
    pub const ALL: [Self; 4] = [Self::Blank, Self::SelfFrame, Self::Parent, Self::Top];

    /// HTML keyword for this target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "_blank",
            Self::SelfFrame => "_self",
            Self::Parent => "_parent",
            Self::Top => "_top",
        }
    }

    /// Parse an HTML target keyword.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == keyword)
    }
}

/// Inner spacing between the border and the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 8.0,
            right: 16.0,
            bottom: 8.0,
            left: 16.0,
        }
    }
}

/// Drop shadow under the button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Horizontal offset.
    pub offset_x: f32,
    /// Vertical offset.
    pub offset_y: f32,
    /// Blur radius, never negative.
    pub blur: f32,
    /// Shadow color.
    pub color: String,
}

/// Resting appearance of a button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyle {
    /// Fill color.
    pub background_color: String,
    /// Border color.
    pub border_color: String,
    /// Border width, never negative.
    pub border_width: f32,
    /// Corner radius, never negative.
    pub border_radius: f32,
    /// Label color.
    pub text_color: String,
    /// Label size, at least 8.
    pub font_size: f32,
    /// Label font family.
    pub font_family: String,
    /// Label weight.
    pub font_weight: FontWeight,
    /// Inner padding.
    pub padding: Padding,
    /// Optional drop shadow.
    pub shadow: Option<Shadow>,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background_color: "#007bff".to_string(),
            border_color: "#007bff".to_string(),
            border_width: 1.0,
            border_radius: 4.0,
            text_color: "#ffffff".to_string(),
            font_size: 16.0,
            font_family: "Arial, sans-serif".to_string(),
            font_weight: FontWeight::Normal,
            padding: Padding::default(),
            shadow: Some(Shadow {
                offset_x: 0.0,
                offset_y: 2.0,
                blur: 4.0,
                color: "rgba(0, 0, 0, 0.1)".to_string(),
            }),
        }
    }
}

/// Partial style applied on top of [`ButtonStyle`] in an interaction state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ButtonStyleOverlay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl ButtonStyleOverlay {
    /// Overlay that only changes the background color.
    #[must_use]
    pub fn background(color: &str) -> Self {
        Self {
            background_color: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// Merge `other` into `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            background_color,
            border_color,
            border_width,
            border_radius,
            text_color,
            font_size,
            font_family,
            font_weight,
            padding,
            shadow
        );
    }

    /// Resolve this overlay against a base style.
    #[must_use]
    pub fn apply_to(&self, base: &ButtonStyle) -> ButtonStyle {
        let mut style = base.clone();
        macro_rules! put {
            ($($field:ident),*) => {
                $(if let Some(value) = &self.$field { style.$field = value.clone(); })*
            };
        }
        put!(
            background_color,
            border_color,
            border_width,
            border_radius,
            text_color,
            font_size,
            font_family,
            font_weight,
            padding
        );
        if let Some(shadow) = &self.shadow {
            style.shadow = Some(shadow.clone());
        }
        style
    }
}

/// Pointer interaction state a button is drawn in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    /// No pointer interaction.
    #[default]
    Rest,
    /// Pointer over the button.
    Hover,
    /// Button pressed.
    Active,
}

/// Button label, link, behaviour and styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonData {
    /// Label text.
    pub text: String,
    /// Link target URI; may be empty.
    pub url: String,
    /// Where the link opens.
    #[serde(default)]
    pub target: LinkTarget,
    /// Whether the button ignores clicks.
    #[serde(default)]
    pub disabled: bool,
    /// Opaque script handle. Stored, never executed.
    #[serde(default)]
    pub on_click: String,
    /// Resting style.
    #[serde(default)]
    pub style: ButtonStyle,
    /// Overlay while hovered.
    #[serde(default)]
    pub hover_style: ButtonStyleOverlay,
    /// Overlay while pressed.
    #[serde(default)]
    pub active_style: ButtonStyleOverlay,
}

impl Default for ButtonData {
    fn default() -> Self {
        Self::new("Click Me")
    }
}

impl ButtonData {
    /// Create a button with the default blue style.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: String::new(),
            target: LinkTarget::Blank,
            disabled: false,
            on_click: String::new(),
            style: ButtonStyle::default(),
            hover_style: ButtonStyleOverlay::background("#0056b3"),
            active_style: ButtonStyleOverlay::background("#004494"),
        }
    }

    /// Set the label.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Set the link URI.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Set the link target.
    pub fn set_target(&mut self, target: LinkTarget) {
        self.target = target;
    }

    /// Store a script handle.
    pub fn set_on_click(&mut self, script: impl Into<String>) {
        self.on_click = script.into();
    }

    /// Enable or disable the button.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Set the fill color.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.style.background_color = color.into();
    }

    /// Set the border color.
    pub fn set_border_color(&mut self, color: impl Into<String>) {
        self.style.border_color = color.into();
    }

    /// Set border width, clamped to be non-negative.
    pub fn set_border_width(&mut self, width: f32) {
        self.style.border_width = finite_or(width, 0.0).max(0.0);
    }

    /// Set corner radius, clamped to be non-negative.
    pub fn set_border_radius(&mut self, radius: f32) {
        self.style.border_radius = finite_or(radius, 0.0).max(0.0);
    }

    /// Set the label color.
    pub fn set_text_color(&mut self, color: impl Into<String>) {
        self.style.text_color = color.into();
    }

    /// Set the label size, floored at 8.
    pub fn set_font_size(&mut self, size: f32) {
        self.style.font_size = finite_or(size, 16.0).max(MIN_FONT_SIZE);
    }

    /// Set the label font family.
    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.style.font_family = family.into();
    }

    /// Set the label weight.
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.style.font_weight = weight;
    }

    /// Set padding; each side is clamped to be non-negative.
    pub fn set_padding(&mut self, top: f32, right: f32, bottom: f32, left: f32) {
        let side = |v: f32| finite_or(v, 0.0).max(0.0);
        self.style.padding = Padding {
            top: side(top),
            right: side(right),
            bottom: side(bottom),
            left: side(left),
        };
    }

    /// Set the drop shadow. Negative blur clamps to zero.
    pub fn set_shadow(&mut self, offset_x: f32, offset_y: f32, blur: f32, color: impl Into<String>) {
        self.style.shadow = Some(Shadow {
            offset_x: finite_or(offset_x, 0.0),
            offset_y: finite_or(offset_y, 0.0),
            blur: finite_or(blur, 0.0).max(0.0),
            color: color.into(),
        });
    }

    /// Remove the drop shadow.
    pub fn remove_shadow(&mut self) {
        self.style.shadow = None;
    }

    /// Merge fields into the hover overlay.
    pub fn set_hover_style(&mut self, overlay: ButtonStyleOverlay) {
        self.hover_style.merge(overlay);
    }

    /// Merge fields into the active overlay.
    pub fn set_active_style(&mut self, overlay: ButtonStyleOverlay) {
        self.active_style.merge(overlay);
    }

    /// Full style to draw with in the given interaction state.
    #[must_use]
    pub fn effective_style(&self, state: InteractionState) -> ButtonStyle {
        match state {
            InteractionState::Rest => self.style.clone(),
            InteractionState::Hover => self.hover_style.apply_to(&self.style),
            InteractionState::Active => self.active_style.apply_to(&self.style),
        }
    }
}

pub(super) fn context_menu_options() -> Vec<ContextMenuOption> {
    vec![
        ContextMenuOption::item("Edit Text", "edit-button-text", "✏️"),
        ContextMenuOption::item("Edit Action", "edit-button-action", "⚡"),
        ContextMenuOption::item("Duplicate", "duplicate", "📋"),
        ContextMenuOption::item("Delete", "delete", "🗑️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Change Style", "change-button-style", "🎨"),
        ContextMenuOption::item("Reset to Default", "reset-button-style", "🔄"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Bring to Front", "bring-to-front", "⬆️"),
        ContextMenuOption::item("Send to Back", "send-to-back", "⬇️"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Lock Element", "lock", "🔒"),
        ContextMenuOption::item("Test Button", "test-button", "🧪"),
    ]
}

/// Minimum button dimensions. Neither id is in the button control list, so
/// these only take effect if a caller resolves size controls explicitly.
pub(super) fn control_overrides() -> ControlOverrides {
    ControlOverrides::from([
        ("width", ControlOverride::default().with_config(min_width)),
        ("height", ControlOverride::default().with_config(min_height)),
    ])
}

fn min_width() -> ControlConfig {
    ControlConfig::number().min(80.0).step(1.0)
}

fn min_height() -> ControlConfig {
    ControlConfig::number().min(32.0).step(1.0)
}
