//! Declarative property controls.
//!
//! A [`ControlDescriptor`] describes one editable property: which editor widget
//! shows it, how to read it from an element and how to write it back.
//! Descriptors are plain data built from `fn` pointers, so the catalog can be
//! shared freely and never changes after construction. Element kinds tailor a
//! descriptor through a [`ControlOverride`] rather than by mutating it.
//!
//! ```text
//! element.control_ids() ──► ControlCatalog::resolve ──► materialize ──► UI
//!                               ▲        │
//! element.control_overrides() ──┘        └─ visibility filter
//! ```

mod catalog;
mod resolve;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element::Element;

pub use catalog::{ControlCatalog, ControlCatalogBuilder};
pub use resolve::{materialize, MaterializedControl};

/// Reads the current value of a property.
pub type Getter = fn(&Element) -> ControlValue;

/// Writes a value to a property, coercing and clamping as needed.
pub type Setter = fn(&mut Element, &ControlValue);

/// Produces the choices of a select-style control.
pub type OptionsProvider = fn() -> Vec<ControlOption>;

/// Produces numeric/string editor hints.
pub type ConfigProvider = fn() -> ControlConfig;

/// Element predicate used for visibility and disabled checks.
pub type Predicate = fn(&Element) -> bool;

/// Overrides keyed by control id.
pub type ControlOverrides = HashMap<&'static str, ControlOverride>;

/// Editor widget a control is presented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// Free text or number field.
    Input,
    /// Single-value slider.
    Slider,
    /// Color picker.
    Color,
    /// Choice list.
    Select,
    /// Boolean switch.
    Toggle,
    /// Action button.
    Button,
    /// Two-ended range.
    Range,
}

/// A property value travelling between the UI and an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f32),
    /// String value.
    Text(String),
}

impl ControlValue {
    /// Numeric view of the value.
    ///
    /// Strings are parsed; anything unparsable or non-finite yields `fallback`.
    #[must_use]
    pub fn as_number_or(&self, fallback: f32) -> f32 {
        let parsed = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f32>().ok(),
            Self::Bool(_) => None,
        };
        parsed.filter(|n| n.is_finite()).unwrap_or(fallback)
    }

    /// String view of the value.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Boolean view of the value. Non-empty strings other than `"false"` and
    /// non-zero numbers are true.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.abs() > f32::EPSILON,
            Self::Text(s) => !s.is_empty() && s != "false",
        }
    }
}

impl From<f32> for ControlValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One choice of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOption {
    /// Value written when chosen.
    pub value: ControlValue,
    /// Display label.
    pub label: String,
}

impl ControlOption {
    /// Choice whose value is a string.
    #[must_use]
    pub fn text(value: &str, label: &str) -> Self {
        Self {
            value: ControlValue::Text(value.to_string()),
            label: label.to_string(),
        }
    }
}

/// Editor hints for a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlConfig {
    /// HTML-style input type (`number`, `text`, `url`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<&'static str>,
    /// Lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    /// Upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
    /// Increment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f32>,
    /// Placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl ControlConfig {
    /// Config for a numeric input.
    #[must_use]
    pub fn number() -> Self {
        Self::input("number")
    }

    /// Config for an input of the given type.
    #[must_use]
    pub fn input(input_type: &'static str) -> Self {
        Self {
            input_type: Some(input_type),
            ..Self::default()
        }
    }

    /// Slider bounds.
    #[must_use]
    pub fn slider(min: f32, max: f32, step: f32) -> Self {
        Self::default().min(min).max(max).step(step)
    }

    /// Set the lower bound.
    #[must_use]
    pub fn min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    #[must_use]
    pub fn max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the increment.
    #[must_use]
    pub fn step(mut self, step: f32) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

/// Reusable, stateless definition of one editable property.
#[derive(Clone, Copy)]
pub struct ControlDescriptor {
    /// Catalog key.
    pub id: &'static str,
    /// Editor widget.
    pub kind: EditorKind,
    /// Display label.
    pub label: &'static str,
    /// Optional icon glyph.
    pub icon: Option<&'static str>,
    /// Value reader.
    pub get: Getter,
    /// Value writer.
    pub set: Setter,
    /// Choices for select controls.
    pub options: Option<OptionsProvider>,
    /// Editor hints.
    pub config: Option<ConfigProvider>,
    /// Shown only when this returns true; always shown when absent.
    pub visible: Option<Predicate>,
    /// Greyed out when this returns true; enabled when absent.
    pub disabled: Option<Predicate>,
}

impl ControlDescriptor {
    /// Create a descriptor with no icon, options, config or predicates.
    #[must_use]
    pub fn new(
        id: &'static str,
        kind: EditorKind,
        label: &'static str,
        get: Getter,
        set: Setter,
    ) -> Self {
        Self {
            id,
            kind,
            label,
            icon: None,
            get,
            set,
            options: None,
            config: None,
            visible: None,
            disabled: None,
        }
    }

    /// Set the icon.
    #[must_use]
    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the options provider.
    #[must_use]
    pub fn options(mut self, options: OptionsProvider) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the config provider.
    #[must_use]
    pub fn config(mut self, config: ConfigProvider) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the visibility predicate.
    #[must_use]
    pub fn visible_when(mut self, visible: Predicate) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Set the disabled predicate.
    #[must_use]
    pub fn disabled_when(mut self, disabled: Predicate) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Whether the descriptor applies to `element`.
    #[must_use]
    pub fn is_visible(&self, element: &Element) -> bool {
        self.visible.map_or(true, |visible| visible(element))
    }

    /// Whether the descriptor is disabled for `element`.
    #[must_use]
    pub fn is_disabled(&self, element: &Element) -> bool {
        self.disabled.is_some_and(|disabled| disabled(element))
    }

    /// Copy of this descriptor with `over` applied field by field.
    #[must_use]
    pub fn merged(&self, over: &ControlOverride) -> Self {
        Self {
            id: self.id,
            kind: over.kind.unwrap_or(self.kind),
            label: over.label.unwrap_or(self.label),
            icon: over.icon.or(self.icon),
            get: over.get.unwrap_or(self.get),
            set: over.set.unwrap_or(self.set),
            options: over.options.or(self.options),
            config: over.config.or(self.config),
            visible: over.visible.or(self.visible),
            disabled: over.disabled.or(self.disabled),
        }
    }
}

impl std::fmt::Debug for ControlDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Partial descriptor; every field that is set replaces the base value.
#[derive(Clone, Copy, Default)]
pub struct ControlOverride {
    /// Replacement editor widget.
    pub kind: Option<EditorKind>,
    /// Replacement label.
    pub label: Option<&'static str>,
    /// Replacement icon.
    pub icon: Option<&'static str>,
    /// Replacement reader.
    pub get: Option<Getter>,
    /// Replacement writer.
    pub set: Option<Setter>,
    /// Replacement options provider.
    pub options: Option<OptionsProvider>,
    /// Replacement config provider.
    pub config: Option<ConfigProvider>,
    /// Replacement visibility predicate.
    pub visible: Option<Predicate>,
    /// Replacement disabled predicate.
    pub disabled: Option<Predicate>,
}

impl ControlOverride {
    /// Override the label.
    #[must_use]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Override the reader.
    #[must_use]
    pub fn with_getter(mut self, get: Getter) -> Self {
        self.get = Some(get);
        self
    }

    /// Override the writer.
    #[must_use]
    pub fn with_setter(mut self, set: Setter) -> Self {
        self.set = Some(set);
        self
    }

    /// Override the config provider.
    #[must_use]
    pub fn with_config(mut self, config: ConfigProvider) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the visibility predicate.
    #[must_use]
    pub fn with_visibility(mut self, visible: Predicate) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Override the disabled predicate.
    #[must_use]
    pub fn with_disabled(mut self, disabled: Predicate) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

impl std::fmt::Debug for ControlOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlOverride")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("config", &self.config.is_some())
            .finish_non_exhaustive()
    }
}
