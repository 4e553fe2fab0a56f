//! Plain structural records for handing a document to a persistence layer.
//!
//! The crate never writes these anywhere itself; it only converts between the
//! runtime model and these serde-friendly shapes.

use serde::{Deserialize, Serialize};

use crate::config::CanvasSettings;
use crate::element::{Element, ElementContent, ElementId, Transform};
use crate::error::{DocumentError, DocumentResult};

/// Document-friendly element description.
///
/// Serializes as `{id, kind, transform, z_index, visible, locked, opacity,
/// <variant fields>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Element identifier.
    pub id: String,
    /// Transform metadata.
    #[serde(default)]
    pub transform: Transform,
    /// Paint order.
    #[serde(default)]
    pub z_index: i32,
    /// Visibility flag.
    #[serde(default = "ElementDocument::default_true")]
    pub visible: bool,
    /// Lock flag.
    #[serde(default)]
    pub locked: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "ElementDocument::default_opacity")]
    pub opacity: f32,
    /// Kind tag plus variant fields.
    #[serde(flatten)]
    pub content: ElementContent,
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            transform: element.transform,
            z_index: element.z_index,
            visible: element.visible,
            locked: element.locked,
            opacity: element.opacity,
            content: element.content.clone(),
        }
    }
}

impl ElementDocument {
    const fn default_true() -> bool {
        true
    }

    const fn default_opacity() -> f32 {
        1.0
    }

    /// Convert document to runtime element.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidId`] if the id is not a valid UUID.
    pub fn into_element(self) -> DocumentResult<Element> {
        let id = ElementId::parse(&self.id).map_err(|_| DocumentError::InvalidId(self.id))?;
        let raw = self.transform;
        let mut transform = Transform::new(raw.x, raw.y, raw.width, raw.height);
        transform.set_rotation(raw.rotation);
        transform.set_scale(raw.scale_x, raw.scale_y);
        let mut element = Element::new(self.content, transform);
        element.id = id;
        element.z_index = self.z_index;
        element.visible = self.visible;
        element.locked = self.locked;
        element.set_opacity(self.opacity);
        Ok(element)
    }
}

/// Whole-canvas record: settings plus every element in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Canvas and viewport settings.
    #[serde(default)]
    pub settings: CanvasSettings,
    /// Elements sorted by z-index.
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

impl CanvasDocument {
    /// Build a document from settings and elements, sorting by z-index.
    #[must_use]
    pub fn new<'a>(
        settings: CanvasSettings,
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> Self {
        let mut elements: Vec<_> = elements.into_iter().map(ElementDocument::from).collect();
        elements.sort_by_key(|doc| doc.z_index);
        Self { settings, elements }
    }

    /// Materialize every element.
    ///
    /// # Errors
    ///
    /// Returns the first element conversion error.
    pub fn into_elements(self) -> DocumentResult<(CanvasSettings, Vec<Element>)> {
        let elements = self
            .elements
            .into_iter()
            .map(ElementDocument::into_element)
            .collect::<DocumentResult<Vec<_>>>()?;
        Ok((self.settings, elements))
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_document_shape() {
        let mut element = Element::button("Go", 10.0, 20.0);
        element.z_index = 3;
        let json = serde_json::to_value(element.serialize()).expect("serialize");

        assert_eq!(json["id"], element.id.to_string());
        assert_eq!(json["kind"], "button");
        assert_eq!(json["z_index"], 3);
        assert_eq!(json["visible"], true);
        assert_eq!(json["locked"], false);
        assert_eq!(json["text"], "Go");
        assert!(json["transform"].is_object());
        assert!(json["style"].is_object());
    }

    #[test]
    fn test_into_element_restores_header() {
        let mut element = Element::image("a.png", "logo", 1.0, 2.0);
        element.z_index = -4;
        element.set_locked(true);
        element.set_opacity(0.25);

        let restored = element.serialize().into_element().expect("valid");
        assert_eq!(restored, element);
    }

    #[test]
    fn test_into_element_rejects_bad_id() {
        let mut doc = Element::text("Hi", 0.0, 0.0).serialize();
        doc.id = "nope".to_string();
        assert!(matches!(
            doc.into_element(),
            Err(DocumentError::InvalidId(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_canvas_document_sorts_by_z() {
        let mut low = Element::text("low", 0.0, 0.0);
        low.z_index = 1;
        let mut high = Element::text("high", 0.0, 0.0);
        high.z_index = 9;
        let doc = CanvasDocument::new(CanvasSettings::default(), [&high, &low]);
        assert_eq!(doc.elements[0].id, low.id.to_string());

        let parsed = CanvasDocument::from_json(&doc.to_json().expect("json")).expect("parse");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_missing_header_fields_default() {
        let json = format!(
            r#"{{"id": "{}", "kind": "text", "text": "Hi", "style": {{}}}}"#,
            ElementId::new()
        );
        let doc: ElementDocument = serde_json::from_str(&json).expect("parse");
        assert!(doc.visible);
        assert!((doc.opacity - 1.0).abs() < f32::EPSILON);
        assert_eq!(doc.transform, Transform::default());
    }

    #[test]
    fn test_into_element_clamps_transform() {
        let mut doc = Element::text("Hi", 0.0, 0.0).serialize();
        doc.transform.width = 0.0;
        doc.transform.height = -12.0;
        doc.transform.rotation = f32::NAN;
        let element = doc.into_element().expect("valid id");
        assert!(element.transform.width >= 1.0);
        assert!(element.transform.height >= 1.0);
        assert!(element.transform.rotation.abs() < f32::EPSILON);
    }
}
