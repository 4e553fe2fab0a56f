//! WebAssembly bindings for canvas-doc.
//!
//! Payloads cross the boundary as JSON strings; ids as their UUID strings.

use wasm_bindgen::prelude::*;

use crate::{ControlCatalog, ControlValue, Document, Element, ElementId, ElementPatch};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("canvas-doc {}", crate::VERSION).into());
}

/// Document handle for JavaScript.
#[wasm_bindgen]
pub struct WasmDocument {
    document: Document,
    catalog: ControlCatalog,
}

#[wasm_bindgen]
impl WasmDocument {
    /// Create an empty document with the built-in controls.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            catalog: ControlCatalog::builtin(),
        }
    }

    /// Load a document from its JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is malformed.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmDocument, String> {
        Ok(Self {
            document: Document::from_json(json).map_err(|e| e.to_string())?,
            catalog: ControlCatalog::builtin(),
        })
    }

    /// Add a text element and select it.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self, text: &str, x: f32, y: f32) -> String {
        self.document.create(Element::text(text, x, y)).to_string()
    }

    /// Add an image element and select it.
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, src: &str, alt: &str, x: f32, y: f32) -> String {
        self.document.create(Element::image(src, alt, x, y)).to_string()
    }

    /// Add a button element and select it.
    #[wasm_bindgen(js_name = addButton)]
    pub fn add_button(&mut self, label: &str, x: f32, y: f32) -> String {
        self.document.create(Element::button(label, x, y)).to_string()
    }

    /// Remove an element.
    pub fn remove(&mut self, id: &str) -> bool {
        parse(id).is_some_and(|id| self.document.remove(id))
    }

    /// Duplicate an element, returning the copy's id.
    pub fn duplicate(&mut self, id: &str) -> Option<String> {
        parse(id)
            .and_then(|id| self.document.duplicate(id))
            .map(|id| id.to_string())
    }

    /// Apply a JSON field patch.
    ///
    /// # Errors
    ///
    /// Returns an error string if the patch is malformed.
    pub fn update(&mut self, id: &str, patch_json: &str) -> Result<bool, String> {
        let patch: ElementPatch = serde_json::from_str(patch_json).map_err(|e| e.to_string())?;
        Ok(parse(id).is_some_and(|id| self.document.update(id, patch)))
    }

    /// Select an element.
    pub fn select(&mut self, id: &str, additive: bool) -> bool {
        parse(id).is_some_and(|id| self.document.select(id, additive))
    }

    /// Selected ids as a JS array of strings.
    #[wasm_bindgen(js_name = selectedIds)]
    #[must_use]
    pub fn selected_ids(&self) -> js_sys::Array {
        self.document
            .selected_ids()
            .iter()
            .map(|id| JsValue::from(id.to_string()))
            .collect()
    }

    /// Clear the selection.
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.document.clear_selection();
    }

    /// Bring an element to the front.
    #[wasm_bindgen(js_name = bringToFront)]
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        parse(id).is_some_and(|id| self.document.bring_to_front(id))
    }

    /// Send an element to the back.
    #[wasm_bindgen(js_name = sendToBack)]
    pub fn send_to_back(&mut self, id: &str) -> bool {
        parse(id).is_some_and(|id| self.document.send_to_back(id))
    }

    /// Start inline editing of a text element.
    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, id: &str) -> bool {
        parse(id).is_some_and(|id| self.document.begin_edit(id))
    }

    /// Stop inline editing.
    #[wasm_bindgen(js_name = endEdit)]
    pub fn end_edit(&mut self) {
        self.document.end_edit();
    }

    /// Report that an image finished loading.
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, id: &str, width: u32, height: u32) -> bool {
        parse(id).is_some_and(|id| self.document.image_loaded(id, width, height))
    }

    /// Undo the last change.
    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    /// Whether undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    /// Whether redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    /// Topmost element under a screen point.
    #[wasm_bindgen(js_name = elementAt)]
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<String> {
        self.document.element_at(x, y).map(|id| id.to_string())
    }

    /// The whole document as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        self.document.to_json().unwrap_or_default()
    }

    /// Materialized controls for an element as JSON.
    #[wasm_bindgen(js_name = getControlsJson)]
    #[must_use]
    pub fn get_controls_json(&self, id: &str) -> String {
        let controls = parse(id)
            .map(|id| self.document.controls(&self.catalog, id))
            .unwrap_or_default();
        serde_json::to_string(&controls).unwrap_or_default()
    }

    /// Context menu entries as JSON; pass no id for the canvas menu.
    #[wasm_bindgen(js_name = getContextMenuJson)]
    #[must_use]
    pub fn get_context_menu_json(&self, id: Option<String>) -> String {
        let options = self
            .document
            .context_menu(id.as_deref().and_then(parse));
        serde_json::to_string(&options).unwrap_or_default()
    }

    /// Write a JSON value through one of an element's controls.
    ///
    /// # Errors
    ///
    /// Returns an error string if the value is malformed.
    #[wasm_bindgen(js_name = applyControl)]
    pub fn apply_control(
        &mut self,
        id: &str,
        control_id: &str,
        value_json: &str,
    ) -> Result<bool, String> {
        let value: ControlValue = serde_json::from_str(value_json).map_err(|e| e.to_string())?;
        let Some(id) = parse(id) else {
            return Ok(false);
        };
        let Some(control) = self
            .document
            .controls(&self.catalog, id)
            .into_iter()
            .find(|c| c.id == control_id)
        else {
            return Ok(false);
        };
        Ok(self.document.apply_control(&control, &value))
    }
}

impl Default for WasmDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(id: &str) -> Option<ElementId> {
    ElementId::parse(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_document_add_and_undo() {
        let mut doc = WasmDocument::new();
        let id = doc.add_text("Hi", 0.0, 0.0);
        assert!(doc.can_undo());
        assert!(doc.get_document_json().contains(&id));
        assert!(doc.undo());
        assert!(!doc.get_document_json().contains(&id));
    }

    #[test]
    fn apply_control_parses_json_value() {
        let mut doc = WasmDocument::new();
        let id = doc.add_button("Go", 0.0, 0.0);
        assert_eq!(doc.apply_control(&id, "buttonText", r#""Buy""#), Ok(true));
        assert!(doc.get_document_json().contains("Buy"));
        assert_eq!(doc.apply_control(&id, "fontSize", "12"), Ok(false));
        assert!(doc.apply_control(&id, "buttonText", "{bad").is_err());
    }

    #[test]
    fn malformed_ids_are_ignored() {
        let mut doc = WasmDocument::new();
        assert!(!doc.remove("not-a-uuid"));
        assert!(doc.duplicate("not-a-uuid").is_none());
        assert_eq!(doc.get_controls_json("not-a-uuid"), "[]");
    }
}
