//! The document store: elements, selection, z-order, inline text editing and
//! undo/redo.
//!
//! Every operation on a missing id is a no-op that reports `false`, `None` or
//! `0`. Structural edits (add, remove) also tell the attached
//! [`AssetCache`] which assets are still referenced.
//!
//! After any public call the snapshot under the history cursor matches the
//! live elements and selection, so [`Document::undo`] always returns to the
//! state the user last saw before the undone edit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::assets::AssetCache;
use crate::config::{CanvasSettings, DocumentConfig};
use crate::control::{ControlCatalog, ControlValue, MaterializedControl};
use crate::element::{
    canvas_menu_options, ContextMenuOption, Element, ElementContent, ElementId, ElementKind,
    Position, Transform,
};
use crate::error::DocumentResult;
use crate::history::History;
use crate::schema::CanvasDocument;
use crate::template::ServiceRegistry;

/// Inline text editing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    /// No element is being edited.
    #[default]
    Idle,
    /// The given text element is being edited.
    Editing(ElementId),
}

/// Shallow field patch for [`Document::update`].
///
/// Values are written as given, without clamping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// Replacement transform.
    pub transform: Option<Transform>,
    /// Replacement z-index.
    pub z_index: Option<i32>,
    /// Replacement visibility.
    pub visible: Option<bool>,
    /// Replacement lock flag.
    pub locked: Option<bool>,
    /// Replacement opacity.
    pub opacity: Option<f32>,
    /// Replacement payload.
    pub content: Option<ElementContent>,
}

impl ElementPatch {
    fn apply_to(self, element: &mut Element) {
        if let Some(transform) = self.transform {
            element.transform = transform;
        }
        if let Some(z_index) = self.z_index {
            element.z_index = z_index;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(opacity) = self.opacity {
            element.opacity = opacity;
        }
        if let Some(content) = self.content {
            element.content = content;
        }
    }
}

/// Assets referenced by live elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRefs {
    /// Ids of image elements; an image asset is cached under its element's id.
    pub images: HashSet<String>,
    /// Font families used by text and button elements.
    pub fonts: HashSet<String>,
}

/// An editable canvas document.
pub struct Document {
    elements: Vec<Element>,
    selection: HashSet<ElementId>,
    edit: EditState,
    clipboard: Vec<Element>,
    history: History,
    settings: CanvasSettings,
    assets: Option<Box<dyn AssetCache>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements.len())
            .field("selection", &self.selection)
            .field("edit", &self.edit)
            .field("history", &self.history.len())
            .field("asset_cache", &self.assets.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create an empty document.
    ///
    /// The empty state is recorded as the first history snapshot.
    #[must_use]
    pub fn with_config(config: DocumentConfig) -> Self {
        let mut document = Self {
            elements: Vec::new(),
            selection: HashSet::new(),
            edit: EditState::Idle,
            clipboard: Vec::new(),
            history: History::new(config.history_limit),
            settings: config.canvas,
            assets: None,
        };
        document.record_history();
        document
    }

    /// Attach the cache that receives eviction requests.
    #[must_use]
    pub fn with_asset_cache(mut self, cache: Box<dyn AssetCache>) -> Self {
        self.assets = Some(cache);
        self
    }

    /// Rebuild a document from its structural record.
    ///
    /// The loaded state becomes the first history snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any element id is invalid.
    pub fn from_document(document: CanvasDocument, config: DocumentConfig) -> DocumentResult<Self> {
        let (settings, elements) = document.into_elements()?;
        let mut loaded = Self::with_config(DocumentConfig {
            canvas: settings,
            ..config
        });
        loaded.history.clear();
        for element in elements {
            loaded.insert_raw(element);
        }
        loaded.record_history();
        Ok(loaded)
    }

    /// Structural record of the whole document, sorted by z-index.
    #[must_use]
    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::new(self.settings.clone(), &self.elements)
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DocumentResult<String> {
        self.to_document().to_json()
    }

    /// Parse a document from JSON using default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an element id is invalid.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Self::from_document(CanvasDocument::from_json(json)?, DocumentConfig::default())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    ///
    /// Changes made through this reference are not recorded; follow up with
    /// [`Document::record_history`] if they should be undoable.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Whether an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements in paint order (lowest z-index first).
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<&Element> {
        let mut sorted: Vec<_> = self.elements.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Topmost visible element under a screen point.
    ///
    /// The point is mapped through the canvas pan and zoom first.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        let (canvas_x, canvas_y) = self.settings.screen_to_canvas(x, y);
        self.elements
            .iter()
            .filter(|e| e.visible && e.contains_point(canvas_x, canvas_y))
            .max_by_key(|e| e.z_index)
            .map(|e| e.id)
    }

    /// Context menu for an element, or for the empty canvas when `id` is `None`.
    ///
    /// An unknown id yields no entries.
    #[must_use]
    pub fn context_menu(&self, id: Option<ElementId>) -> Vec<ContextMenuOption> {
        match id {
            Some(id) => self
                .get(id)
                .map(Element::context_menu_options)
                .unwrap_or_default(),
            None => canvas_menu_options(),
        }
    }

    /// Materialized controls for an element.
    #[must_use]
    pub fn controls(&self, catalog: &ControlCatalog, id: ElementId) -> Vec<MaterializedControl> {
        self.get(id)
            .map(|element| catalog.materialize_all(element))
            .unwrap_or_default()
    }

    /// Image ids and font families referenced by live elements.
    #[must_use]
    pub fn asset_refs(&self) -> AssetRefs {
        let mut refs = AssetRefs::default();
        for element in &self.elements {
            if element.kind() == ElementKind::Image {
                refs.images.insert(element.id.to_string());
            }
            if let Some(family) = element.font_family() {
                refs.fonts.insert(family.to_string());
            }
        }
        refs
    }

    /// Canvas settings.
    #[must_use]
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Mutable canvas settings. Not part of the undo history.
    pub fn settings_mut(&mut self) -> &mut CanvasSettings {
        &mut self.settings
    }

    // ---------------------------------------------------------------------
    // Element management
    // ---------------------------------------------------------------------

    /// Add an element on top of all others and record the change.
    ///
    /// An element whose id is already present is given a fresh id.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = self.insert(element);
        self.collect_assets();
        self.record_history();
        id
    }

    /// Add an element and make it the only selection.
    pub fn create(&mut self, element: Element) -> ElementId {
        let id = self.add(element);
        self.select(id, false);
        id
    }

    /// Instantiate a template, add it and select it.
    ///
    /// # Errors
    ///
    /// Returns an error if the service or template does not exist; the
    /// document is left untouched.
    pub fn create_from_template(
        &mut self,
        registry: &ServiceRegistry,
        service_type: &str,
        template_id: &str,
        position: Option<Position>,
    ) -> DocumentResult<ElementId> {
        let element = registry.instantiate(service_type, template_id, position)?;
        Ok(self.create(element))
    }

    /// Instantiate a service's first template, add it and select it.
    ///
    /// # Errors
    ///
    /// Returns an error if the service does not exist or has no templates.
    pub fn create_default_from_template(
        &mut self,
        registry: &ServiceRegistry,
        service_type: &str,
        position: Option<Position>,
    ) -> DocumentResult<ElementId> {
        let element = registry.instantiate_default(service_type, position)?;
        Ok(self.create(element))
    }

    /// Remove an element. Returns `false` if it does not exist.
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.remove_many(&[id]) == 1
    }

    /// Remove several elements as one undo step. Returns how many were removed.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id));
        let removed = before - self.elements.len();
        if removed == 0 {
            return 0;
        }

        for id in ids {
            self.selection.remove(id);
        }
        if let EditState::Editing(editing) = self.edit {
            if ids.contains(&editing) {
                self.edit = EditState::Idle;
            }
        }
        self.collect_assets();
        self.record_history();
        tracing::debug!("Removed {removed} element(s)");
        removed
    }

    /// Add a copy of an element with a new id, offset from the original.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        let copy = self.get(id)?.duplicate();
        Some(self.add(copy))
    }

    /// Shallow-merge `patch` onto an element and record the change.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        self.mutate(id, |element| patch.apply_to(element))
    }

    /// Run `f` against an element and record the change.
    ///
    /// This is the path for the clamping setters on [`Element`] and its payloads.
    pub fn update_with(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        self.mutate(id, f)
    }

    /// Move an element, snapping to the grid when enabled.
    pub fn move_to(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        let (x, y) = (self.settings.snap(x), self.settings.snap(y));
        self.mutate(id, |element| element.set_position(x, y))
    }

    /// Write a value through a materialized control and record the change.
    ///
    /// Returns `false` if the control's element no longer exists.
    pub fn apply_control(&mut self, control: &MaterializedControl, value: &ControlValue) -> bool {
        let Some(element) = self.get_mut(control.element_id) else {
            return false;
        };
        if !control.apply(element, value) {
            return false;
        }
        self.sync_edit_state();
        self.record_history();
        true
    }

    /// Report that an image element's asset finished loading.
    ///
    /// This is not a user edit and does not create an undo step.
    pub fn image_loaded(&mut self, id: ElementId, natural_width: u32, natural_height: u32) -> bool {
        let loaded = self
            .get_mut(id)
            .is_some_and(|element| element.image_loaded(natural_width, natural_height));
        if loaded {
            self.history.amend(&self.elements, &self.selection);
        }
        loaded
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Select an element, replacing the selection unless `additive`.
    pub fn select(&mut self, id: ElementId, additive: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        if !additive {
            self.selection.clear();
        }
        self.selection.insert(id);
        self.history.amend_selection(&self.selection);
        true
    }

    /// Replace the selection with the given ids. Unknown ids are skipped.
    pub fn select_many(&mut self, ids: &[ElementId]) -> usize {
        self.selection = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        self.history.amend_selection(&self.selection);
        self.selection.len()
    }

    /// Remove an element from the selection.
    pub fn deselect(&mut self, id: ElementId) -> bool {
        let removed = self.selection.remove(&id);
        if removed {
            self.history.amend_selection(&self.selection);
        }
        removed
    }

    /// Select every element.
    pub fn select_all(&mut self) {
        self.selection = self.elements.iter().map(|e| e.id).collect();
        self.history.amend_selection(&self.selection);
    }

    /// Clear the selection and leave inline text editing.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.end_edit();
        self.history.amend_selection(&self.selection);
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids, sorted.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self.selection.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Selected elements in insertion order.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .collect()
    }

    /// Whether anything is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    // ---------------------------------------------------------------------
    // Z-order
    // ---------------------------------------------------------------------

    /// Place an element above every other.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let top = self.max_z().saturating_add(1);
        self.mutate(id, |element| element.z_index = top)
    }

    /// Place an element below every other.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let bottom = self.min_z().saturating_sub(1);
        self.mutate(id, |element| element.z_index = bottom)
    }

    /// Move an element one step up.
    pub fn raise(&mut self, id: ElementId) -> bool {
        self.mutate(id, |element| {
            element.z_index = element.z_index.saturating_add(1);
        })
    }

    /// Move an element one step down.
    pub fn lower(&mut self, id: ElementId) -> bool {
        self.mutate(id, |element| {
            element.z_index = element.z_index.saturating_sub(1);
        })
    }

    // ---------------------------------------------------------------------
    // Inline text editing
    // ---------------------------------------------------------------------

    /// Start editing a text element, ending any edit in progress.
    ///
    /// Returns `false` and leaves the state alone for missing or non-text elements.
    pub fn begin_edit(&mut self, id: ElementId) -> bool {
        match self.get(id).map(Element::kind) {
            Some(ElementKind::Text) => {}
            Some(kind) => {
                tracing::warn!("Cannot edit {kind} element {id} inline");
                return false;
            }
            None => return false,
        }
        self.end_edit();
        if let Some(text) = self.get_mut(id).and_then(Element::as_text_mut) {
            text.start_editing();
        }
        self.edit = EditState::Editing(id);
        true
    }

    /// Leave inline editing. Does nothing when idle.
    pub fn end_edit(&mut self) {
        if let EditState::Editing(id) = std::mem::take(&mut self.edit) {
            if let Some(text) = self.get_mut(id).and_then(Element::as_text_mut) {
                text.stop_editing();
            }
        }
    }

    /// Current edit state.
    #[must_use]
    pub fn editing(&self) -> EditState {
        self.edit
    }

    // ---------------------------------------------------------------------
    // Clipboard
    // ---------------------------------------------------------------------

    /// Copy the selected elements. Returns how many were copied.
    pub fn copy_selection(&mut self) -> usize {
        let mut copied: Vec<_> = self.selected_elements().into_iter().cloned().collect();
        copied.sort_by_key(|e| e.z_index);
        self.clipboard = copied;
        self.clipboard.len()
    }

    /// Add offset copies of the clipboard as one undo step and select them.
    ///
    /// Pasting again places the next copies further along.
    pub fn paste(&mut self) -> Vec<ElementId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let copies: Vec<_> = self.clipboard.iter().map(Element::duplicate).collect();
        let ids: Vec<_> = copies.iter().cloned().map(|e| self.insert(e)).collect();
        self.clipboard = copies;

        self.end_edit();
        self.selection = ids.iter().copied().collect();
        self.collect_assets();
        self.record_history();
        ids
    }

    /// Whether the clipboard holds anything.
    #[must_use]
    pub fn can_paste(&self) -> bool {
        !self.clipboard.is_empty()
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    /// Record the current state as an undo step.
    pub fn record_history(&mut self) {
        self.history.record(&self.elements, &self.selection);
    }

    /// Restore the previous snapshot. Returns `false` at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        let (elements, selection) = (snapshot.elements.clone(), snapshot.selection());
        self.restore(elements, selection);
        true
    }

    /// Restore the next snapshot. Returns `false` at the newest one.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        let (elements, selection) = (snapshot.elements.clone(), snapshot.selection());
        self.restore(elements, selection);
        true
    }

    /// Whether [`Document::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Document::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The underlying history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn restore(&mut self, elements: Vec<Element>, selection: HashSet<ElementId>) {
        self.elements = elements;
        self.selection = selection;
        self.edit = EditState::Idle;
    }

    fn insert(&mut self, mut element: Element) -> ElementId {
        element.z_index = self.max_z().saturating_add(1);
        self.insert_raw(element)
    }

    fn insert_raw(&mut self, mut element: Element) -> ElementId {
        if self.contains(element.id) {
            element.id = ElementId::new();
        }
        if let Some(text) = element.as_text_mut() {
            text.stop_editing();
        }
        let id = element.id;
        self.elements.push(element);
        id
    }

    fn mutate(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        f(element);
        self.sync_edit_state();
        self.record_history();
        true
    }

    /// Drop the edit state if the edited element stopped being text.
    fn sync_edit_state(&mut self) {
        if let EditState::Editing(id) = self.edit {
            if self.get(id).map(Element::kind) != Some(ElementKind::Text) {
                self.edit = EditState::Idle;
            }
        }
    }

    fn max_z(&self) -> i32 {
        self.elements.iter().map(|e| e.z_index).fold(0, i32::max)
    }

    fn min_z(&self) -> i32 {
        self.elements.iter().map(|e| e.z_index).fold(0, i32::min)
    }

    fn collect_assets(&mut self) {
        if self.assets.is_none() {
            return;
        }
        let refs = self.asset_refs();
        if let Some(cache) = self.assets.as_mut() {
            let images = cache.evict_images_not_in(&refs.images);
            let fonts = cache.evict_fonts_not_in(&refs.fonts);
            tracing::debug!(
                "Asset GC: {} images and {} fonts referenced, evicted {images} images and {fonts} fonts",
                refs.images.len(),
                refs.fonts.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::template::tests::TextPresets;

    #[derive(Clone, Default)]
    struct RecordingCache {
        image_calls: Arc<Mutex<Vec<HashSet<String>>>>,
        font_calls: Arc<Mutex<Vec<HashSet<String>>>>,
    }

    impl AssetCache for RecordingCache {
        fn evict_images_not_in(&mut self, keep: &HashSet<String>) -> usize {
            self.image_calls.lock().expect("lock").push(keep.clone());
            0
        }

        fn evict_fonts_not_in(&mut self, keep: &HashSet<String>) -> usize {
            self.font_calls.lock().expect("lock").push(keep.clone());
            0
        }
    }

    fn z_indices(doc: &Document) -> Vec<i32> {
        doc.elements().iter().map(|e| e.z_index).collect()
    }

    #[test]
    fn test_add_assigns_increasing_z() {
        let mut doc = Document::new();
        for i in 0..5 {
            doc.add(Element::text(format!("t{i}"), 0.0, 0.0));
        }
        assert_eq!(z_indices(&doc), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_add_ignores_negative_max() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        doc.send_to_back(a);
        assert_eq!(doc.get(a).map(|e| e.z_index), Some(-1));
        let b = doc.add(Element::text("b", 0.0, 0.0));
        assert_eq!(doc.get(b).map(|e| e.z_index), Some(1));
    }

    #[test]
    fn test_add_same_element_twice_gets_new_id() {
        let mut doc = Document::new();
        let element = Element::button("Go", 0.0, 0.0);
        let first = doc.add(element.clone());
        let second = doc.add(element);
        assert_ne!(first, second);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_z_order_operations() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let b = doc.add(Element::text("b", 0.0, 0.0));
        let c = doc.add(Element::text("c", 0.0, 0.0));

        assert!(doc.bring_to_front(a));
        assert_eq!(doc.get(a).map(|e| e.z_index), Some(4));
        assert!(doc.send_to_back(c));
        assert_eq!(doc.get(c).map(|e| e.z_index), Some(-1));
        assert!(doc.raise(b));
        assert!(doc.lower(b));
        assert!(doc.lower(b));
        assert_eq!(doc.get(b).map(|e| e.z_index), Some(1));

        let order: Vec<_> = doc.sorted_elements().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn test_z_order_saturates_at_extremes() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let b = doc.add(Element::text("b", 0.0, 0.0));
        let top = ElementPatch {
            z_index: Some(i32::MAX),
            ..ElementPatch::default()
        };
        assert!(doc.update(a, top));

        assert!(doc.bring_to_front(b));
        assert_eq!(doc.get(b).map(|e| e.z_index), Some(i32::MAX));
        assert!(doc.raise(a));
        assert_eq!(doc.get(a).map(|e| e.z_index), Some(i32::MAX));
        let c = doc.add(Element::text("c", 0.0, 0.0));
        assert_eq!(doc.get(c).map(|e| e.z_index), Some(i32::MAX));

        let bottom = ElementPatch {
            z_index: Some(i32::MIN),
            ..ElementPatch::default()
        };
        assert!(doc.update(c, bottom));
        assert!(doc.send_to_back(b));
        assert_eq!(doc.get(b).map(|e| e.z_index), Some(i32::MIN));
        assert!(doc.lower(c));
        assert_eq!(doc.get(c).map(|e| e.z_index), Some(i32::MIN));
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut doc = Document::new();
        let ghost = ElementId::new();
        let history = doc.history().len();

        assert!(!doc.remove(ghost));
        assert_eq!(doc.remove_many(&[ghost]), 0);
        assert!(doc.duplicate(ghost).is_none());
        assert!(!doc.update(ghost, ElementPatch::default()));
        assert!(!doc.bring_to_front(ghost));
        assert!(!doc.send_to_back(ghost));
        assert!(!doc.raise(ghost));
        assert!(!doc.lower(ghost));
        assert!(!doc.select(ghost, false));
        assert!(!doc.begin_edit(ghost));
        assert_eq!(doc.history().len(), history);
    }

    #[test]
    fn test_remove_clears_selection_and_edit() {
        let mut doc = Document::new();
        let a = doc.create(Element::text("a", 0.0, 0.0));
        assert!(doc.begin_edit(a));
        assert!(doc.remove(a));
        assert!(!doc.has_selection());
        assert_eq!(doc.editing(), EditState::Idle);
    }

    #[test]
    fn test_remove_many_is_single_step() {
        let mut doc = Document::new();
        let ids: Vec<_> = (0..3)
            .map(|i| doc.add(Element::text(format!("{i}"), 0.0, 0.0)))
            .collect();
        doc.select_all();
        assert_eq!(doc.remove_many(&ids[..2]), 2);
        assert_eq!(doc.selected_ids(), vec![ids[2]]);

        assert!(doc.undo());
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.selected_ids().len(), 3);
    }

    #[test]
    fn test_duplicate_adds_on_top() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 10.0, 10.0));
        let b = doc.duplicate(a).expect("exists");
        let copy = doc.get(b).expect("copy");
        assert_ne!(a, b);
        assert_eq!(copy.z_index, 2);
        assert!((copy.transform.x - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_is_raw_and_recorded() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let patch = ElementPatch {
            opacity: Some(3.0),
            locked: Some(true),
            ..ElementPatch::default()
        };
        assert!(doc.update(a, patch));
        let element = doc.get(a).expect("exists");
        assert!((element.opacity - 3.0).abs() < f32::EPSILON);
        assert!(element.locked);

        assert!(doc.undo());
        assert!(!doc.get(a).expect("exists").locked);
    }

    #[test]
    fn test_update_with_uses_clamping_setters() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        doc.update_with(a, |e| e.set_opacity(3.0));
        assert!((doc.get(a).expect("exists").opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_move_to_snaps_when_enabled() {
        let mut doc = Document::new();
        let a = doc.add(Element::button("Go", 0.0, 0.0));
        doc.settings_mut().snap_to_grid = true;
        assert!(doc.move_to(a, 33.0, 9.0));
        let t = doc.get(a).expect("exists").transform;
        assert!((t.x - 40.0).abs() < f32::EPSILON);
        assert!(t.y.abs() < f32::EPSILON);
    }

    #[test]
    fn test_selection_operations() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let b = doc.add(Element::text("b", 0.0, 0.0));

        assert!(doc.select(a, false));
        assert!(doc.select(b, true));
        assert_eq!(doc.selected_elements().len(), 2);
        assert!(doc.select(b, false));
        assert_eq!(doc.selected_ids(), vec![b]);
        assert!(doc.deselect(b));
        assert!(!doc.deselect(b));

        assert_eq!(doc.select_many(&[a, ElementId::new()]), 1);
        assert!(doc.is_selected(a));
        doc.select_all();
        assert_eq!(doc.selected_ids().len(), 2);
        doc.clear_selection();
        assert!(!doc.has_selection());
    }

    #[test]
    fn test_selection_changes_are_not_undo_steps() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let steps = doc.history().len();
        doc.select(a, false);
        doc.clear_selection();
        assert_eq!(doc.history().len(), steps);
    }

    #[test]
    fn test_undo_restores_selection_before_edit() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        doc.select(a, false);
        doc.remove(a);
        assert!(doc.undo());
        assert_eq!(doc.selected_ids(), vec![a]);
    }

    #[test]
    fn test_edit_state_machine() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let b = doc.add(Element::text("b", 0.0, 0.0));
        let button = doc.add(Element::button("Go", 0.0, 0.0));

        assert!(doc.begin_edit(a));
        assert_eq!(doc.editing(), EditState::Editing(a));
        assert!(doc.get(a).and_then(Element::as_text).expect("text").is_editing);

        assert!(doc.begin_edit(b));
        assert_eq!(doc.editing(), EditState::Editing(b));
        assert!(!doc.get(a).and_then(Element::as_text).expect("text").is_editing);

        assert!(!doc.begin_edit(button));
        assert_eq!(doc.editing(), EditState::Editing(b));

        doc.end_edit();
        doc.end_edit();
        assert_eq!(doc.editing(), EditState::Idle);
        assert!(!doc.get(b).and_then(Element::as_text).expect("text").is_editing);
    }

    #[test]
    fn test_clear_selection_ends_edit() {
        let mut doc = Document::new();
        let a = doc.create(Element::text("a", 0.0, 0.0));
        doc.begin_edit(a);
        doc.clear_selection();
        assert_eq!(doc.editing(), EditState::Idle);
    }

    #[test]
    fn test_patch_to_non_text_ends_edit() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        doc.begin_edit(a);
        let content = Element::button("Go", 0.0, 0.0).content;
        doc.update(
            a,
            ElementPatch {
                content: Some(content),
                ..ElementPatch::default()
            },
        );
        assert_eq!(doc.editing(), EditState::Idle);
    }

    #[test]
    fn test_undo_resets_edit_state() {
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        doc.begin_edit(a);
        doc.update_with(a, |e| {
            if let Some(text) = e.as_text_mut() {
                text.set_text("typed");
            }
        });
        assert!(doc.undo());
        assert_eq!(doc.editing(), EditState::Idle);
        let text = doc.get(a).and_then(Element::as_text).expect("text");
        assert_eq!(text.text, "a");
        assert!(!text.is_editing);
    }

    #[test]
    fn test_history_boundaries() {
        let mut doc = Document::new();
        assert!(!doc.can_undo());
        assert!(!doc.undo());
        assert!(!doc.redo());

        doc.add(Element::text("a", 0.0, 0.0));
        assert!(doc.can_undo());
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.can_redo());
        assert!(doc.redo());
        assert_eq!(doc.len(), 1);
        assert!(!doc.redo());
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut doc = Document::with_config(DocumentConfig {
            history_limit: 3,
            ..DocumentConfig::default()
        });
        for i in 0..5 {
            doc.add(Element::text(format!("{i}"), 0.0, 0.0));
        }
        let mut undos = 0;
        while doc.undo() {
            undos += 1;
        }
        assert_eq!(undos, 2);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_image_loaded_is_not_an_undo_step() {
        let mut doc = Document::new();
        let img = doc.add(Element::image("a.png", "", 0.0, 0.0));
        let steps = doc.history().len();
        assert!(doc.image_loaded(img, 400, 200));
        assert_eq!(doc.history().len(), steps);

        let height = doc.get(img).expect("image").transform.height;
        assert!((height - 100.0).abs() < f32::EPSILON);

        doc.raise(img);
        doc.undo();
        let image = doc.get(img).expect("image");
        assert!(image.as_image().expect("image").is_loaded());
        assert!((image.transform.height - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_control_records() {
        let catalog = ControlCatalog::builtin();
        let mut doc = Document::new();
        let a = doc.add(Element::text("a", 0.0, 0.0));
        let control = doc
            .controls(&catalog, a)
            .into_iter()
            .find(|c| c.id == "fontSize")
            .expect("fontSize");

        assert!(doc.apply_control(&control, &ControlValue::Number(4.0)));
        let size = doc.get(a).and_then(Element::as_text).expect("text").style.font_size;
        assert!((size - 8.0).abs() < f32::EPSILON);

        doc.remove(a);
        assert!(!doc.apply_control(&control, &ControlValue::Number(20.0)));
    }

    #[test]
    fn test_copy_paste_cascades() {
        let mut doc = Document::new();
        let a = doc.create(Element::text("a", 0.0, 0.0));
        assert!(!doc.can_paste());
        assert_eq!(doc.copy_selection(), 1);

        let first = doc.paste();
        let second = doc.paste();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.selected_ids(), second.clone());

        let x = |id: ElementId| doc.get(id).expect("exists").transform.x;
        assert!((x(first[0]) - 20.0).abs() < f32::EPSILON);
        assert!((x(second[0]) - 40.0).abs() < f32::EPSILON);
        assert_ne!(first[0], a);

        assert!(doc.undo());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_element_at_respects_z_visibility_and_viewport() {
        let mut doc = Document::new();
        let below = doc.add(Element::text("below", 0.0, 0.0));
        let above = doc.add(Element::text("above", 0.0, 0.0));
        assert_eq!(doc.element_at(10.0, 10.0), Some(above));

        doc.update(
            above,
            ElementPatch {
                visible: Some(false),
                ..ElementPatch::default()
            },
        );
        assert_eq!(doc.element_at(10.0, 10.0), Some(below));
        assert_eq!(doc.element_at(500.0, 500.0), None);

        doc.settings_mut().zoom = 2.0;
        assert_eq!(doc.element_at(390.0, 90.0), Some(below));
        assert_eq!(doc.element_at(410.0, 90.0), None);
    }

    #[test]
    fn test_context_menu() {
        let mut doc = Document::new();
        let img = doc.add(Element::image("a.png", "", 0.0, 0.0));
        assert_eq!(doc.context_menu(None)[0].action, "add-text");
        assert_eq!(doc.context_menu(Some(img))[0].action, "replace-image");
        assert!(doc.context_menu(Some(ElementId::new())).is_empty());
    }

    #[test]
    fn test_asset_gc_runs_on_structural_edits_only() {
        let cache = RecordingCache::default();
        let mut doc = Document::new().with_asset_cache(Box::new(cache.clone()));

        let img = doc.add(Element::image("a.png", "", 0.0, 0.0));
        let text = doc.add(Element::text("t", 0.0, 0.0));
        doc.raise(text);
        assert_eq!(cache.image_calls.lock().expect("lock").len(), 2);

        doc.remove(img);
        let image_calls = cache.image_calls.lock().expect("lock");
        assert_eq!(image_calls.len(), 3);
        assert!(image_calls[1].contains(&img.to_string()));
        assert!(!image_calls[2].contains(&img.to_string()));

        let font_calls = cache.font_calls.lock().expect("lock");
        assert!(font_calls[2].contains("Arial, sans-serif"));
    }

    #[test]
    fn test_create_from_template() {
        let registry = ServiceRegistry::builder()
            .register("text", TextPresets::new())
            .build();
        let mut doc = Document::new();

        let id = doc
            .create_from_template(&registry, "text", "text-heading", None)
            .expect("template");
        assert_eq!(doc.selected_ids(), vec![id]);
        assert_eq!(doc.get(id).map(|e| e.z_index), Some(1));

        assert!(doc
            .create_from_template(&registry, "shapes", "circle", None)
            .is_err());
        assert_eq!(doc.len(), 1);

        let default = doc
            .create_default_from_template(&registry, "text", Some(Position::new(0.0, 0.0)))
            .expect("default template");
        assert_eq!(doc.get(default).map(|e| e.z_index), Some(2));
    }

    #[test]
    fn test_document_json_roundtrip() {
        let mut doc = Document::new();
        doc.add(Element::text("a", 1.0, 2.0));
        doc.add(Element::image("b.png", "b", 3.0, 4.0));
        doc.add(Element::button("c", 5.0, 6.0));
        doc.settings_mut().show_grid = true;

        let json = doc.to_json().expect("serialize");
        let loaded = Document::from_json(&json).expect("parse");
        assert_eq!(loaded.elements(), doc.elements());
        assert!(loaded.settings().show_grid);
        assert!(!loaded.can_undo());
    }
}
