//! Control resolution: from an element to the editors the UI should show.

use serde::Serialize;

use super::{
    ControlCatalog, ControlConfig, ControlDescriptor, ControlOption, ControlValue, EditorKind,
    Setter,
};
use crate::element::{Element, ElementId};

impl ControlCatalog {
    /// Ordered, override-merged, visibility-filtered descriptors for `element`.
    ///
    /// Ids without a catalog entry are skipped with a warning. Order follows
    /// the element's declared control list, and repeated ids produce repeated
    /// entries.
    #[must_use]
    pub fn resolve(&self, element: &Element) -> Vec<ControlDescriptor> {
        self.resolve_ids(element, element.control_ids())
    }

    fn resolve_ids(
        &self,
        element: &Element,
        control_ids: &[&'static str],
    ) -> Vec<ControlDescriptor> {
        let overrides = element.control_overrides();

        control_ids
            .iter()
            .filter_map(|id| {
                let Some(base) = self.get(id) else {
                    tracing::warn!("Control '{id}' not found for {} element", element.kind());
                    return None;
                };
                let merged = overrides
                    .get(id)
                    .map_or(*base, |over| base.merged(over));
                merged.is_visible(element).then_some(merged)
            })
            .collect()
    }

    /// Resolve and materialize every control for `element`.
    #[must_use]
    pub fn materialize_all(&self, element: &Element) -> Vec<MaterializedControl> {
        self.resolve(element)
            .iter()
            .map(|descriptor| materialize(descriptor, element))
            .collect()
    }
}

/// A control evaluated against one element, ready for display.
///
/// The setter stays bound to the element it was materialized from; see
/// [`MaterializedControl::apply`].
#[derive(Clone, Serialize)]
pub struct MaterializedControl {
    /// Element the control was evaluated against.
    pub element_id: ElementId,
    /// Control id.
    pub id: &'static str,
    /// Editor widget.
    pub kind: EditorKind,
    /// Display label.
    pub label: &'static str,
    /// Optional icon glyph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    /// Current value read from the element.
    pub value: ControlValue,
    /// Choices for select controls; empty otherwise.
    pub options: Vec<ControlOption>,
    /// Editor hints; default when the descriptor has none.
    pub config: ControlConfig,
    /// Whether the editor should be greyed out.
    pub disabled: bool,
    #[serde(skip)]
    setter: Setter,
}

impl MaterializedControl {
    /// Write `value` through the bound setter.
    ///
    /// Returns `false` without touching `element` if it is not the element the
    /// control was materialized for.
    pub fn apply(&self, element: &mut Element, value: &ControlValue) -> bool {
        if element.id != self.element_id {
            return false;
        }
        (self.setter)(element, value);
        true
    }
}

impl std::fmt::Debug for MaterializedControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializedControl")
            .field("element_id", &self.element_id)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Evaluate `descriptor` against `element` now. Reads only; never mutates.
#[must_use]
pub fn materialize(descriptor: &ControlDescriptor, element: &Element) -> MaterializedControl {
    MaterializedControl {
        element_id: element.id,
        id: descriptor.id,
        kind: descriptor.kind,
        label: descriptor.label,
        icon: descriptor.icon,
        value: (descriptor.get)(element),
        options: descriptor.options.map(|options| options()).unwrap_or_default(),
        config: descriptor.config.map(|config| config()).unwrap_or_default(),
        disabled: descriptor.is_disabled(element),
        setter: descriptor.set,
    }
}
