//! Context menu entries offered for elements and the empty canvas.

use serde::{Deserialize, Serialize};

/// One row of a context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuOption {
    /// Display label; empty for dividers.
    pub label: String,
    /// Action id dispatched by the UI; empty for dividers.
    pub action: String,
    /// Optional icon glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether this row is a separator.
    #[serde(default)]
    pub divider: bool,
}

impl ContextMenuOption {
    /// A selectable entry.
    #[must_use]
    pub fn item(label: &str, action: &str, icon: &str) -> Self {
        Self {
            label: label.to_string(),
            action: action.to_string(),
            icon: Some(icon.to_string()),
            divider: false,
        }
    }

    /// A separator row.
    #[must_use]
    pub fn divider() -> Self {
        Self {
            label: String::new(),
            action: String::new(),
            icon: None,
            divider: true,
        }
    }
}

/// Entries shown when the canvas background is right-clicked.
#[must_use]
pub fn canvas_menu_options() -> Vec<ContextMenuOption> {
    vec![
        ContextMenuOption::item("Add Text", "add-text", "📝"),
        ContextMenuOption::item("Add Image", "add-image", "🖼️"),
        ContextMenuOption::item("Add Button", "add-button", "🔘"),
        ContextMenuOption::divider(),
        ContextMenuOption::item("Paste", "paste", "📋"),
        ContextMenuOption::item("Select All", "select-all", "🔲"),
    ]
}
