//! Document and canvas configuration.
//!
//! Everything here deserializes from partial JSON: missing fields fall back
//! to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::DocumentResult;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Canvas surface and viewport settings.
///
/// The document only consults these for grid snapping and screen-to-canvas
/// hit testing; the rest is carried for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Background color.
    pub background_color: String,
    /// Whether the grid is drawn.
    pub show_grid: bool,
    /// Grid spacing in pixels.
    pub grid_size: f32,
    /// Whether positions snap to the grid.
    pub snap_to_grid: bool,
    /// Whether rulers are drawn.
    pub show_rulers: bool,
    /// Zoom factor.
    pub zoom: f32,
    /// Horizontal pan offset in screen pixels.
    pub pan_x: f32,
    /// Vertical pan offset in screen pixels.
    pub pan_y: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background_color: "#ffffff".to_string(),
            show_grid: false,
            grid_size: 20.0,
            snap_to_grid: false,
            show_rulers: false,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl CanvasSettings {
    /// Round `value` to the nearest grid line when snapping is enabled.
    #[must_use]
    pub fn snap(&self, value: f32) -> f32 {
        if self.snap_to_grid && self.grid_size > 0.0 {
            (value / self.grid_size).round() * self.grid_size
        } else {
            value
        }
    }

    /// Convert a screen point into canvas coordinates using pan and zoom.
    #[must_use]
    pub fn screen_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        ((x - self.pan_x) / zoom, (y - self.pan_y) / zoom)
    }

    /// Parse settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DocumentError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for a [`crate::Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Number of history snapshots kept.
    pub history_limit: usize,
    /// Initial canvas settings.
    pub canvas: CanvasSettings,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            canvas: CanvasSettings::default(),
        }
    }
}

impl DocumentConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DocumentError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocumentConfig::default();
        assert_eq!(config.history_limit, 50);
        assert!((config.canvas.width - 800.0).abs() < f32::EPSILON);
        assert!((config.canvas.height - 600.0).abs() < f32::EPSILON);
        assert_eq!(config.canvas.background_color, "#ffffff");
        assert!((config.canvas.grid_size - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DocumentConfig::from_json(r#"{"history_limit": 10, "canvas": {"zoom": 2.0}}"#)
            .expect("valid config");
        assert_eq!(config.history_limit, 10);
        assert!((config.canvas.zoom - 2.0).abs() < f32::EPSILON);
        assert!((config.canvas.width - 800.0).abs() < f32::EPSILON);

        let empty = DocumentConfig::from_json("{}").expect("empty config");
        assert_eq!(empty, DocumentConfig::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(CanvasSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_snap_only_when_enabled() {
        let mut settings = CanvasSettings::default();
        assert!((settings.snap(27.0) - 27.0).abs() < f32::EPSILON);

        settings.snap_to_grid = true;
        assert!((settings.snap(27.0) - 20.0).abs() < f32::EPSILON);
        assert!((settings.snap(31.0) - 40.0).abs() < f32::EPSILON);

        settings.grid_size = 0.0;
        assert!((settings.snap(31.0) - 31.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas() {
        let settings = CanvasSettings {
            zoom: 2.0,
            pan_x: 100.0,
            pan_y: 50.0,
            ..CanvasSettings::default()
        };
        let (x, y) = settings.screen_to_canvas(300.0, 250.0);
        assert!((x - 100.0).abs() < f32::EPSILON);
        assert!((y - 100.0).abs() < f32::EPSILON);
    }
}
