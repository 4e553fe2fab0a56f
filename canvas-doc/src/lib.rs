//! # Canvas Doc
//!
//! Document core for a canvas design tool: the element model, the property
//! control catalog, selection, z-order, inline text editing and snapshot
//! undo/redo. Rendering, layout and asset fetching live outside this crate.
//! Compiles to WASM for the editor front-end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Document                   │
//! ├─────────────────────────────────────────────┤
//! │  Elements        │  History                 │
//! │  - Text          │  - Deep snapshots        │
//! │  - Image         │  - Bounded window        │
//! │  - Button        │  - Selection restore     │
//! ├─────────────────────────────────────────────┤
//! │  Controls        │  Collaborators           │
//! │  - Catalog       │  - AssetCache (GC)       │
//! │  - Resolution    │  - AssetLoader (async)   │
//! │  - Materialize   │  - Template services     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use canvas_doc::{ControlCatalog, ControlValue, Document, Element};
//!
//! let catalog = ControlCatalog::builtin();
//! let mut doc = Document::new();
//! let id = doc.create(Element::text("Hi", 0.0, 0.0));
//!
//! let font_size = doc
//!     .controls(&catalog, id)
//!     .into_iter()
//!     .find(|c| c.id == "fontSize")
//!     .unwrap();
//! doc.apply_control(&font_size, &ControlValue::Number(4.0));
//! assert_eq!(doc.get(id).unwrap().as_text().unwrap().style.font_size, 8.0);
//!
//! doc.undo();
//! assert_eq!(doc.get(id).unwrap().as_text().unwrap().style.font_size, 18.0);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod config;
pub mod control;
pub mod document;
pub mod element;
pub mod error;
pub mod history;
pub mod schema;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use assets::{AssetCache, AssetLoader, CacheStats, FontHandle, ImageAsset, MemoryAssetCache};
pub use config::{CanvasSettings, DocumentConfig};
pub use control::{
    materialize, ControlCatalog, ControlConfig, ControlDescriptor, ControlOption,
    ControlOverride, ControlValue, EditorKind, MaterializedControl,
};
pub use document::{AssetRefs, Document, EditState, ElementPatch};
pub use element::{
    ContextMenuOption, Element, ElementContent, ElementId, ElementKind, Position, Transform,
};
pub use error::{AssetError, DocumentError, DocumentResult};
pub use history::{History, Snapshot};
pub use schema::{CanvasDocument, ElementDocument};
pub use template::{AssetTemplate, ServiceRegistry, TemplateService};

/// Canvas doc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
