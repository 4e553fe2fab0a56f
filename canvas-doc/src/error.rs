//! Error types for document operations.
//!
//! Most editing conditions (missing ids, bad numeric input, history boundaries)
//! are handled in place and never surface here. These types cover the lookups
//! and conversions that a caller cannot sensibly continue from.

use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur in document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element id string could not be parsed.
    #[error("Invalid element id: {0}")]
    InvalidId(String),

    /// No template service is registered under the requested type.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// The template service exists but has no template with the requested id.
    #[error("Asset not found: {template} (service {service})")]
    TemplateNotFound {
        /// Service type that was searched.
        service: String,
        /// Template id that was requested.
        template: String,
    },

    /// The template service has no templates to pick a default from.
    #[error("No templates available for service: {0}")]
    NoTemplates(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by an asset loader.
///
/// These never invalidate an element; an element whose asset failed to load
/// stays in the document in its unloaded state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// An image could not be fetched or decoded.
    #[error("Failed to load image {id}: {reason}")]
    Image {
        /// Asset id the image was requested under.
        id: String,
        /// Loader-provided reason.
        reason: String,
    },

    /// A font face could not be loaded.
    #[error("Failed to load font {family}: {reason}")]
    Font {
        /// Requested font family.
        family: String,
        /// Loader-provided reason.
        reason: String,
    },

    /// Another fetch for the same key has not finished yet.
    #[error("Asset {0} is already loading")]
    AlreadyLoading(String),
}
