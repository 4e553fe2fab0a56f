//! Starter templates and the registry of services that provide them.
//!
//! Template content (which headings, buttons or images exist) is supplied by
//! the host. This module only fixes the shape of a template, the contract a
//! provider implements, and how providers are looked up.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::element::{Element, Position};
use crate::error::{DocumentError, DocumentResult};

/// Where a template lands when the caller gives no position.
pub const DEFAULT_TEMPLATE_POSITION: Position = Position::new(100.0, 100.0);

/// One entry in a template palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTemplate {
    /// Template id, unique within its service.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Preview text, emoji or URL.
    pub preview: String,
    /// Optional grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Provider-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl AssetTemplate {
    /// Case-insensitive match against name, tags and category.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
            || self
                .category
                .as_ref()
                .is_some_and(|category| category.to_lowercase().contains(&term))
    }
}

/// A provider of templates of one family (text presets, buttons, images...).
pub trait TemplateService: Send + Sync {
    /// Panel title for this family.
    fn display_name(&self) -> &str;

    /// Every template this service offers.
    fn templates(&self) -> &[AssetTemplate];

    /// Build a fresh element from `template`, placed at `position`.
    fn create_element(&self, template: &AssetTemplate, position: Position) -> Element;

    /// Template by id.
    fn find(&self, id: &str) -> Option<&AssetTemplate> {
        self.templates().iter().find(|template| template.id == id)
    }

    /// Distinct categories, sorted.
    fn categories(&self) -> Vec<String> {
        self.templates()
            .iter()
            .filter_map(|template| template.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Templates matching a search term.
    fn filter(&self, term: &str) -> Vec<&AssetTemplate> {
        self.templates()
            .iter()
            .filter(|template| template.matches(term))
            .collect()
    }
}

/// Immutable lookup of template services by type name.
///
/// Built once with [`ServiceRegistry::builder`] and passed by reference.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Box<dyn TemplateService>>,
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.service_types())
            .finish()
    }
}

impl ServiceRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::default()
    }

    /// Service registered under `service_type`.
    #[must_use]
    pub fn get(&self, service_type: &str) -> Option<&dyn TemplateService> {
        self.services.get(service_type).map(AsRef::as_ref)
    }

    /// Whether a service is registered under `service_type`.
    #[must_use]
    pub fn contains(&self, service_type: &str) -> bool {
        self.services.contains_key(service_type)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn service_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.services.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Build an element from a named template.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ServiceNotFound`] or
    /// [`DocumentError::TemplateNotFound`] if either lookup fails.
    pub fn instantiate(
        &self,
        service_type: &str,
        template_id: &str,
        position: Option<Position>,
    ) -> DocumentResult<Element> {
        let service = self.service(service_type)?;
        let template =
            service
                .find(template_id)
                .ok_or_else(|| DocumentError::TemplateNotFound {
                    service: service_type.to_string(),
                    template: template_id.to_string(),
                })?;
        tracing::debug!("Instantiating template {service_type}/{template_id}");
        Ok(service.create_element(template, position.unwrap_or(DEFAULT_TEMPLATE_POSITION)))
    }

    /// Build an element from a service's first template.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ServiceNotFound`] if no such service exists, or
    /// [`DocumentError::NoTemplates`] if it offers nothing.
    pub fn instantiate_default(
        &self,
        service_type: &str,
        position: Option<Position>,
    ) -> DocumentResult<Element> {
        let service = self.service(service_type)?;
        let template = service
            .templates()
            .first()
            .ok_or_else(|| DocumentError::NoTemplates(service_type.to_string()))?;
        Ok(service.create_element(template, position.unwrap_or(DEFAULT_TEMPLATE_POSITION)))
    }

    fn service(&self, service_type: &str) -> DocumentResult<&dyn TemplateService> {
        self.get(service_type)
            .ok_or_else(|| DocumentError::ServiceNotFound(service_type.to_string()))
    }
}

/// Builder for [`ServiceRegistry`].
#[derive(Default)]
pub struct ServiceRegistryBuilder {
    services: HashMap<String, Box<dyn TemplateService>>,
}

impl ServiceRegistryBuilder {
    /// Register `service` under `service_type`, replacing any previous one.
    #[must_use]
    pub fn register(
        mut self,
        service_type: impl Into<String>,
        service: impl TemplateService + 'static,
    ) -> Self {
        let service_type = service_type.into();
        tracing::debug!("Template service registered: {service_type}");
        self.services.insert(service_type, Box::new(service));
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry {
            services: self.services,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Text presets used across the crate's tests.
    pub(crate) struct TextPresets {
        templates: Vec<AssetTemplate>,
    }

    impl TextPresets {
        pub(crate) fn new() -> Self {
            let preset = |id: &str, name: &str, category: &str, size: f64| AssetTemplate {
                id: id.to_string(),
                name: name.to_string(),
                preview: name.to_string(),
                category: Some(category.to_string()),
                tags: vec![name.to_lowercase()],
                data: serde_json::json!({ "text": format!("Your {name}"), "fontSize": size }),
            };
            Self {
                templates: vec![
                    preset("text-heading", "Heading", "Typography", 32.0),
                    preset("text-body", "Body", "Typography", 16.0),
                    preset("text-quote", "Quote", "Decorative", 20.0),
                ],
            }
        }
    }

    impl TemplateService for TextPresets {
        fn display_name(&self) -> &str {
            "Text"
        }

        fn templates(&self) -> &[AssetTemplate] {
            &self.templates
        }

        #[allow(clippy::cast_possible_truncation)]
        fn create_element(&self, template: &AssetTemplate, position: Position) -> Element {
            let text = template.data["text"].as_str().unwrap_or("New Text");
            let mut element = Element::text(text, position.x, position.y);
            if let (Some(data), Some(size)) =
                (element.as_text_mut(), template.data["fontSize"].as_f64())
            {
                data.set_font_size(size as f32);
            }
            element
        }
    }

    struct Empty;

    impl TemplateService for Empty {
        fn display_name(&self) -> &str {
            "Empty"
        }

        fn templates(&self) -> &[AssetTemplate] {
            &[]
        }

        fn create_element(&self, _template: &AssetTemplate, position: Position) -> Element {
            Element::button("unused", position.x, position.y)
        }
    }

    fn registry() -> ServiceRegistry {
        ServiceRegistry::builder()
            .register("text", TextPresets::new())
            .register("empty", Empty)
            .build()
    }

    #[test]
    fn test_instantiate_uses_template_and_position() {
        let element = registry()
            .instantiate("text", "text-heading", Some(Position::new(5.0, 6.0)))
            .expect("template exists");
        let text = element.as_text().expect("text");
        assert_eq!(text.text, "Your Heading");
        assert!((text.style.font_size - 32.0).abs() < f32::EPSILON);
        assert!((element.transform.x - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_instantiate_default_position() {
        let element = registry()
            .instantiate("text", "text-body", None)
            .expect("template exists");
        assert!((element.transform.x - 100.0).abs() < f32::EPSILON);
        assert!((element.transform.y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_service_and_template_are_errors() {
        let registry = registry();
        assert!(matches!(
            registry.instantiate("shapes", "circle", None),
            Err(DocumentError::ServiceNotFound(s)) if s == "shapes"
        ));
        assert!(matches!(
            registry.instantiate("text", "nope", None),
            Err(DocumentError::TemplateNotFound { template, .. }) if template == "nope"
        ));
        assert!(matches!(
            registry.instantiate_default("empty", None),
            Err(DocumentError::NoTemplates(_))
        ));
    }

    #[test]
    fn test_instantiate_default_picks_first() {
        let element = registry()
            .instantiate_default("text", None)
            .expect("has templates");
        assert_eq!(element.as_text().expect("text").text, "Your Heading");
    }

    #[test]
    fn test_filter_and_categories() {
        let presets = TextPresets::new();
        assert_eq!(presets.categories(), vec!["Decorative", "Typography"]);
        assert_eq!(presets.filter("HEAD").len(), 1);
        assert_eq!(presets.filter("typo").len(), 2);
        assert!(presets.find("text-quote").is_some());
    }

    #[test]
    fn test_service_types_sorted() {
        let registry = registry();
        assert_eq!(registry.service_types(), vec!["empty", "text"]);
        assert!(registry.contains("text"));
        assert_eq!(registry.get("text").map(|s| s.display_name()), Some("Text"));
    }
}
