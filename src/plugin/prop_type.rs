//! Prop type interface
//!
//! A prop type knows how to normalize any source value into something its
//! schema accepts. All hooks except the identity ones have defaults, so a
//! prop type only implements what it changes.

use crate::domain::{PropDefinition, PropValue};
use crate::normalize::Normalizer;
use crate::render::RenderError;

/// A typed prop family (string, enum, slot, ...)
pub trait PropType: Send + Sync {
    /// Registry id
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn label(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    /// Source used when a prop of this type has no binding configured
    fn default_source_id(&self) -> &'static str {
        ""
    }

    /// JSON schema a prop definition must be compatible with
    fn schema(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    /// Prop types whose sources can feed this one through [`Self::convert_from`]
    fn convertible_from(&self) -> &'static [&'static str] {
        &[]
    }

    /// Short description of a prop definition, for listings
    fn summary(&self, definition: &PropDefinition) -> Vec<String> {
        let mut summary = Vec::new();
        if let Some(description) = &definition.description {
            summary.push(description.clone());
        }
        if let Some(default) = &definition.default {
            summary.push(format!(
                "Default: {}",
                serde_json::to_string(&default.to_json()).unwrap_or_default()
            ));
        }
        if definition.is_annotated_required() {
            summary.push("Required".to_string());
        }
        summary
    }

    /// Makes a source value conform to the definition
    fn normalize(
        &self,
        value: PropValue,
        _definition: &PropDefinition,
        _normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        Ok(value)
    }

    /// Final adjustments applied to a normalized value before rendering.
    ///
    /// Extension hook: the built-in prop types keep the identity default.
    /// The binder and `normalize` command call it after `normalize`.
    fn preprocess(&self, value: PropValue, _definition: &PropDefinition) -> PropValue {
        value
    }

    /// Converts a value produced for another prop type
    fn convert_from(&self, _prop_type: &str, value: PropValue) -> PropValue {
        value
    }
}

impl std::fmt::Debug for dyn PropType + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropType").field("id", &self.id()).finish()
    }
}

/// Picks the prop type id for a definition.
///
/// An explicit `ui_patterns.type_definition` wins. Otherwise the schema
/// shape decides, falling back to `slot` for anything that is not a known
/// scalar or enum shape.
pub fn resolve_prop_type(definition: &PropDefinition) -> &str {
    if let Some(id) = definition.type_definition() {
        return id;
    }

    if definition.has_type("array") {
        if let Some(items) = definition.item_definition() {
            if !items.enum_values().is_empty() {
                return if definition.unique_items == Some(true) {
                    "enum_set"
                } else {
                    "enum_list"
                };
            }
        }
    }

    if !definition.enum_values().is_empty() {
        return "enum";
    }

    if definition.has_type("boolean") {
        return "boolean";
    }

    if definition.has_type("number") || definition.has_type("integer") {
        return "number";
    }

    if definition.has_type("string") {
        let is_url = matches!(
            definition.format.as_deref(),
            Some("uri" | "iri" | "uri-reference" | "iri-reference")
        );
        return if is_url { "url" } else { "string" };
    }

    "slot"
}
