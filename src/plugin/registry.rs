//! Prop type and source registries
//!
//! Both registries are keyed by plugin id and start either empty or loaded
//! with the built-in plugins.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::PropDefinition;

use super::enum_sources::{CheckboxesSource, SelectSource};
use super::prop_type::{resolve_prop_type, PropType};
use super::prop_types::builtin_prop_types;
use super::source::{Settings, Source, SourceDefinition, SourceFactory};
use super::token_source::TokenSource;
use super::view_rows::ViewRowsSource;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("{kind} '{id}' is already registered")]
    Duplicate { kind: &'static str, id: String },

    #[error("Unknown {kind}: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl RegistryError {
    fn not_found(kind: &'static str, id: &str) -> Self {
        RegistryError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Registry of prop types
pub struct PropTypeRegistry {
    entries: HashMap<&'static str, Box<dyn PropType>>,
}

impl PropTypeRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every built-in prop type
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for prop_type in builtin_prop_types() {
            registry.entries.insert(prop_type.id(), prop_type);
        }
        registry
    }

    pub fn register(&mut self, prop_type: Box<dyn PropType>) -> Result<(), RegistryError> {
        let id = prop_type.id();
        if self.entries.contains_key(id) {
            return Err(RegistryError::Duplicate {
                kind: "prop type",
                id: id.to_string(),
            });
        }
        self.entries.insert(id, prop_type);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&dyn PropType, RegistryError> {
        self.entries
            .get(id)
            .map(|prop_type| prop_type.as_ref())
            .ok_or_else(|| RegistryError::not_found("prop type", id))
    }

    /// Prop type of a definition, resolved from its annotations or shape
    pub fn for_definition(&self, definition: &PropDefinition) -> Result<&dyn PropType, RegistryError> {
        self.get(resolve_prop_type(definition))
    }

    /// All prop types, sorted by id
    pub fn list(&self) -> Vec<&dyn PropType> {
        let mut types: Vec<&dyn PropType> = self.entries.values().map(|t| t.as_ref()).collect();
        types.sort_by_key(|t| t.id());
        types
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PropTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

struct SourceEntry {
    definition: &'static SourceDefinition,
    factory: SourceFactory,
}

/// Registry of sources
pub struct SourceRegistry {
    entries: HashMap<&'static str, SourceEntry>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every built-in source
    pub fn with_builtins() -> Self {
        let builtins: [(&'static SourceDefinition, SourceFactory); 4] = [
            (&TokenSource::DEFINITION, TokenSource::boxed),
            (&SelectSource::DEFINITION, SelectSource::boxed),
            (&CheckboxesSource::DEFINITION, CheckboxesSource::boxed),
            (&ViewRowsSource::DEFINITION, ViewRowsSource::boxed),
        ];

        let mut registry = Self::new();
        for (definition, factory) in builtins {
            registry
                .entries
                .insert(definition.id, SourceEntry { definition, factory });
        }
        registry
    }

    pub fn register(
        &mut self,
        definition: &'static SourceDefinition,
        factory: SourceFactory,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(definition.id) {
            return Err(RegistryError::Duplicate {
                kind: "source",
                id: definition.id.to_string(),
            });
        }
        self.entries
            .insert(definition.id, SourceEntry { definition, factory });
        Ok(())
    }

    pub fn definition(&self, id: &str) -> Result<&'static SourceDefinition, RegistryError> {
        self.entries
            .get(id)
            .map(|entry| entry.definition)
            .ok_or_else(|| RegistryError::not_found("source", id))
    }

    /// Instantiates a source with the given settings
    pub fn create(&self, id: &str, settings: Settings) -> Result<Box<dyn Source>, RegistryError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| RegistryError::not_found("source", id))?;
        Ok((entry.factory)(settings))
    }

    /// All source definitions, sorted by id
    pub fn list(&self) -> Vec<&'static SourceDefinition> {
        let mut definitions: Vec<_> = self.entries.values().map(|e| e.definition).collect();
        definitions.sort_by_key(|d| d.id);
        definitions
    }

    /// Sources able to feed a prop type, given the context requirements the
    /// caller provides.
    ///
    /// Sources producing the prop type itself come first, then sources
    /// producing a type it converts from. Each group is sorted by id.
    pub fn for_prop_type(
        &self,
        prop_type: &dyn PropType,
        provided_requirements: &[&str],
    ) -> Vec<&'static SourceDefinition> {
        let mut direct = Vec::new();
        let mut converted = Vec::new();

        for definition in self.list() {
            if !definition.requirements_met(provided_requirements) {
                continue;
            }
            if definition.prop_types.contains(&prop_type.id()) {
                direct.push(definition);
            } else if definition
                .prop_types
                .iter()
                .any(|t| prop_type.convertible_from().contains(t))
            {
                converted.push(definition);
            }
        }

        direct.extend(converted);
        direct
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropValue;
    use crate::plugin::prop_types::StringPropType;
    use crate::plugin::source::{SourceContext, SourceError};
    use serde_json::json;

    struct Answer;

    impl PropType for Answer {
        fn id(&self) -> &'static str {
            "answer"
        }

        fn label(&self) -> &'static str {
            "Answer"
        }
    }

    #[test]
    fn builtins_are_listed_sorted() {
        let registry = PropTypeRegistry::with_builtins();
        let ids: Vec<_> = registry.list().iter().map(|t| t.id()).collect();
        assert_eq!(
            ids,
            vec!["boolean", "enum", "enum_list", "enum_set", "number", "slot", "string", "url"]
        );
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = PropTypeRegistry::with_builtins();
        assert!(registry.register(Box::new(Answer)).is_ok());
        assert_eq!(
            registry.register(Box::new(StringPropType)).unwrap_err(),
            RegistryError::Duplicate {
                kind: "prop type",
                id: "string".to_string()
            }
        );
    }

    #[test]
    fn unknown_ids_are_errors() {
        let registry = PropTypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get("string").unwrap_err().to_string(),
            "Unknown prop type: string"
        );
        assert!(SourceRegistry::new().create("token", Settings::new()).is_err());
    }

    #[test]
    fn prop_types_from_a_local_registry_debug_format() {
        let registry = PropTypeRegistry::with_builtins();
        let found = registry.get("string");
        assert_eq!(format!("{:?}", found), r#"Ok(PropType { id: "string" })"#);
        assert!(registry.get("nope").is_err());
    }

    #[test]
    fn definitions_resolve_to_prop_types() {
        let registry = PropTypeRegistry::with_builtins();
        let definition: PropDefinition =
            serde_json::from_value(json!({"type": "string", "enum": ["a"]})).unwrap();
        assert_eq!(registry.for_definition(&definition).unwrap().id(), "enum");
    }

    #[test]
    fn sources_for_prop_type_respect_requirements() {
        let prop_types = PropTypeRegistry::with_builtins();
        let sources = SourceRegistry::with_builtins();
        let ids = |prop_type: &str, provided: &[&str]| -> Vec<String> {
            sources
                .for_prop_type(prop_types.get(prop_type).unwrap(), provided)
                .iter()
                .map(|d| d.id.to_string())
                .collect()
        };

        assert_eq!(ids("slot", &[]), vec!["token", "select"]);
        assert_eq!(ids("slot", &["views:style"]), vec!["token", "view_rows", "select"]);
        assert_eq!(ids("enum", &[]), vec!["select", "token"]);
        assert_eq!(ids("enum_set", &[]), vec!["checkboxes", "select"]);
        assert_eq!(ids("boolean", &[]), vec!["token"]);
    }

    #[test]
    fn custom_sources_can_be_registered() {
        static CONSTANT: SourceDefinition = SourceDefinition {
            id: "constant",
            label: "Constant",
            description: "",
            prop_types: &["string"],
            tags: &[],
            context_requirements: &[],
            context_definitions: &[],
        };

        struct Constant(Settings);

        impl Source for Constant {
            fn definition(&self) -> &'static SourceDefinition {
                &CONSTANT
            }

            fn settings(&self) -> &Settings {
                &self.0
            }

            fn prop_value(&self, _cx: &SourceContext<'_>) -> Result<PropValue, SourceError> {
                Ok(PropValue::from("42"))
            }
        }

        fn build(settings: Settings) -> Box<dyn Source> {
            Box::new(Constant(settings))
        }

        let mut registry = SourceRegistry::with_builtins();
        registry.register(&CONSTANT, build).unwrap();
        assert!(registry.register(&CONSTANT, build).is_err());
        assert_eq!(registry.create("constant", Settings::new()).unwrap().id(), "constant");
        assert_eq!(registry.len(), 5);
    }
}
