//! Component binding
//!
//! Resolves every prop and slot of a component: the configured source (if
//! any) produces a raw value, which is converted when the source feeds a
//! different prop type, then normalized and preprocessed by the prop type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ComponentDefinition, Entries, PropDefinition, PropValue};
use crate::normalize::Normalizer;
use crate::render::RenderError;

use super::prop_type::PropType;
use super::registry::{PropTypeRegistry, RegistryError, SourceRegistry};
use super::source::{Contexts, Dependencies, Services, Settings, SourceContext, SourceError};

#[derive(Debug, Error)]
pub enum BindError {
    #[error("Component '{component}' has no {kind} named '{name}'")]
    UnknownTarget {
        component: String,
        kind: &'static str,
        name: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Source '{source_id}' cannot feed '{name}' ({prop_type})")]
    Incompatible {
        name: String,
        source_id: String,
        prop_type: &'static str,
    },

    #[error("Source '{source_id}' needs the '{requirement}' context requirement")]
    UnmetRequirement {
        source_id: String,
        requirement: &'static str,
    },

    #[error("Failed to get a value for '{name}'")]
    Source {
        name: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to normalize '{name}'")]
    Normalize {
        name: String,
        #[source]
        source: RenderError,
    },
}

/// A source chosen for one prop or slot, with its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBinding {
    pub source: String,
    #[serde(default)]
    pub settings: Settings,
}

/// Bindings of one component, by prop and slot name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentBindings {
    #[serde(default)]
    pub props: BTreeMap<String, SourceBinding>,
    #[serde(default)]
    pub slots: BTreeMap<String, SourceBinding>,
}

/// Normalized values of a component, ready to render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundComponent {
    pub component: String,
    pub props: Entries,
    pub slots: Entries,
    pub dependencies: Dependencies,
}

impl BoundComponent {
    pub fn to_json(&self) -> serde_json::Value {
        let entries = |entries: &Entries| -> serde_json::Map<String, serde_json::Value> {
            entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect()
        };

        let mut json = serde_json::json!({
            "component": self.component,
            "props": entries(&self.props),
            "slots": entries(&self.slots),
        });
        if !self.dependencies.is_empty() {
            json["dependencies"] = serde_json::to_value(&self.dependencies).unwrap_or_default();
        }
        json
    }
}

/// Binds components using the registered prop types and sources
pub struct Binder<'a> {
    prop_types: &'a PropTypeRegistry,
    sources: &'a SourceRegistry,
    services: Services<'a>,
    requirements: &'a [&'a str],
}

impl<'a> Binder<'a> {
    pub fn new(
        prop_types: &'a PropTypeRegistry,
        sources: &'a SourceRegistry,
        services: Services<'a>,
    ) -> Self {
        Self {
            prop_types,
            sources,
            services,
            requirements: &[],
        }
    }

    /// Context requirements the caller provides (e.g. `views:style`)
    pub fn with_requirements(mut self, requirements: &'a [&'a str]) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn bind(
        &self,
        component: &ComponentDefinition,
        bindings: &ComponentBindings,
        contexts: &Contexts<'_>,
    ) -> Result<BoundComponent, BindError> {
        let unknown = |kind: &'static str, name: &str| BindError::UnknownTarget {
            component: component.id.clone(),
            kind,
            name: name.to_string(),
        };
        if let Some(name) = bindings.props.keys().find(|n| component.prop(n).is_none()) {
            return Err(unknown("prop", name));
        }
        if let Some(name) = bindings.slots.keys().find(|n| component.slot(n).is_none()) {
            return Err(unknown("slot", name));
        }

        let mut bound = BoundComponent {
            component: component.id.clone(),
            ..BoundComponent::default()
        };

        for (name, definition) in &component.props {
            let value = self.resolve(
                name,
                definition,
                bindings.props.get(name),
                contexts,
                &mut bound.dependencies,
            )?;
            bound.props.push((name.clone(), value));
        }

        for (name, _) in &component.slots {
            let Some(definition) = component.slot_prop_definition(name) else {
                continue;
            };
            let value = self.resolve(
                name,
                &definition,
                bindings.slots.get(name),
                contexts,
                &mut bound.dependencies,
            )?;
            bound.slots.push((name.clone(), value));
        }

        tracing::debug!(
            component = %component.id,
            props = bound.props.len(),
            slots = bound.slots.len(),
            "Bound component"
        );
        Ok(bound)
    }

    fn resolve(
        &self,
        name: &str,
        definition: &PropDefinition,
        binding: Option<&SourceBinding>,
        contexts: &Contexts<'_>,
        dependencies: &mut Dependencies,
    ) -> Result<PropValue, BindError> {
        let prop_type = self.prop_types.for_definition(definition)?;

        let value = match binding {
            Some(binding) => self.fetch(name, prop_type, definition, binding, contexts, dependencies)?,
            None => PropValue::Null,
        };

        let normalizer = Normalizer::new(self.services.renderer);
        let value = prop_type
            .normalize(value, definition, &normalizer)
            .map_err(|source| BindError::Normalize {
                name: name.to_string(),
                source,
            })?;
        Ok(prop_type.preprocess(value, definition))
    }

    fn fetch(
        &self,
        name: &str,
        prop_type: &dyn PropType,
        definition: &PropDefinition,
        binding: &SourceBinding,
        contexts: &Contexts<'_>,
        dependencies: &mut Dependencies,
    ) -> Result<PropValue, BindError> {
        let source_definition = self.sources.definition(&binding.source)?;

        if let Some(requirement) = source_definition
            .context_requirements
            .iter()
            .copied()
            .find(|r| !self.requirements.contains(r))
        {
            return Err(BindError::UnmetRequirement {
                source_id: binding.source.clone(),
                requirement,
            });
        }

        let converted_from = if source_definition.prop_types.contains(&prop_type.id()) {
            None
        } else {
            let from = source_definition
                .prop_types
                .iter()
                .copied()
                .find(|t| prop_type.convertible_from().contains(t))
                .ok_or_else(|| BindError::Incompatible {
                    name: name.to_string(),
                    source_id: binding.source.clone(),
                    prop_type: prop_type.id(),
                })?;
            Some(from)
        };

        let source = self.sources.create(&binding.source, binding.settings.clone())?;
        // Sources producing another type run as if feeding that type
        let cx = SourceContext::new(
            converted_from.unwrap_or(prop_type.id()),
            definition,
            self.services,
            contexts,
        );
        let value = source
            .prop_value(&cx)
            .map_err(|source| BindError::Source {
                name: name.to_string(),
                source,
            })?;
        dependencies.merge(source.calculate_dependencies(&cx));

        Ok(match converted_from {
            Some(from) => {
                tracing::trace!(prop = name, from, to = prop_type.id(), "Converting source value");
                prop_type.convert_from(from, value)
            }
            None => value,
        })
    }
}
