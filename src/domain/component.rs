//! Component definitions
//!
//! A component declares typed props (a JSON schema object) and slots.
//! Definitions are read from `*.component.yml` files by the catalog; this
//! module only knows how to turn the parsed file into a [`ComponentDefinition`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::definition::{PropAnnotations, PropDefinition};

/// Group used when a component does not declare one
pub const DEFAULT_GROUP: &str = "Other";

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Invalid definition for prop '{prop}': {message}")]
    InvalidProp { prop: String, message: String },

    #[error("Invalid definition for slot '{slot}': {message}")]
    InvalidSlot { slot: String, message: String },
}

/// A slot declared by a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A variant declared by a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `props` key of a component file: a JSON schema object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropsSchema {
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub required: Vec<String>,
}

/// Raw contents of a `*.component.yml` file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentFile {
    pub name: Option<String>,

    /// Overrides the provider derived from the file location
    pub provider: Option<String>,

    pub group: Option<String>,

    pub description: Option<String>,

    pub status: Option<String>,

    #[serde(default)]
    pub props: PropsSchema,

    #[serde(default)]
    pub slots: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub variants: serde_json::Map<String, serde_json::Value>,

    /// Id of a component this one replaces
    pub replaces: Option<String>,
}

/// A loaded component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    /// `provider:machine_name`
    pub id: String,
    pub provider: String,
    pub machine_name: String,
    pub name: String,
    pub group: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub props: Vec<(String, PropDefinition)>,
    pub slots: Vec<(String, SlotDefinition)>,
    pub variants: Vec<(String, VariantDefinition)>,
    pub replaces: Option<String>,
}

impl ComponentDefinition {
    /// Builds a definition from a parsed file.
    ///
    /// Props listed in the schema's `required` list are annotated as
    /// required, and get `required: true` unless they already declare it.
    pub fn from_file(
        provider: &str,
        machine_name: &str,
        file: ComponentFile,
    ) -> Result<Self, ComponentError> {
        let provider = file.provider.unwrap_or_else(|| provider.to_string());

        let mut props = Vec::with_capacity(file.props.properties.len());
        for (name, schema) in file.props.properties {
            let mut definition: PropDefinition =
                serde_json::from_value(schema).map_err(|e| ComponentError::InvalidProp {
                    prop: name.clone(),
                    message: e.to_string(),
                })?;

            let required = file.props.required.contains(&name);
            if required && definition.required.is_none() {
                definition.required = Some(serde_json::Value::Bool(true));
            }
            definition
                .ui_patterns
                .get_or_insert_with(PropAnnotations::default)
                .required = required;

            props.push((name, definition));
        }

        let mut slots = Vec::with_capacity(file.slots.len());
        for (name, schema) in file.slots {
            let slot = match schema {
                serde_json::Value::Null => SlotDefinition::default(),
                other => serde_json::from_value(other).map_err(|e| ComponentError::InvalidSlot {
                    slot: name.clone(),
                    message: e.to_string(),
                })?,
            };
            slots.push((name, slot));
        }

        // Variants are display metadata; a malformed entry just loses its title
        let variants = file
            .variants
            .into_iter()
            .map(|(id, v)| (id, serde_json::from_value(v).unwrap_or_default()))
            .collect();

        Ok(Self {
            id: format!("{}:{}", provider, machine_name),
            name: file.name.unwrap_or_else(|| machine_name.to_string()),
            group: file
                .group
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            provider,
            machine_name: machine_name.to_string(),
            description: file.description,
            status: file.status,
            props,
            slots,
            variants,
            replaces: file.replaces,
        })
    }

    /// Looks up a prop definition
    pub fn prop(&self, name: &str) -> Option<&PropDefinition> {
        self.props.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Looks up a slot
    pub fn slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Prop definition used to normalize a slot's value
    pub fn slot_prop_definition(&self, name: &str) -> Option<PropDefinition> {
        self.slot(name).map(|slot| PropDefinition {
            title: slot.title.clone(),
            description: slot.description.clone(),
            ui_patterns: Some(PropAnnotations {
                required: false,
                type_definition: Some("slot".to_string()),
            }),
            ..PropDefinition::default()
        })
    }

    /// JSON view used for display
    pub fn to_json(&self) -> serde_json::Value {
        let props: serde_json::Map<String, serde_json::Value> = self
            .props
            .iter()
            .map(|(n, d)| (n.clone(), serde_json::to_value(d).unwrap_or_default()))
            .collect();
        let slots: serde_json::Map<String, serde_json::Value> = self
            .slots
            .iter()
            .map(|(n, s)| (n.clone(), serde_json::to_value(s).unwrap_or_default()))
            .collect();
        let variants: serde_json::Map<String, serde_json::Value> = self
            .variants
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::to_value(v).unwrap_or_default()))
            .collect();

        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "group": self.group,
            "description": self.description,
            "status": self.status,
            "props": props,
            "slots": slots,
            "variants": variants,
            "replaces": self.replaces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ComponentFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn builds_id_and_defaults() {
        let file = parse("name: Card\n");
        let component = ComponentDefinition::from_file("theme", "card", file).unwrap();

        assert_eq!(component.id, "theme:card");
        assert_eq!(component.name, "Card");
        assert_eq!(component.group, DEFAULT_GROUP);
        assert!(component.props.is_empty());
    }

    #[test]
    fn annotates_required_props() {
        let file = parse(
            r#"
name: Button
props:
  type: object
  required: [variant]
  properties:
    variant:
      type: string
      enum: [primary, secondary]
    label:
      type: string
"#,
        );
        let component = ComponentDefinition::from_file("theme", "button", file).unwrap();

        let variant = component.prop("variant").unwrap();
        assert_eq!(variant.required, Some(serde_json::Value::Bool(true)));
        assert!(variant.is_annotated_required());

        let label = component.prop("label").unwrap();
        assert_eq!(label.required, None);
        assert!(!label.is_annotated_required());

        // Declaration order is kept
        assert_eq!(component.props[0].0, "variant");
    }

    #[test]
    fn file_provider_overrides_location() {
        let file = parse("name: Card\nprovider: other\n");
        let component = ComponentDefinition::from_file("theme", "card", file).unwrap();
        assert_eq!(component.id, "other:card");
    }

    #[test]
    fn slots_become_slot_props() {
        let file = parse(
            r#"
name: Card
slots:
  body:
    title: Body
  footer:
"#,
        );
        let component = ComponentDefinition::from_file("theme", "card", file).unwrap();

        assert_eq!(component.slots.len(), 2);
        let body = component.slot_prop_definition("body").unwrap();
        assert_eq!(body.type_definition(), Some("slot"));
        assert_eq!(body.title.as_deref(), Some("Body"));
        assert!(component.slot_prop_definition("missing").is_none());
    }

    #[test]
    fn invalid_prop_is_an_error() {
        let file = parse(
            r#"
name: Broken
props:
  properties:
    size:
      minItems: lots
"#,
        );
        let err = ComponentDefinition::from_file("theme", "broken", file).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidProp { ref prop, .. } if prop == "size"));
    }
}
