//! Prop definitions
//!
//! A prop definition is the JSON-schema-flavoured record a component author
//! writes for one prop. Only the keys the normalizer understands are typed;
//! everything else is kept verbatim in [`PropDefinition::extra`].

use serde::{Deserialize, Serialize};

use super::value::PropValue;

/// Annotations attached to a prop when its component is loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropAnnotations {
    /// The prop is listed in the component's `required` list
    #[serde(default)]
    pub required: bool,

    /// Prop type id, when it was set explicitly or already resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_definition: Option<String>,
}

/// Schema for a single component prop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropDefinition {
    /// JSON schema `type`: a string or a list of strings
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Allowed values, in declaration order
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<PropValue>>,

    /// Human-readable labels keyed by the string form of an enum value
    #[serde(rename = "meta:enum", default, skip_serializing_if = "Option::is_none")]
    pub meta_enum: Option<serde_json::Map<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PropValue>,

    /// Kept raw: only a literal `true` makes a prop required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<serde_json::Value>,

    /// Definition of list items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropDefinition>>,

    #[serde(rename = "minItems", default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(rename = "maxItems", default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    #[serde(rename = "uniqueItems", default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_patterns: Option<PropAnnotations>,

    /// Any other schema keys
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PropDefinition {
    /// Declared enum values, empty when absent
    pub fn enum_values(&self) -> &[PropValue] {
        self.enum_values.as_deref().unwrap_or(&[])
    }

    /// Item definition of a list prop, if it has a non-empty one
    pub fn item_definition(&self) -> Option<&PropDefinition> {
        self.items.as_deref().filter(|items| !items.is_empty())
    }

    /// Returns true if the schema `type` is, or includes, `name`
    pub fn has_type(&self, name: &str) -> bool {
        match &self.schema_type {
            Some(serde_json::Value::String(t)) => t == name,
            Some(serde_json::Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(name)),
            _ => false,
        }
    }

    /// Returns true if the definition carries no keys at all
    pub fn is_empty(&self) -> bool {
        *self == PropDefinition::default()
    }

    /// Prop type id set through annotations
    pub fn type_definition(&self) -> Option<&str> {
        self.ui_patterns
            .as_ref()
            .and_then(|a| a.type_definition.as_deref())
    }

    /// Returns true if the prop was annotated as required by its component
    pub fn is_annotated_required(&self) -> bool {
        self.ui_patterns.as_ref().is_some_and(|a| a.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_schema_keys() {
        let definition: PropDefinition = serde_json::from_value(json!({
            "type": "string",
            "title": "Size",
            "enum": ["sm", "lg"],
            "meta:enum": {"sm": "Small"},
            "default": "sm",
            "required": true,
            "x-custom": 1,
        }))
        .unwrap();

        assert!(definition.has_type("string"));
        assert_eq!(definition.enum_values().len(), 2);
        assert_eq!(definition.default, Some(PropValue::from("sm")));
        assert_eq!(definition.required, Some(json!(true)));
        assert_eq!(definition.extra.get("x-custom"), Some(&json!(1)));
    }

    #[test]
    fn parses_list_keys() {
        let definition: PropDefinition = serde_json::from_value(json!({
            "type": ["array", "null"],
            "items": {"enum": [1, 2, 3]},
            "minItems": 1,
            "maxItems": 2,
            "uniqueItems": true,
        }))
        .unwrap();

        assert!(definition.has_type("array"));
        assert!(definition.has_type("null"));
        assert_eq!(definition.item_definition().unwrap().enum_values().len(), 3);
        assert_eq!(definition.min_items, Some(1));
        assert_eq!(definition.max_items, Some(2));
        assert_eq!(definition.unique_items, Some(true));
    }

    #[test]
    fn empty_items_are_ignored() {
        let definition: PropDefinition =
            serde_json::from_value(json!({"type": "array", "items": {}})).unwrap();
        assert!(definition.items.is_some());
        assert!(definition.item_definition().is_none());
    }

    #[test]
    fn null_default_is_absent() {
        let definition: PropDefinition =
            serde_json::from_value(json!({"enum": [1], "default": null})).unwrap();
        assert_eq!(definition.default, None);
    }

    #[test]
    fn parses_yaml() {
        let yaml = r#"
type: string
enum: [primary, secondary]
"meta:enum":
  primary: Primary button
"#;
        let definition: PropDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.enum_values()[0], PropValue::from("primary"));
        assert!(definition.meta_enum.is_some());
    }
}
