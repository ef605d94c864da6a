//! Built-in prop types
//!
//! Each type is a unit struct; the registry owns one boxed instance per id.
//!
//! | Id | Normalized value |
//! |----|------------------|
//! | `string` | string (empty for null) |
//! | `url` | trimmed string |
//! | `boolean` | truthiness of the scalar |
//! | `number` | integer or float, null when not numeric |
//! | `enum` | allowed value, else the definition's default |
//! | `enum_list` | allowed values, padded/truncated |
//! | `enum_set` | unique allowed values, padded/truncated |
//! | `slot` | render fragment, or a list of them |

use serde_json::json;

use crate::domain::{PropDefinition, PropValue, RenderFragment};
use crate::normalize::{
    allowed_values, dedup_in_order, default_value, normalize_list_size, Normalizer,
};
use crate::render::RenderError;

use super::prop_type::PropType;

const ENUM_ITEM_TYPES: [&str; 3] = ["string", "number", "integer"];

/// All built-in prop types
pub fn builtin_prop_types() -> Vec<Box<dyn PropType>> {
    vec![
        Box::new(StringPropType),
        Box::new(UrlPropType),
        Box::new(BooleanPropType),
        Box::new(NumberPropType),
        Box::new(EnumPropType),
        Box::new(EnumListPropType),
        Box::new(EnumSetPropType),
        Box::new(SlotPropType),
    ]
}

pub struct StringPropType;

impl PropType for StringPropType {
    fn id(&self) -> &'static str {
        "string"
    }

    fn label(&self) -> &'static str {
        "String"
    }

    fn description(&self) -> &'static str {
        "Text, with markup kept as its string form."
    }

    fn default_source_id(&self) -> &'static str {
        "token"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": "string"})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["url", "enum", "number", "boolean"]
    }

    fn normalize(
        &self,
        value: PropValue,
        _definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        normalizer.coerce_to_string(value).map(PropValue::String)
    }
}

pub struct UrlPropType;

impl PropType for UrlPropType {
    fn id(&self) -> &'static str {
        "url"
    }

    fn label(&self) -> &'static str {
        "URL"
    }

    fn default_source_id(&self) -> &'static str {
        "token"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": "string", "format": "iri-reference"})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["string"]
    }

    fn normalize(
        &self,
        value: PropValue,
        _definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let url = normalizer.coerce_to_string(value)?;
        Ok(PropValue::String(url.trim().to_string()))
    }
}

pub struct BooleanPropType;

impl PropType for BooleanPropType {
    fn id(&self) -> &'static str {
        "boolean"
    }

    fn label(&self) -> &'static str {
        "Boolean"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": "boolean"})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["string", "number"]
    }

    fn normalize(
        &self,
        value: PropValue,
        _definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let scalar = normalizer.coerce_to_scalar(value, true)?;
        Ok(PropValue::Bool(scalar.is_truthy()))
    }
}

pub struct NumberPropType;

impl PropType for NumberPropType {
    fn id(&self) -> &'static str {
        "number"
    }

    fn label(&self) -> &'static str {
        "Number"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": ["number", "integer"]})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["string"]
    }

    fn normalize(
        &self,
        value: PropValue,
        definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let number = match normalizer.coerce_to_scalar(value, true)? {
            PropValue::Int(i) => PropValue::Int(i),
            PropValue::Float(f) => PropValue::Float(f),
            PropValue::Bool(b) => PropValue::Int(i64::from(b)),
            PropValue::String(s) => parse_number(s.trim()),
            _ => PropValue::Null,
        };

        let integer_only = definition.has_type("integer") && !definition.has_type("number");
        Ok(match number {
            PropValue::Float(f) if integer_only => PropValue::Int(f as i64),
            other => other,
        })
    }
}

fn parse_number(s: &str) -> PropValue {
    if let Ok(i) = s.parse::<i64>() {
        return PropValue::Int(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => PropValue::Float(f),
        _ => PropValue::Null,
    }
}

pub struct EnumPropType;

impl PropType for EnumPropType {
    fn id(&self) -> &'static str {
        "enum"
    }

    fn label(&self) -> &'static str {
        "Enum"
    }

    fn description(&self) -> &'static str {
        "One value from a fixed list."
    }

    fn default_source_id(&self) -> &'static str {
        "select"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": ENUM_ITEM_TYPES, "enum": []})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["string", "number"]
    }

    fn summary(&self, definition: &PropDefinition) -> Vec<String> {
        let mut summary = vec![format!("Values: {}", join_values(definition.enum_values()))];
        if definition.is_annotated_required() {
            summary.push("Required".to_string());
        }
        summary
    }

    fn normalize(
        &self,
        value: PropValue,
        definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let allowed = allowed_values(definition);
        let value = normalizer.normalize_value(value, Some(&allowed))?;
        Ok(if value.is_null() {
            default_value(definition)
        } else {
            value
        })
    }
}

pub struct EnumListPropType;

impl PropType for EnumListPropType {
    fn id(&self) -> &'static str {
        "enum_list"
    }

    fn label(&self) -> &'static str {
        "List of enums"
    }

    fn default_source_id(&self) -> &'static str {
        "checkboxes"
    }

    fn schema(&self) -> serde_json::Value {
        json!({"type": "array", "items": {"type": ENUM_ITEM_TYPES, "enum": []}})
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["enum"]
    }

    fn summary(&self, definition: &PropDefinition) -> Vec<String> {
        enum_list_summary(definition)
    }

    fn normalize(
        &self,
        value: PropValue,
        definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let values = normalize_items(value, definition, normalizer)?;
        Ok(PropValue::List(normalize_list_size(values, definition, false)))
    }

    fn convert_from(&self, _prop_type: &str, value: PropValue) -> PropValue {
        wrap_in_list(value)
    }
}

pub struct EnumSetPropType;

impl PropType for EnumSetPropType {
    fn id(&self) -> &'static str {
        "enum_set"
    }

    fn label(&self) -> &'static str {
        "Set of enums"
    }

    fn default_source_id(&self) -> &'static str {
        "checkboxes"
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "type": "array",
            "uniqueItems": true,
            "items": {"type": ENUM_ITEM_TYPES, "enum": []},
        })
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["enum", "enum_list"]
    }

    fn summary(&self, definition: &PropDefinition) -> Vec<String> {
        enum_list_summary(definition)
    }

    fn normalize(
        &self,
        value: PropValue,
        definition: &PropDefinition,
        normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        let mut values = normalize_items(value, definition, normalizer)?;
        dedup_in_order(&mut values);
        Ok(PropValue::List(normalize_list_size(values, definition, true)))
    }

    fn convert_from(&self, _prop_type: &str, value: PropValue) -> PropValue {
        wrap_in_list(value)
    }
}

pub struct SlotPropType;

impl PropType for SlotPropType {
    fn id(&self) -> &'static str {
        "slot"
    }

    fn label(&self) -> &'static str {
        "Slot"
    }

    fn description(&self) -> &'static str {
        "Any renderable: markup, text or nested fragments."
    }

    fn default_source_id(&self) -> &'static str {
        "token"
    }

    fn convertible_from(&self) -> &'static [&'static str] {
        &["string", "url", "enum", "number"]
    }

    fn normalize(
        &self,
        value: PropValue,
        _definition: &PropDefinition,
        _normalizer: &Normalizer<'_>,
    ) -> Result<PropValue, RenderError> {
        Ok(to_renderable(value))
    }
}

fn to_renderable(value: PropValue) -> PropValue {
    match value {
        PropValue::Null => PropValue::List(Vec::new()),
        PropValue::String(s) => RenderFragment::plain_text(s).into(),
        PropValue::Markup(m) => RenderFragment::markup(m).into(),
        scalar @ (PropValue::Bool(_) | PropValue::Int(_) | PropValue::Float(_)) => {
            RenderFragment::plain_text(scalar.cast_string().unwrap_or_default()).into()
        }
        PropValue::Fragment(fragment) => PropValue::Fragment(fragment),
        PropValue::List(items) => PropValue::List(items.into_iter().map(to_renderable).collect()),
        PropValue::Map(entries) => RenderFragment::from_entries(
            entries
                .into_iter()
                .map(|(key, value)| (key, to_renderable(value)))
                .collect(),
        )
        .into(),
    }
}

fn normalize_items(
    value: PropValue,
    definition: &PropDefinition,
    normalizer: &Normalizer<'_>,
) -> Result<Vec<PropValue>, RenderError> {
    let allowed = definition
        .item_definition()
        .map(allowed_values)
        .unwrap_or_default();
    normalizer.normalize_values(value, Some(&allowed))
}

fn wrap_in_list(value: PropValue) -> PropValue {
    match value {
        PropValue::Null => PropValue::List(Vec::new()),
        PropValue::List(items) => PropValue::List(items),
        single => PropValue::List(vec![single]),
    }
}

fn enum_list_summary(definition: &PropDefinition) -> Vec<String> {
    let mut summary = Vec::new();
    if let Some(items) = definition.item_definition() {
        summary.push(format!("Values: {}", join_values(items.enum_values())));
    }
    match (definition.min_items, definition.max_items) {
        (Some(min), Some(max)) => summary.push(format!("Items: {}..{}", min, max)),
        (Some(min), None) => summary.push(format!("Items: at least {}", min)),
        (None, Some(max)) => summary.push(format!("Items: at most {}", max)),
        (None, None) => {}
    }
    summary
}

fn join_values(values: &[PropValue]) -> String {
    values
        .iter()
        .map(|v| serde_json::to_string(&v.to_json()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MarkupRenderer;

    fn definition(json: serde_json::Value) -> PropDefinition {
        serde_json::from_value(json).unwrap()
    }

    fn normalize(prop_type: &dyn PropType, value: serde_json::Value, def: serde_json::Value) -> PropValue {
        let normalizer = Normalizer::new(&MarkupRenderer);
        prop_type
            .normalize(PropValue::from(value), &definition(def), &normalizer)
            .unwrap()
    }

    #[test]
    fn builtin_ids_are_unique() {
        let mut ids: Vec<_> = builtin_prop_types().iter().map(|t| t.id()).collect();
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn string_coerces_everything() {
        let def = json!({"type": "string"});
        assert_eq!(normalize(&StringPropType, json!(null), def.clone()), PropValue::from(""));
        assert_eq!(normalize(&StringPropType, json!(12), def.clone()), PropValue::from("12"));
        assert_eq!(
            normalize(&StringPropType, json!({"#markup": "<b>Hi</b>"}), def),
            PropValue::from("<b>Hi</b>")
        );
    }

    #[test]
    fn url_is_trimmed() {
        assert_eq!(
            normalize(&UrlPropType, json!("  /node/1 "), json!({})),
            PropValue::from("/node/1")
        );
    }

    #[test]
    fn boolean_uses_truthiness() {
        assert_eq!(normalize(&BooleanPropType, json!("0"), json!({})), PropValue::Bool(false));
        assert_eq!(normalize(&BooleanPropType, json!("yes"), json!({})), PropValue::Bool(true));
        assert_eq!(normalize(&BooleanPropType, json!(null), json!({})), PropValue::Bool(false));
    }

    #[test]
    fn number_parses_strings() {
        let def = json!({"type": "number"});
        assert_eq!(normalize(&NumberPropType, json!("42"), def.clone()), PropValue::Int(42));
        assert_eq!(normalize(&NumberPropType, json!(" 1.5"), def.clone()), PropValue::Float(1.5));
        assert_eq!(normalize(&NumberPropType, json!("abc"), def), PropValue::Null);
        assert_eq!(
            normalize(&NumberPropType, json!(2.9), json!({"type": "integer"})),
            PropValue::Int(2)
        );
    }

    #[test]
    fn enum_falls_back_to_default() {
        let def = json!({"enum": ["sm", "md", "lg"], "default": "md"});
        assert_eq!(normalize(&EnumPropType, json!("lg"), def.clone()), PropValue::from("lg"));
        assert_eq!(normalize(&EnumPropType, json!("xl"), def), PropValue::from("md"));

        let required = json!({"enum": [1, 2], "required": true});
        assert_eq!(normalize(&EnumPropType, json!("9"), required), PropValue::Int(1));
    }

    #[test]
    fn enum_list_keeps_duplicates_and_bounds_size() {
        let def = json!({"type": "array", "items": {"enum": ["a", "b"]}, "maxItems": 2});
        assert_eq!(
            normalize(&EnumListPropType, json!(["a", "x", "a", "b"]), def),
            PropValue::from(json!(["a", "a"]))
        );
    }

    #[test]
    fn enum_set_deduplicates_then_fills() {
        let def = json!({
            "type": "array",
            "uniqueItems": true,
            "items": {"enum": ["a", "b", "c"]},
            "minItems": 2,
        });
        assert_eq!(
            normalize(&EnumSetPropType, json!(["c", "c"]), def),
            PropValue::from(json!(["c", "a"]))
        );
    }

    #[test]
    fn enum_lists_accept_single_enum_values() {
        assert_eq!(
            EnumSetPropType.convert_from("enum", PropValue::from("a")),
            PropValue::from(json!(["a"]))
        );
        assert_eq!(
            EnumListPropType.convert_from("enum", PropValue::Null),
            PropValue::List(Vec::new())
        );
    }

    #[test]
    fn slot_wraps_values_in_fragments() {
        assert_eq!(normalize(&SlotPropType, json!(null), json!({})), PropValue::List(Vec::new()));
        assert_eq!(
            normalize(&SlotPropType, json!("<b>"), json!({})),
            RenderFragment::plain_text("<b>").into()
        );
        assert_eq!(
            normalize(&SlotPropType, json!(["a", 1]), json!({})),
            PropValue::List(vec![
                RenderFragment::plain_text("a").into(),
                RenderFragment::plain_text("1").into(),
            ])
        );

        let fragment: PropValue = RenderFragment::markup("<i>x</i>").into();
        let normalizer = Normalizer::new(&MarkupRenderer);
        assert_eq!(
            SlotPropType
                .normalize(fragment.clone(), &PropDefinition::default(), &normalizer)
                .unwrap(),
            fragment
        );
    }

    #[test]
    fn enum_summary_lists_values() {
        let def = definition(json!({"enum": ["a", 2]}));
        assert_eq!(EnumPropType.summary(&def), vec![r#"Values: "a", 2"#.to_string()]);
    }
}
