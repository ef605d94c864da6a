//! Enum normalization
//!
//! Matches values against a definition's `enum` list, casting scalars to the
//! type of an allowed value when an exact match fails.

use serde::Serialize;

use crate::domain::{PropDefinition, PropValue};
use crate::render::RenderError;

use super::scalar::encode_json_bounded;
use super::Normalizer;

/// One selectable enum value with its display label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumOption {
    pub value: PropValue,
    pub label: String,
}

/// Builds the ordered value -> label options of an enum definition.
///
/// Labels default to the value itself, title-cased for strings. `meta:enum`
/// labels replace them, but only for keys that match an enum value; stale
/// keys are dropped.
pub fn build_options(definition: &PropDefinition) -> Vec<EnumOption> {
    let mut options: Vec<EnumOption> = Vec::new();

    for value in definition.enum_values() {
        if options.iter().any(|o| o.value == *value) {
            continue;
        }
        options.push(EnumOption {
            value: value.clone(),
            label: default_label(value),
        });
    }

    if let Some(meta) = &definition.meta_enum {
        for option in &mut options {
            let label = option
                .value
                .cast_string()
                .and_then(|key| meta.get(&key))
                .and_then(|label| PropValue::from(label.clone()).cast_string());
            if let Some(label) = label {
                option.label = label;
            }
        }
    }

    options
}

/// Allowed values of an enum definition, in declaration order
pub fn allowed_values(definition: &PropDefinition) -> Vec<PropValue> {
    build_options(definition)
        .into_iter()
        .map(|option| option.value)
        .collect()
}

/// Casts a scalar to the type of a matching enum value.
///
/// Tries, in order: the value as-is, its string cast, its integer cast and
/// its float cast, returning the first one found in `enum_values`. Returns
/// the value unchanged when nothing matches or when it is not a scalar.
pub fn coerce_to_enum_type(value: PropValue, enum_values: &[PropValue]) -> PropValue {
    if !value.is_scalar() || enum_values.contains(&value) {
        return value;
    }

    let casts = [
        value.cast_string().map(PropValue::String),
        value.cast_int().map(PropValue::Int),
        value.cast_float().map(PropValue::Float),
    ];

    casts
        .into_iter()
        .flatten()
        .find(|candidate| enum_values.contains(candidate))
        .unwrap_or(value)
}

/// Default value of an enum definition.
///
/// Null without an enum. Otherwise the explicit `default`, or the first enum
/// value when the prop is required, or null.
pub fn default_value(definition: &PropDefinition) -> PropValue {
    let enum_values = definition.enum_values();
    if enum_values.is_empty() {
        return PropValue::Null;
    }

    if let Some(default) = &definition.default {
        return default.clone();
    }

    if is_required(definition) {
        return enum_values.first().cloned().unwrap_or_default();
    }

    PropValue::Null
}

/// Returns true only when `required` is the boolean `true`
pub fn is_required(definition: &PropDefinition) -> bool {
    matches!(definition.required, Some(serde_json::Value::Bool(true)))
}

impl Normalizer<'_> {
    /// Normalizes a value against an optional set of allowed values.
    ///
    /// The value is first coerced to a scalar (tags stripped). Without
    /// allowed values it is returned as-is; otherwise it must match exactly or
    /// after [`coerce_to_enum_type`], and null is returned when it does not.
    pub fn normalize_value(
        &self,
        value: PropValue,
        enum_values: Option<&[PropValue]>,
    ) -> Result<PropValue, RenderError> {
        let value = if value.is_null() {
            value
        } else {
            self.coerce_to_scalar(value, true)?
        };

        let Some(enum_values) = enum_values.filter(|e| !e.is_empty()) else {
            return Ok(value);
        };

        if enum_values.contains(&value) {
            return Ok(value);
        }

        let value = coerce_to_enum_type(value, enum_values);
        if enum_values.contains(&value) {
            return Ok(value);
        }

        tracing::debug!(
            value = %encode_json_bounded(&value, 1),
            kind = value.kind(),
            "Value rejected: not an allowed enum value"
        );
        Ok(PropValue::Null)
    }

    /// Normalizes every member of a list, dropping those that normalize to
    /// null. A scalar is treated as a one-element list, null as an empty one.
    /// Order and duplicates are preserved.
    pub fn normalize_values(
        &self,
        values: PropValue,
        enum_values: Option<&[PropValue]>,
    ) -> Result<Vec<PropValue>, RenderError> {
        let items = match values {
            PropValue::Null => return Ok(Vec::new()),
            PropValue::List(items) => items,
            PropValue::Map(entries) => entries.into_iter().map(|(_, v)| v).collect(),
            single => vec![single],
        };

        let mut normalized = Vec::with_capacity(items.len());
        for item in items {
            let value = self.normalize_value(item, enum_values)?;
            if !value.is_null() {
                normalized.push(value);
            }
        }
        Ok(normalized)
    }
}

fn default_label(value: &PropValue) -> String {
    match value {
        PropValue::String(s) => ucwords(s),
        PropValue::Null => String::new(),
        other => other
            .cast_string()
            .unwrap_or_else(|| encode_json_bounded(other, 1)),
    }
}

/// Upper-cases the first letter of each whitespace-separated word
fn ucwords(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c');
    }
    out
}
