//! List-size normalization
//!
//! Pads or truncates a list so its length satisfies `minItems`/`maxItems`.

use crate::domain::{PropDefinition, PropValue};

use super::enums::default_value;

/// Pads and truncates `values` to the definition's cardinality bounds.
///
/// Definitions without a non-empty `items` definition are left alone. Below
/// `minItems` the list is padded with the definition's default value (which
/// may be null), or, for unique lists, with the item default and then unused
/// item enum values in declaration order. Above `maxItems` the tail is
/// dropped. Padding happens before truncation.
pub fn normalize_list_size(
    mut values: Vec<PropValue>,
    definition: &PropDefinition,
    unique_items: bool,
) -> Vec<PropValue> {
    let Some(items) = definition.item_definition() else {
        return values;
    };

    if let Some(min_items) = definition.min_items {
        if values.len() < min_items {
            if unique_items {
                fill_unique(&mut values, items.enum_values(), default_value(items), min_items);
            } else {
                values.resize(min_items, default_value(definition));
            }
        }
    }

    if let Some(max_items) = definition.max_items {
        values.truncate(max_items);
    }

    values
}

fn fill_unique(
    values: &mut Vec<PropValue>,
    possible_values: &[PropValue],
    default: PropValue,
    min_items: usize,
) {
    if !default.is_null() && !values.contains(&default) {
        values.push(default);
    }

    let candidates: Vec<PropValue> = possible_values
        .iter()
        .filter(|candidate| !values.contains(candidate))
        .cloned()
        .collect();

    for candidate in candidates {
        if values.len() >= min_items {
            break;
        }
        values.push(candidate);
        dedup_in_order(values);
    }
}

/// Removes repeated values, keeping first occurrences
pub fn dedup_in_order(values: &mut Vec<PropValue>) {
    let mut seen: Vec<PropValue> = Vec::with_capacity(values.len());
    values.retain(|value| {
        if seen.contains(value) {
            false
        } else {
            seen.push(value.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(json: serde_json::Value) -> PropDefinition {
        serde_json::from_value(json).unwrap()
    }

    fn list(json: serde_json::Value) -> Vec<PropValue> {
        match PropValue::from(json) {
            PropValue::List(items) => items,
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn no_items_definition_is_identity() {
        let values = list(json!([1]));
        let def = definition(json!({"minItems": 3, "maxItems": 0}));
        assert_eq!(normalize_list_size(values.clone(), &def, false), values);

        let def = definition(json!({"items": {}, "minItems": 3}));
        assert_eq!(normalize_list_size(values.clone(), &def, false), values);
    }

    #[test]
    fn pads_with_default() {
        let def = definition(json!({
            "enum": [1, 9],
            "default": 9,
            "items": {"enum": [1, 9]},
            "minItems": 3,
        }));
        assert_eq!(normalize_list_size(list(json!([1])), &def, false), list(json!([1, 9, 9])));
    }

    #[test]
    fn pads_with_null_when_no_default_exists() {
        // Known edge case: the padding may violate the item enum
        let def = definition(json!({"items": {"enum": ["a"]}, "minItems": 2}));
        assert_eq!(
            normalize_list_size(Vec::new(), &def, false),
            vec![PropValue::Null, PropValue::Null]
        );
    }

    #[test]
    fn unique_fill_draws_in_enum_order() {
        let def = definition(json!({"items": {"enum": [1, 2, 3]}, "minItems": 2}));
        assert_eq!(normalize_list_size(Vec::new(), &def, true), list(json!([1, 2])));
        assert_eq!(normalize_list_size(list(json!([2])), &def, true), list(json!([2, 1])));
    }

    #[test]
    fn unique_fill_starts_with_item_default() {
        let def = definition(json!({
            "items": {"enum": [1, 2, 3], "default": 3},
            "minItems": 2,
        }));
        assert_eq!(normalize_list_size(Vec::new(), &def, true), list(json!([3, 1])));
    }

    #[test]
    fn unique_fill_stops_when_pool_is_exhausted() {
        let def = definition(json!({"items": {"enum": [1, 2]}, "minItems": 5}));
        assert_eq!(normalize_list_size(list(json!([2])), &def, true), list(json!([2, 1])));
    }

    #[test]
    fn unique_fill_collapses_existing_duplicates() {
        let def = definition(json!({"items": {"enum": [1, 2, 3]}, "minItems": 3}));
        assert_eq!(
            normalize_list_size(list(json!([1, 1])), &def, true),
            list(json!([1, 2, 3]))
        );
    }

    #[test]
    fn truncates_to_max() {
        let def = definition(json!({"items": {"type": "integer"}, "maxItems": 3}));
        assert_eq!(
            normalize_list_size(list(json!([1, 2, 3, 4, 5])), &def, false),
            list(json!([1, 2, 3]))
        );
    }

    #[test]
    fn pads_before_truncating() {
        let def = definition(json!({
            "enum": ["x"],
            "default": "x",
            "items": {"enum": ["x"]},
            "minItems": 4,
            "maxItems": 2,
        }));
        assert_eq!(normalize_list_size(Vec::new(), &def, false), list(json!(["x", "x"])));
    }
}
