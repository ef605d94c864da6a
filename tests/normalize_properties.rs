//! Property tests for the normalization core
//!
//! Enum membership is preserved, normalization is idempotent and list sizes
//! land inside their bounds.

use proptest::prelude::*;
use propbind::normalize::{normalize_list_size, Normalizer};
use propbind::render::MarkupRenderer;
use propbind::{PropDefinition, PropValue};

fn scalar() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        any::<bool>().prop_map(PropValue::Bool),
        (-1000i64..1000).prop_map(PropValue::Int),
        (-1000.0f64..1000.0).prop_map(PropValue::Float),
        "[a-z0-9. ]{0,8}".prop_map(PropValue::String),
    ]
}

fn value() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        3 => scalar(),
        1 => Just(PropValue::Null),
        1 => prop::collection::vec(scalar(), 0..3).prop_map(PropValue::List),
        1 => "[a-z ]{0,8}".prop_map(|s| PropValue::Markup(format!("<b>{}</b>", s))),
    ]
}

fn enum_values() -> impl Strategy<Value = Vec<PropValue>> {
    prop::collection::vec(scalar(), 1..6)
}

fn list_definition(
    items: &[PropValue],
    min_items: Option<usize>,
    max_items: Option<usize>,
) -> PropDefinition {
    let items: Vec<serde_json::Value> = items.iter().map(PropValue::to_json).collect();
    let mut json = serde_json::json!({
        "type": "array",
        "items": {"enum": items},
    });
    if let Some(min) = min_items {
        json["minItems"] = min.into();
    }
    if let Some(max) = max_items {
        json["maxItems"] = max.into();
    }
    serde_json::from_value(json).unwrap()
}

proptest! {
    #[test]
    fn enum_members_normalize_to_themselves(enum_values in enum_values(), index in any::<prop::sample::Index>()) {
        let renderer = MarkupRenderer::new();
        let normalizer = Normalizer::new(&renderer);
        let member = enum_values[index.index(enum_values.len())].clone();

        let normalized = normalizer.normalize_value(member.clone(), Some(enum_values.as_slice())).unwrap();
        prop_assert_eq!(normalized, member);
    }

    #[test]
    fn normalize_value_is_idempotent(value in value(), enum_values in enum_values(), constrained in any::<bool>()) {
        let renderer = MarkupRenderer::new();
        let normalizer = Normalizer::new(&renderer);
        let allowed = constrained.then_some(enum_values.as_slice());

        let once = normalizer.normalize_value(value, allowed).unwrap();
        let twice = normalizer.normalize_value(once.clone(), allowed).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn normalized_values_are_members_or_null(value in value(), enum_values in enum_values()) {
        let renderer = MarkupRenderer::new();
        let normalizer = Normalizer::new(&renderer);

        let normalized = normalizer.normalize_value(value, Some(enum_values.as_slice())).unwrap();
        prop_assert!(normalized.is_null() || enum_values.contains(&normalized));
    }

    #[test]
    fn list_size_respects_bounds(
        values in prop::collection::vec(scalar(), 0..8),
        items in enum_values(),
        min_items in prop::option::of(0usize..6),
        max_items in prop::option::of(0usize..6),
    ) {
        let definition = list_definition(&items, min_items, max_items);
        let result = normalize_list_size(values.clone(), &definition, false);

        if let Some(max) = max_items {
            prop_assert!(result.len() <= max);
        }
        if let Some(min) = min_items {
            if max_items.map_or(true, |max| max >= min) {
                prop_assert!(result.len() >= min);
            }
        }
        // The prefix of the input is kept
        let kept = result.len().min(values.len());
        prop_assert_eq!(&result[..kept], &values[..kept]);
    }

    #[test]
    fn unique_fill_draws_from_items(items in enum_values(), min_items in 0usize..6) {
        let definition = list_definition(&items, Some(min_items), None);
        let result = normalize_list_size(Vec::new(), &definition, true);

        prop_assert!(result.len() <= min_items);
        for value in &result {
            prop_assert!(items.contains(value));
        }
        for (i, value) in result.iter().enumerate() {
            prop_assert!(!result[..i].contains(value));
        }
    }
}

#[test]
fn null_padding_is_kept_for_lists_without_default() {
    let definition = list_definition(&[PropValue::Int(1)], Some(3), None);
    let result = normalize_list_size(vec![PropValue::Int(1)], &definition, false);
    assert_eq!(result, vec![PropValue::Int(1), PropValue::Null, PropValue::Null]);
}
