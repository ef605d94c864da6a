//! Prop definition commands (normalize, options)

use anyhow::Result;

use super::input::{parse_value, read_document};
use super::output::Output;
use crate::domain::{PropDefinition, PropValue};
use crate::normalize::{allowed_values, build_options, default_value, is_required, Normalizer};
use crate::plugin::PropTypeRegistry;
use crate::render::MarkupRenderer;

/// Normalizes a value against a prop definition
pub fn normalize(
    output: &Output,
    definition: &str,
    prop_type: Option<&str>,
    value: &str,
) -> Result<()> {
    let definition: PropDefinition = read_document(definition)?;
    let registry = PropTypeRegistry::with_builtins();
    let prop_type = match prop_type {
        Some(id) => registry.get(id)?,
        None => registry.for_definition(&definition)?,
    };
    tracing::debug!(prop_type = prop_type.id(), "Normalizing value");

    let renderer = MarkupRenderer::new();
    let normalizer = Normalizer::new(&renderer);
    let raw = PropValue::from(parse_value(value));
    let normalized = prop_type.normalize(raw, &definition, &normalizer)?;
    let normalized = prop_type.preprocess(normalized, &definition);

    if output.is_json() {
        output.data(&serde_json::json!({
            "prop_type": prop_type.id(),
            "value": normalized.to_json(),
        }));
    } else {
        println!("{}", serde_json::to_string(&normalized.to_json())?);
    }

    Ok(())
}

/// Shows the enum options of a prop definition
pub fn options(output: &Output, definition: &str) -> Result<()> {
    let definition: PropDefinition = read_document(definition)?;

    // List props keep their options on the items
    let enum_definition = match definition.item_definition() {
        Some(items) if definition.enum_values().is_empty() => items,
        _ => &definition,
    };

    let options = build_options(enum_definition);
    let default = default_value(&definition);
    let required = is_required(&definition);

    if output.is_json() {
        let allowed: Vec<_> = allowed_values(enum_definition)
            .iter()
            .map(PropValue::to_json)
            .collect();
        output.data(&serde_json::json!({
            "options": options
                .iter()
                .map(|o| serde_json::json!({"value": o.value.to_json(), "label": o.label}))
                .collect::<Vec<_>>(),
            "allowed_values": allowed,
            "default": default.to_json(),
            "required": required,
        }));
    } else if options.is_empty() {
        println!("No enum values defined.");
    } else {
        println!("{:<20} LABEL", "VALUE");
        println!("{}", "-".repeat(50));
        for option in &options {
            let value = serde_json::to_string(&option.value.to_json())?;
            println!("{:<20} {}", value, option.label);
        }
        println!();
        println!("Default:  {}", serde_json::to_string(&default.to_json())?);
        println!("Required: {}", if required { "yes" } else { "no" });
    }

    Ok(())
}
