//! Plugin listing commands (prop-types, sources)

use anyhow::Result;

use super::output::Output;
use crate::plugin::{PropTypeRegistry, SourceRegistry};
use crate::storage::Project;

/// Lists registered prop types
pub fn prop_types(output: &Output) -> Result<()> {
    let registry = PropTypeRegistry::with_builtins();
    let prop_types = registry.list();

    if output.is_json() {
        let items: Vec<_> = prop_types
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id(),
                    "label": p.label(),
                    "description": p.description(),
                    "default_source": p.default_source_id(),
                    "convertible_from": p.convertible_from(),
                    "schema": p.schema(),
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("{:<12} {:<20} {:<12} CONVERTS FROM", "ID", "LABEL", "SOURCE");
        println!("{}", "-".repeat(70));
        for prop_type in prop_types {
            println!(
                "{:<12} {:<20} {:<12} {}",
                prop_type.id(),
                prop_type.label(),
                prop_type.default_source_id(),
                prop_type.convertible_from().join(", ")
            );
        }
    }

    Ok(())
}

/// Lists registered sources, optionally only those able to feed a prop type
pub fn sources(output: &Output, prop_type: Option<&str>) -> Result<()> {
    let registry = SourceRegistry::with_builtins();

    let definitions = match prop_type {
        Some(id) => {
            let project = Project::open_current()?;
            let provided: Vec<&str> = project
                .config()
                .project
                .provided_requirements
                .iter()
                .map(String::as_str)
                .collect();
            let prop_types = PropTypeRegistry::with_builtins();
            registry.for_prop_type(prop_types.get(id)?, &provided)
        }
        None => registry.list(),
    };

    if output.is_json() {
        output.data(&definitions);
    } else if definitions.is_empty() {
        println!("No sources available.");
    } else {
        println!("{:<12} {:<20} {:<28} REQUIRES", "ID", "LABEL", "PROP TYPES");
        println!("{}", "-".repeat(76));
        for definition in definitions {
            println!(
                "{:<12} {:<20} {:<28} {}",
                definition.id,
                definition.label,
                definition.prop_types.join(", "),
                definition.context_requirements.join(", ")
            );
        }
    }

    Ok(())
}
