//! Bind command
//!
//! Reads a binding file and prints the normalized props and slots of the
//! component it targets:
//!
//! ```yaml
//! component: mytheme:card
//! props:
//!   heading: { source: token, settings: { value: "[node:title]" } }
//! slots:
//!   body: { source: token, settings: { value: "<p>[node:body]</p>" } }
//! context:
//!   entity: { entity_type: node, id: "1", fields: { title: Hello } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use super::input::read_file;
use super::output::Output;
use crate::domain::PropValue;
use crate::plugin::{
    Binder, ComponentBindings, ContextValue, Contexts, PropTypeRegistry, Services, SourceRegistry,
    ViewRow, ENTITY_CONTEXT, ROWS_CONTEXT,
};
use crate::render::{Entity, MarkupRenderer, TokenReplacer};
use crate::storage::Project;

#[derive(Debug, Deserialize)]
struct BindingFile {
    component: String,

    #[serde(flatten)]
    bindings: ComponentBindings,

    #[serde(default)]
    context: BindingContext,
}

/// Context values a binding file can provide
#[derive(Debug, Default, Deserialize)]
struct BindingContext {
    entity: Option<Entity>,

    /// Pre-rendered view rows
    rows: Option<Vec<serde_json::Value>>,

    /// Any other named value
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
}

impl BindingContext {
    fn into_contexts<'a>(self) -> Contexts<'a> {
        let mut contexts = Contexts::new();
        if let Some(entity) = self.entity {
            contexts.insert(ENTITY_CONTEXT.to_string(), ContextValue::Entity(entity));
        }
        if let Some(rows) = self.rows {
            let rows = rows
                .into_iter()
                .enumerate()
                .map(|(index, output)| ViewRow::new(index, PropValue::from(output)))
                .collect();
            contexts.insert(ROWS_CONTEXT.to_string(), ContextValue::Rows(rows));
        }
        for (name, value) in self.values {
            contexts.insert(name, ContextValue::Value(PropValue::from(value)));
        }
        contexts
    }
}

pub fn run(output: &Output, path: &Path) -> Result<()> {
    let file: BindingFile = read_file(path)?;

    let project = Project::open_current()?;
    let catalog = project.catalog()?;
    let component = catalog.get(&file.component)?;

    let prop_types = PropTypeRegistry::with_builtins();
    let sources = SourceRegistry::with_builtins();
    let renderer = MarkupRenderer::new();
    let tokens = TokenReplacer::new();

    let project_config = &project.config().project;
    let services = Services::new(&renderer, &tokens).with_modules(&project_config.enabled_modules);
    let requirements: Vec<&str> = project_config
        .provided_requirements
        .iter()
        .map(String::as_str)
        .collect();

    let contexts = file.context.into_contexts();
    let bound = Binder::new(&prop_types, &sources, services)
        .with_requirements(&requirements)
        .bind(component, &file.bindings, &contexts)?;

    if output.is_json() {
        output.data(&bound.to_json());
        return Ok(());
    }

    println!("Component: {}", bound.component);
    for (title, entries) in [("Props", &bound.props), ("Slots", &bound.slots)] {
        if entries.is_empty() {
            continue;
        }
        println!();
        println!("{}:", title);
        for (name, value) in entries {
            println!("  {:<20} {}", name, serde_json::to_string(&value.to_json())?);
        }
    }

    let dependencies = &bound.dependencies;
    if !dependencies.is_empty() {
        println!();
        println!("Dependencies:");
        for module in &dependencies.module {
            println!("  module: {}", module);
        }
        for config in &dependencies.config {
            println!("  config: {}", config);
        }
    }

    Ok(())
}
