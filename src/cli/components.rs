//! Component catalog commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::ComponentDefinition;
use crate::plugin::PropTypeRegistry;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum ComponentCommands {
    /// List components, grouped
    List {
        /// Hide components replaced by another component
        #[arg(long)]
        negotiated: bool,

        /// Only show one group
        #[arg(long, short)]
        group: Option<String>,
    },

    /// Show a component's props and slots
    Show {
        /// Component id (provider:name)
        id: String,
    },
}

pub fn run(cmd: ComponentCommands, output: &Output) -> Result<()> {
    match cmd {
        ComponentCommands::List { negotiated, group } => {
            list_components(output, negotiated, group.as_deref())
        }
        ComponentCommands::Show { id } => show_component(output, &id),
    }
}

fn list_components(output: &Output, negotiated: bool, group: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let catalog = project.catalog()?;

    let grouped = if negotiated {
        catalog.negotiated_grouped_definitions()
    } else {
        catalog.grouped_definitions()
    };
    let grouped: Vec<(&str, Vec<&ComponentDefinition>)> = grouped
        .into_iter()
        .filter(|(name, _)| group.map_or(true, |g| g == *name))
        .collect();

    if output.is_json() {
        let items: Vec<_> = grouped
            .iter()
            .flat_map(|(_, definitions)| definitions.iter())
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "name": d.name,
                    "group": d.group,
                    "status": d.status,
                    "replaces": d.replaces,
                })
            })
            .collect();
        output.data(&items);
    } else if grouped.is_empty() {
        println!("No components found.");
        println!();
        println!("Components are discovered from:");
        for dir in project.config().component_dirs() {
            println!("  - {}", dir.display());
        }
    } else {
        for (name, definitions) in grouped {
            println!("{} ({}):", name, definitions.len());
            for definition in definitions {
                println!("  {:<30} {}", definition.id, definition.name);
            }
            println!();
        }
    }

    Ok(())
}

fn show_component(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let catalog = project.catalog()?;
    let component = catalog.get(id)?;
    let prop_types = PropTypeRegistry::with_builtins();

    if output.is_json() {
        output.data(&component.to_json());
        return Ok(());
    }

    println!("Component: {}", component.id);
    println!("Name:      {}", component.name);
    println!("Group:     {}", component.group);
    if let Some(status) = &component.status {
        println!("Status:    {}", status);
    }
    if let Some(replaces) = &component.replaces {
        println!("Replaces:  {}", replaces);
    }
    if let Some(description) = &component.description {
        println!();
        println!("{}", description);
    }

    if !component.props.is_empty() {
        println!();
        println!("Props:");
        println!("  {:<20} {:<12} SUMMARY", "NAME", "TYPE");
        for (name, definition) in &component.props {
            let (type_id, summary) = match prop_types.for_definition(definition) {
                Ok(prop_type) => (prop_type.id(), prop_type.summary(definition).join("; ")),
                Err(e) => ("?", e.to_string()),
            };
            println!("  {:<20} {:<12} {}", name, type_id, summary);
        }
    }

    if !component.slots.is_empty() {
        println!();
        println!("Slots:");
        for (name, slot) in &component.slots {
            println!("  {:<20} {}", name, slot.title.as_deref().unwrap_or(""));
        }
    }

    if !component.variants.is_empty() {
        println!();
        println!("Variants:");
        for (name, variant) in &component.variants {
            println!("  {:<20} {}", name, variant.title.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}
