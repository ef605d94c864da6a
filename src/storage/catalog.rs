//! Component catalog
//!
//! Discovers `*.component.yml` files under the configured directories. A
//! component's machine name is the file name without `.component.yml`; its
//! provider is the directory holding the scanned folder (`mytheme` for
//! `mytheme/components`) unless the file sets `provider`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::{ComponentDefinition, ComponentError, ComponentFile};

/// File name suffix of component definitions
pub const COMPONENT_SUFFIX: &str = ".component.yml";

const FALLBACK_PROVIDER: &str = "propbind";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Component not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid component {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ComponentError,
    },
}

/// Hook run on every definition after discovery
pub type AlterHook = Box<dyn Fn(&mut ComponentDefinition) + Send + Sync>;

/// Loaded component definitions, keyed by id
#[derive(Default)]
pub struct ComponentCatalog {
    definitions: BTreeMap<String, ComponentDefinition>,
    alters: Vec<AlterHook>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook applied to definitions loaded afterwards
    pub fn add_alter(&mut self, hook: impl Fn(&mut ComponentDefinition) + Send + Sync + 'static) {
        self.alters.push(Box::new(hook));
    }

    /// Scans directories for component files.
    ///
    /// Missing directories are skipped. Files that cannot be read or parsed
    /// are skipped with a warning. Returns the number of components loaded.
    pub fn load_dirs(&mut self, dirs: &[PathBuf]) -> Result<usize> {
        let mut loaded = Vec::new();

        for dir in dirs {
            if !dir.is_dir() {
                tracing::debug!(dir = %dir.display(), "Component directory does not exist");
                continue;
            }

            let provider = provider_for(dir);
            let mut files = Vec::new();
            collect_component_files(dir, &mut files)?;
            files.sort();

            for path in files {
                match load_file(&path, &provider) {
                    Ok(definition) => loaded.push(definition),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping component"),
                }
            }
        }

        let count = loaded.len();
        for mut definition in loaded {
            for alter in &self.alters {
                alter(&mut definition);
            }
            if let Some(previous) = self.definitions.insert(definition.id.clone(), definition) {
                tracing::warn!(id = %previous.id, "Duplicate component id, keeping the last one");
            }
        }

        tracing::info!(count, dirs = dirs.len(), "Loaded components");
        Ok(count)
    }

    /// Adds a definition directly, running the alter hooks
    pub fn insert(&mut self, mut definition: ComponentDefinition) {
        for alter in &self.alters {
            alter(&mut definition);
        }
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Result<&ComponentDefinition, CatalogError> {
        self.definitions
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Distinct groups, sorted
    pub fn categories(&self) -> Vec<&str> {
        let groups: BTreeSet<&str> = self.definitions.values().map(|d| d.group.as_str()).collect();
        groups.into_iter().collect()
    }

    /// All definitions, sorted by group then name
    pub fn sorted_definitions(&self) -> Vec<&ComponentDefinition> {
        sort(self.definitions.values().collect())
    }

    /// Sorted definitions by group
    pub fn grouped_definitions(&self) -> BTreeMap<&str, Vec<&ComponentDefinition>> {
        group(self.sorted_definitions())
    }

    /// Sorted definitions, without components replaced by another one
    pub fn negotiated_sorted_definitions(&self) -> Vec<&ComponentDefinition> {
        let replaced: BTreeSet<&str> = self
            .definitions
            .values()
            .filter_map(|d| d.replaces.as_deref())
            .collect();

        sort(
            self.definitions
                .values()
                .filter(|d| !replaced.contains(d.id.as_str()))
                .collect(),
        )
    }

    pub fn negotiated_grouped_definitions(&self) -> BTreeMap<&str, Vec<&ComponentDefinition>> {
        group(self.negotiated_sorted_definitions())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Parses one component file
pub fn load_file(path: &Path, provider: &str) -> Result<ComponentDefinition, CatalogError> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let file: ComponentFile = serde_yaml::from_str(&content).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let machine_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(COMPONENT_SUFFIX))
        .unwrap_or_default();

    ComponentDefinition::from_file(provider, machine_name, file).map_err(|source| {
        CatalogError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn provider_for(dir: &Path) -> String {
    dir.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or(FALLBACK_PROVIDER)
        .to_string()
}

fn collect_component_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.is_dir() {
            collect_component_files(&path, files)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(COMPONENT_SUFFIX) && n.len() > COMPONENT_SUFFIX.len())
        {
            files.push(path);
        }
    }
    Ok(())
}

fn sort(mut definitions: Vec<&ComponentDefinition>) -> Vec<&ComponentDefinition> {
    definitions.sort_by(|a, b| {
        a.group
            .cmp(&b.group)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    definitions
}

fn group(definitions: Vec<&ComponentDefinition>) -> BTreeMap<&str, Vec<&ComponentDefinition>> {
    let mut grouped: BTreeMap<&str, Vec<&ComponentDefinition>> = BTreeMap::new();
    for definition in definitions {
        grouped
            .entry(definition.group.as_str())
            .or_default()
            .push(definition);
    }
    grouped
}
