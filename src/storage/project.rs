//! Project management
//!
//! Handles project initialization and gives commands their configuration
//! and component catalog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{ComponentCatalog, Config, PROJECT_CONFIG_FILE};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project already exists at {0}")]
    AlreadyExists(PathBuf),
}

const DEFAULT_PROJECT_CONFIG: &str = r#"# propbind project configuration

# Directories scanned for *.component.yml, relative to this file
component_dirs = ["components"]

# Modules sources may depend on (e.g. "token", "views")
enabled_modules = ["token"]

# Context requirements provided when binding (e.g. "views:style")
provided_requirements = []

[token]
# Remove placeholders that cannot be resolved
clear = true
"#;

/// A propbind project, or the current directory when there is none
pub struct Project {
    root: Option<PathBuf>,
    config: Config,
}

impl Project {
    /// Opens the project at the given root
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::for_project(&root)?;

        Ok(Self {
            root: Some(root),
            config,
        })
    }

    /// Opens the project at the current directory or a parent.
    ///
    /// Outside a project, the default configuration is used.
    pub fn open_current() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self {
            root: config.project_root.clone(),
            config,
        })
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(PROJECT_CONFIG_FILE);

        if config_path.exists() {
            return Err(ProjectError::AlreadyExists(root).into());
        }

        let components_dir = root.join("components");
        fs::create_dir_all(&components_dir).with_context(|| {
            format!(
                "Failed to create components directory: {}",
                components_dir.display()
            )
        })?;

        fs::write(&config_path, DEFAULT_PROJECT_CONFIG)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

        Self::open(root)
    }

    /// Returns the project root, if inside a project
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads all components from the configured directories
    pub fn catalog(&self) -> Result<ComponentCatalog> {
        let mut catalog = ComponentCatalog::new();
        catalog.load_dirs(&self.config.component_dirs())?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_config_and_components_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(dir.path().join(PROJECT_CONFIG_FILE).is_file());
        assert!(dir.path().join("components").is_dir());
        assert_eq!(project.root(), Some(dir.path()));
        assert_eq!(project.config().project.enabled_modules, vec!["token"]);
        assert!(project.config().project.token.clear);
    }

    #[test]
    fn init_twice_fails() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let err = Project::init(dir.path()).err().unwrap();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn catalog_reads_configured_dirs() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        let card_dir = dir.path().join("components/card");
        fs::create_dir_all(&card_dir).unwrap();
        fs::write(card_dir.join("card.component.yml"), "name: Card\n").unwrap();

        let project = Project::open(dir.path()).unwrap();
        let catalog = project.catalog().unwrap();

        // Provider is the directory holding `components`
        let provider = dir.path().file_name().unwrap().to_str().unwrap();
        assert!(catalog.get(&format!("{}:card", provider)).is_ok());
    }
}
