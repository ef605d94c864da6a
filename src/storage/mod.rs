//! # Storage Layer
//!
//! File-backed inputs for propbind.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Components | YAML | `<provider>/components/**/<name>.component.yml` |
//! | Project config | TOML | `propbind.toml` (nearest ancestor directory) |
//! | Global config | TOML | `~/.config/propbind/config.toml` |
//!
//! ## Project Structure
//!
//! ```text
//! project/
//! ├── propbind.toml              # component_dirs, enabled_modules, [token]
//! └── mytheme/
//!     └── components/
//!         └── card/
//!             └── card.component.yml   # id: mytheme:card
//! ```
//!
//! ## Key Types
//!
//! - [`ComponentCatalog`] - Discovers and queries component definitions
//! - [`Config`] - Project and global configuration
//! - [`Project`] - Opens or initializes a project

mod catalog;
mod config;
mod project;

pub use catalog::{load_file, AlterHook, CatalogError, ComponentCatalog, COMPONENT_SUFFIX};
pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, TokenConfig,
    PROJECT_CONFIG_FILE,
};
pub use project::{Project, ProjectError};
