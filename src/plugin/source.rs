//! Source interface
//!
//! A source produces the raw value of one prop from its settings and from
//! the contexts the caller provides (the current entity, a view, its rows).
//! Services are injected through [`Services`] rather than looked up.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use crate::domain::{PropDefinition, PropValue};
use crate::normalize::{EnumOption, Normalizer};
use crate::render::{Entity, RenderError, Renderer, TokenError, TokenService};

use super::view_rows::{ViewExecutable, ViewRow};

/// Source settings, as stored with a binding
pub type Settings = serde_json::Map<String, serde_json::Value>;

/// Builds a source from its settings
pub type SourceFactory = fn(Settings) -> Box<dyn Source>;

#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("Context '{0}' is not available")]
    Missing(String),

    #[error("Context '{name}' is not a {expected}")]
    WrongType { name: String, expected: &'static str },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// A context declared by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Static description of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Prop types this source produces values for
    pub prop_types: &'static [&'static str],
    pub tags: &'static [&'static str],
    /// Requirements the caller must provide before the source is offered
    pub context_requirements: &'static [&'static str],
    pub context_definitions: &'static [ContextDefinition],
}

impl SourceDefinition {
    /// Returns true if every context requirement is in `provided`
    pub fn requirements_met(&self, provided: &[&str]) -> bool {
        self.context_requirements
            .iter()
            .all(|requirement| provided.contains(requirement))
    }
}

/// A value made available to sources under a context name
#[derive(Clone)]
pub enum ContextValue<'a> {
    Entity(Entity),
    View(&'a dyn ViewExecutable),
    Rows(Vec<ViewRow>),
    Value(PropValue),
}

impl std::fmt::Debug for ContextValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextValue::Entity(entity) => f.debug_tuple("Entity").field(entity).finish(),
            ContextValue::View(view) => f.debug_tuple("View").field(&view.id()).finish(),
            ContextValue::Rows(rows) => f.debug_tuple("Rows").field(rows).finish(),
            ContextValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Context name -> value
pub type Contexts<'a> = HashMap<String, ContextValue<'a>>;

/// Collaborators available to every source
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub renderer: &'a dyn Renderer,
    pub tokens: &'a dyn TokenService,
    /// Enabled module names
    pub modules: &'a [String],
}

impl<'a> Services<'a> {
    pub fn new(renderer: &'a dyn Renderer, tokens: &'a dyn TokenService) -> Self {
        Self {
            renderer,
            tokens,
            modules: &[],
        }
    }

    pub fn with_modules(mut self, modules: &'a [String]) -> Self {
        self.modules = modules;
        self
    }

    pub fn module_exists(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m == name)
    }
}

/// Everything a source sees when producing a value for one prop
pub struct SourceContext<'a> {
    /// Id of the prop type being fed
    pub prop_type: &'a str,
    pub definition: &'a PropDefinition,
    pub services: Services<'a>,
    contexts: &'a Contexts<'a>,
}

impl<'a> SourceContext<'a> {
    pub fn new(
        prop_type: &'a str,
        definition: &'a PropDefinition,
        services: Services<'a>,
        contexts: &'a Contexts<'a>,
    ) -> Self {
        Self {
            prop_type,
            definition,
            services,
            contexts,
        }
    }

    pub fn context(&self, name: &str) -> Result<&ContextValue<'a>, ContextError> {
        self.contexts
            .get(name)
            .ok_or_else(|| ContextError::Missing(name.to_string()))
    }

    pub fn entity(&self, name: &str) -> Result<&Entity, ContextError> {
        match self.context(name)? {
            ContextValue::Entity(entity) => Ok(entity),
            _ => Err(ContextError::WrongType {
                name: name.to_string(),
                expected: "entity",
            }),
        }
    }

    pub fn view(&self, name: &str) -> Result<&'a dyn ViewExecutable, ContextError> {
        match self.context(name)? {
            ContextValue::View(view) => Ok(*view),
            _ => Err(ContextError::WrongType {
                name: name.to_string(),
                expected: "view",
            }),
        }
    }

    pub fn rows(&self, name: &str) -> Result<&[ViewRow], ContextError> {
        match self.context(name)? {
            ContextValue::Rows(rows) => Ok(rows.as_slice()),
            _ => Err(ContextError::WrongType {
                name: name.to_string(),
                expected: "row list",
            }),
        }
    }

    pub fn normalizer(&self) -> Normalizer<'a> {
        Normalizer::new(self.services.renderer)
    }

    pub fn module_exists(&self, name: &str) -> bool {
        self.services.module_exists(name)
    }
}

/// Kind of form element a setting is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Textfield,
    Select,
    Checkboxes,
}

/// Description of one editable setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingField {
    pub key: String,
    pub kind: SettingKind,
    pub label: String,
    pub value: serde_json::Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnumOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_option: Option<String>,
}

impl SettingField {
    pub fn new(key: impl Into<String>, kind: SettingKind, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            label: label.into(),
            value: serde_json::Value::Null,
            required: false,
            options: Vec::new(),
            empty_option: None,
        }
    }

    pub fn value(mut self, value: serde_json::Value) -> Self {
        self.value = value;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn options(mut self, options: Vec<EnumOption>) -> Self {
        self.options = options;
        self
    }

    pub fn empty_option(mut self, label: impl Into<String>) -> Self {
        self.empty_option = Some(label.into());
        self
    }
}

/// What a configured source depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependencies {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub module: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub config: BTreeSet<String>,
}

impl Dependencies {
    pub fn add_module(&mut self, name: impl Into<String>) {
        self.module.insert(name.into());
    }

    pub fn add_config(&mut self, name: impl Into<String>) {
        self.config.insert(name.into());
    }

    pub fn merge(&mut self, other: Dependencies) {
        self.module.extend(other.module);
        self.config.extend(other.config);
    }

    pub fn is_empty(&self) -> bool {
        self.module.is_empty() && self.config.is_empty()
    }
}

/// A configured source
pub trait Source {
    fn definition(&self) -> &'static SourceDefinition;

    fn id(&self) -> &'static str {
        self.definition().id
    }

    /// Settings used when a key is not configured
    fn default_settings(&self) -> Settings {
        Settings::new()
    }

    /// Settings, with defaults already merged in
    fn settings(&self) -> &Settings;

    fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings().get(key)
    }

    /// Produces the raw prop value
    fn prop_value(&self, cx: &SourceContext<'_>) -> Result<PropValue, SourceError>;

    /// One line per notable setting, for listings
    fn settings_summary(&self) -> Vec<String> {
        Vec::new()
    }

    /// Editable settings for the prop being fed
    fn setting_fields(&self, _cx: &SourceContext<'_>) -> Vec<SettingField> {
        Vec::new()
    }

    fn calculate_dependencies(&self, _cx: &SourceContext<'_>) -> Dependencies {
        Dependencies::default()
    }
}

/// Fills in missing keys from `defaults`
pub fn merge_defaults(defaults: Settings, mut settings: Settings) -> Settings {
    for (key, value) in defaults {
        settings.entry(key).or_insert(value);
    }
    settings
}

/// A non-empty scalar setting, as a string
pub(crate) fn scalar_setting(value: Option<&serde_json::Value>) -> Option<String> {
    let value = PropValue::from(value?.clone());
    if !value.is_scalar() || !value.is_truthy() {
        return None;
    }
    value.cast_string()
}
