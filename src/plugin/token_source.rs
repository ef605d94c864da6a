//! Token source
//!
//! A text template whose `[type:field]` placeholders are replaced with
//! values from the `entity` context.

use serde_json::json;

use crate::domain::{PropValue, RenderFragment};
use crate::render::{escape_html, Entity, TokenData, TokenOptions};

use super::source::{
    merge_defaults, scalar_setting, ContextDefinition, Dependencies, SettingField, SettingKind,
    Settings, Source, SourceContext, SourceDefinition, SourceError,
};

pub const ENTITY_CONTEXT: &str = "entity";

const TOKEN_MODULE: &str = "token";

pub struct TokenSource {
    settings: Settings,
}

impl TokenSource {
    pub const DEFINITION: SourceDefinition = SourceDefinition {
        id: "token",
        label: "Token",
        description: "Text with placeholder variables, replaced before display.",
        prop_types: &["slot", "string", "url"],
        tags: &[],
        context_requirements: &[],
        context_definitions: &[ContextDefinition {
            name: ENTITY_CONTEXT,
            label: "Entity",
            required: false,
        }],
    };

    pub fn new(settings: Settings) -> Self {
        Self {
            settings: merge_defaults(Self::defaults(), settings),
        }
    }

    fn defaults() -> Settings {
        let mut defaults = Settings::new();
        defaults.insert("value".to_string(), json!(""));
        defaults
    }

    pub fn boxed(settings: Settings) -> Box<dyn Source> {
        Box::new(Self::new(settings))
    }

    fn template(&self) -> Option<String> {
        scalar_setting(self.setting("value"))
    }
}

/// Token type for an entity: `taxonomy_` prefixes are dropped
pub fn token_type(entity: &Entity) -> &str {
    entity
        .entity_type
        .strip_prefix("taxonomy_")
        .unwrap_or(entity.entity_type.as_str())
}

fn token_data(cx: &SourceContext<'_>) -> TokenData {
    match cx.entity(ENTITY_CONTEXT) {
        Ok(entity) => TokenData::from([(token_type(entity).to_string(), entity.clone())]),
        Err(e) => {
            tracing::debug!(error = %e, "No token data");
            TokenData::new()
        }
    }
}

impl Source for TokenSource {
    fn definition(&self) -> &'static SourceDefinition {
        &Self::DEFINITION
    }

    fn default_settings(&self) -> Settings {
        Self::defaults()
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn prop_value(&self, cx: &SourceContext<'_>) -> Result<PropValue, SourceError> {
        let is_slot = cx.prop_type == "slot";
        let empty = || {
            if is_slot {
                PropValue::List(Vec::new())
            } else {
                PropValue::String(String::new())
            }
        };

        let data = token_data(cx);
        // Unsaved entities only show up in previews
        if data.values().any(Entity::is_new) {
            tracing::debug!("Skipping token replacement for an unsaved entity");
            return Ok(empty());
        }

        let Some(template) = self.template() else {
            return Ok(empty());
        };

        let tokens = cx.services.tokens;
        if is_slot {
            let output = tokens.replace(&template, &data, TokenOptions::clear())?;
            let mut fragment = RenderFragment::markup(output.text);
            if !output.cache_tags.is_empty() {
                let tags = output.cache_tags.into_iter().map(PropValue::String).collect();
                fragment.insert(
                    "#cache",
                    PropValue::Map(vec![("tags".to_string(), PropValue::List(tags))]),
                );
            }
            return Ok(fragment.into());
        }

        let text = tokens.replace_plain(&template, &data, TokenOptions::clear())?;
        Ok(PropValue::String(escape_html(&text)))
    }

    fn settings_summary(&self) -> Vec<String> {
        self.template().into_iter().collect()
    }

    fn setting_fields(&self, cx: &SourceContext<'_>) -> Vec<SettingField> {
        vec![SettingField::new("value", SettingKind::Textfield, "Value")
            .value(self.setting("value").cloned().unwrap_or_default())
            .required(cx.definition.is_annotated_required())]
    }

    fn calculate_dependencies(&self, cx: &SourceContext<'_>) -> Dependencies {
        let mut dependencies = Dependencies::default();
        if cx.module_exists(TOKEN_MODULE) {
            dependencies.add_module(TOKEN_MODULE);
        }
        dependencies
    }
}
