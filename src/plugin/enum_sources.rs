//! Select and checkboxes sources
//!
//! Both store the chosen value(s) in the `value` setting and offer the
//! definition's enum options.

use serde_json::json;

use crate::domain::{PropDefinition, PropValue};
use crate::normalize::{allowed_values, build_options, is_required, EnumOption};

use super::source::{
    merge_defaults, SettingField, SettingKind, Settings, Source, SourceContext, SourceDefinition,
    SourceError,
};

/// Single choice among an enum's values
pub struct SelectSource {
    settings: Settings,
}

impl SelectSource {
    pub const DEFINITION: SourceDefinition = SourceDefinition {
        id: "select",
        label: "Select",
        description: "One value picked from a list.",
        prop_types: &["enum"],
        tags: &["widget"],
        context_requirements: &[],
        context_definitions: &[],
    };

    pub fn new(settings: Settings) -> Self {
        Self {
            settings: merge_defaults(Self::defaults(), settings),
        }
    }

    fn defaults() -> Settings {
        let mut defaults = Settings::new();
        defaults.insert("value".to_string(), json!(null));
        defaults
    }

    pub fn boxed(settings: Settings) -> Box<dyn Source> {
        Box::new(Self::new(settings))
    }

    fn value(&self) -> PropValue {
        self.setting("value").cloned().map(PropValue::from).unwrap_or_default()
    }
}

impl Source for SelectSource {
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
        let allowed = allowed_values(enum_definition(cx.definition));
        Ok(cx.normalizer().normalize_value(self.value(), Some(&allowed))?)
    }

    fn settings_summary(&self) -> Vec<String> {
        match self.value() {
            PropValue::Null => Vec::new(),
            value => vec![value.cast_string().unwrap_or_default()],
        }
    }

    fn setting_fields(&self, cx: &SourceContext<'_>) -> Vec<SettingField> {
        let required = is_required(cx.definition) || cx.definition.is_annotated_required();
        let mut field = SettingField::new("value", SettingKind::Select, "Value")
            .value(self.value().to_json())
            .options(build_options(enum_definition(cx.definition)))
            .required(required);
        if !required {
            field = field.empty_option("- None -");
        }
        vec![field]
    }
}

/// Definition holding the enum: the item definition when a select feeds a
/// list prop
fn enum_definition(definition: &PropDefinition) -> &PropDefinition {
    match definition.item_definition() {
        Some(items) if definition.enum_values().is_empty() => items,
        _ => definition,
    }
}

/// Several choices among an enum list's item values
pub struct CheckboxesSource {
    settings: Settings,
}

impl CheckboxesSource {
    pub const DEFINITION: SourceDefinition = SourceDefinition {
        id: "checkboxes",
        label: "Checkboxes",
        description: "Any number of values picked from a list.",
        prop_types: &["enum_list", "enum_set"],
        tags: &["widget"],
        context_requirements: &[],
        context_definitions: &[],
    };

    pub fn new(settings: Settings) -> Self {
        Self {
            settings: merge_defaults(Self::defaults(), settings),
        }
    }

    fn defaults() -> Settings {
        let mut defaults = Settings::new();
        defaults.insert("value".to_string(), json!([]));
        defaults
    }

    pub fn boxed(settings: Settings) -> Box<dyn Source> {
        Box::new(Self::new(settings))
    }

    fn values(&self) -> PropValue {
        self.setting("value").cloned().map(PropValue::from).unwrap_or_default()
    }
}

fn item_options(definition: &PropDefinition) -> Vec<EnumOption> {
    definition
        .item_definition()
        .map(build_options)
        .unwrap_or_default()
}

impl Source for CheckboxesSource {
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
        let allowed: Vec<PropValue> = item_options(cx.definition)
            .into_iter()
            .map(|option| option.value)
            .collect();
        let values = cx.normalizer().normalize_values(self.values(), Some(&allowed))?;
        Ok(PropValue::List(values))
    }

    fn settings_summary(&self) -> Vec<String> {
        match self.values() {
            PropValue::List(items) if !items.is_empty() => vec![items
                .iter()
                .filter_map(PropValue::cast_string)
                .collect::<Vec<_>>()
                .join(", ")],
            _ => Vec::new(),
        }
    }

    fn setting_fields(&self, cx: &SourceContext<'_>) -> Vec<SettingField> {
        vec![
            SettingField::new("value", SettingKind::Checkboxes, "Values")
                .value(self.values().to_json())
                .options(item_options(cx.definition))
                .required(cx.definition.min_items.is_some_and(|min| min > 0)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::source::{Contexts, Services};
    use crate::render::{MarkupRenderer, TokenReplacer};

    fn settings(value: serde_json::Value) -> Settings {
        json!({ "value": value }).as_object().unwrap().clone()
    }

    fn definition(json: serde_json::Value) -> PropDefinition {
        serde_json::from_value(json).unwrap()
    }

    fn run(source: &dyn Source, definition: &PropDefinition) -> PropValue {
        let renderer = MarkupRenderer;
        let tokens = TokenReplacer::new();
        let contexts = Contexts::new();
        let cx = SourceContext::new("enum", definition, Services::new(&renderer, &tokens), &contexts);
        source.prop_value(&cx).unwrap()
    }

    #[test]
    fn select_casts_stored_value_to_enum_type() {
        let def = definition(json!({"enum": [1, 2, 3]}));
        assert_eq!(run(&SelectSource::new(settings(json!("2"))), &def), PropValue::Int(2));
        assert_eq!(run(&SelectSource::new(settings(json!("9"))), &def), PropValue::Null);
        assert_eq!(run(&SelectSource::new(Settings::new()), &def), PropValue::Null);
    }

    #[test]
    fn checkboxes_keep_allowed_values_in_order() {
        let def = definition(json!({"type": "array", "items": {"enum": ["a", "b", "c"]}}));
        let source = CheckboxesSource::new(settings(json!(["c", "x", "a"])));
        assert_eq!(run(&source, &def), PropValue::from(json!(["c", "a"])));
        assert_eq!(run(&CheckboxesSource::new(Settings::new()), &def), PropValue::List(Vec::new()));
    }

    #[test]
    fn select_field_offers_labelled_options() {
        let renderer = MarkupRenderer;
        let tokens = TokenReplacer::new();
        let contexts = Contexts::new();
        let def = definition(json!({"enum": ["sm", "lg"], "meta:enum": {"lg": "Large"}}));
        let cx = SourceContext::new("enum", &def, Services::new(&renderer, &tokens), &contexts);

        let fields = SelectSource::new(Settings::new()).setting_fields(&cx);
        let labels: Vec<_> = fields[0].options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Sm", "Large"]);
        assert!(!fields[0].required);
        assert_eq!(fields[0].empty_option.as_deref(), Some("- None -"));
    }

    #[test]
    fn summaries_show_chosen_values() {
        assert_eq!(SelectSource::new(settings(json!(3))).settings_summary(), vec!["3"]);
        assert!(SelectSource::new(Settings::new()).settings_summary().is_empty());
        assert_eq!(
            CheckboxesSource::new(settings(json!(["a", "b"]))).settings_summary(),
            vec!["a, b"]
        );
    }
}
