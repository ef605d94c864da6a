//! View rows source
//!
//! Feeds a slot with the rows of a view being rendered, either whole or
//! reduced to one field per row.

use serde_json::json;

use crate::domain::{PropValue, RenderFragment};
use crate::render::escape_html;

use super::source::{
    merge_defaults, scalar_setting, ContextDefinition, Dependencies, SettingField, SettingKind,
    Settings, Source, SourceContext, SourceDefinition, SourceError,
};
use crate::normalize::EnumOption;

/// Context holding the executed view
pub const VIEW_CONTEXT: &str = "views:view";

/// Context holding the rendered rows
pub const ROWS_CONTEXT: &str = "views:rows";

/// Requirement a caller provides when it renders a views style
pub const STYLE_REQUIREMENT: &str = "views:style";

const FIELD_SETTING: &str = "views_field";

/// An executed view, as far as sources need it
pub trait ViewExecutable {
    fn id(&self) -> &str;

    /// Field id -> label, `None` when the view does not use fields
    fn field_options(&self) -> Option<Vec<(String, String)>>;

    fn has_style_plugin(&self) -> bool;

    /// Rendered output of one field in one row
    fn field_output(&self, row_index: usize, field: &str) -> Option<PropValue>;

    /// Returns true if the field is excluded from display, or is configured
    /// to hide when empty and `output` is empty
    fn is_field_hidden(&self, field: &str, output: Option<&PropValue>) -> bool;
}

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    /// Row index in the view result, when known
    pub index: Option<usize>,
    pub output: PropValue,
}

impl ViewRow {
    pub fn new(index: usize, output: impl Into<PropValue>) -> Self {
        Self {
            index: Some(index),
            output: output.into(),
        }
    }
}

pub struct ViewRowsSource {
    settings: Settings,
}

impl ViewRowsSource {
    pub const DEFINITION: SourceDefinition = SourceDefinition {
        id: "view_rows",
        label: "View rows",
        description: "Rows of the view being rendered.",
        prop_types: &["slot"],
        tags: &["views"],
        context_requirements: &[STYLE_REQUIREMENT],
        context_definitions: &[
            ContextDefinition {
                name: VIEW_CONTEXT,
                label: "View",
                required: false,
            },
            ContextDefinition {
                name: ROWS_CONTEXT,
                label: "Rows",
                required: true,
            },
        ],
    };

    pub fn new(settings: Settings) -> Self {
        Self {
            settings: merge_defaults(Self::defaults(), settings),
        }
    }

    fn defaults() -> Settings {
        let mut defaults = Settings::new();
        defaults.insert(FIELD_SETTING.to_string(), json!(""));
        defaults
    }

    pub fn boxed(settings: Settings) -> Box<dyn Source> {
        Box::new(Self::new(settings))
    }

    fn field(&self) -> Option<String> {
        scalar_setting(self.setting(FIELD_SETTING))
    }
}

impl Source for ViewRowsSource {
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
        let rows = cx.rows(ROWS_CONTEXT)?;
        let Ok(view) = cx.view(VIEW_CONTEXT) else {
            return Ok(PropValue::List(Vec::new()));
        };
        if rows.is_empty() {
            return Ok(PropValue::List(Vec::new()));
        }

        let field = self.field().filter(|field| {
            view.field_options()
                .is_some_and(|options| options.iter().any(|(id, _)| id == field))
        });
        let Some(field) = field else {
            return Ok(PropValue::List(
                rows.iter().map(|row| render_output(row.output.clone())).collect(),
            ));
        };

        if !view.has_style_plugin() {
            return Ok(PropValue::List(Vec::new()));
        }

        let outputs = rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let output = view.field_output(row.index.unwrap_or(position), &field);
                if view.is_field_hidden(&field, output.as_ref()) {
                    PropValue::List(Vec::new())
                } else {
                    render_output(output.unwrap_or_default())
                }
            })
            .collect();
        Ok(PropValue::List(outputs))
    }

    fn settings_summary(&self) -> Vec<String> {
        match self.field() {
            Some(field) => vec![format!("Field: {}", field)],
            None => vec!["All fields".to_string()],
        }
    }

    fn setting_fields(&self, cx: &SourceContext<'_>) -> Vec<SettingField> {
        let Some(options) = cx.view(VIEW_CONTEXT).ok().and_then(|view| view.field_options()) else {
            return Vec::new();
        };

        let options = options
            .into_iter()
            .map(|(id, label)| EnumOption {
                value: PropValue::String(id),
                label,
            })
            .collect();

        vec![SettingField::new(FIELD_SETTING, SettingKind::Select, "Fields rendered in rows")
            .value(self.setting(FIELD_SETTING).cloned().unwrap_or_default())
            .options(options)
            .empty_option("All")]
    }

    fn calculate_dependencies(&self, cx: &SourceContext<'_>) -> Dependencies {
        let mut dependencies = Dependencies::default();
        if let Ok(view) = cx.view(VIEW_CONTEXT) {
            dependencies.add_module("views");
            dependencies.add_config(format!("views.view.{}", view.id()));
        }
        dependencies
    }
}

/// Turns a row or field output into something a slot renders
fn render_output(output: PropValue) -> PropValue {
    match output {
        PropValue::Null => PropValue::List(Vec::new()),
        PropValue::String(s) | PropValue::Markup(s) => RenderFragment::markup(s).into(),
        scalar @ (PropValue::Bool(_) | PropValue::Int(_) | PropValue::Float(_)) => {
            RenderFragment::markup(escape_html(&scalar.cast_string().unwrap_or_default())).into()
        }
        composite => composite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropDefinition;
    use crate::plugin::source::{ContextError, ContextValue, Contexts, Services};
    use crate::render::{MarkupRenderer, TokenReplacer};

    struct FakeView {
        styled: bool,
        hidden: &'static [&'static str],
    }

    impl ViewExecutable for FakeView {
        fn id(&self) -> &str {
            "frontpage"
        }

        fn field_options(&self) -> Option<Vec<(String, String)>> {
            Some(vec![
                ("title".to_string(), "Title".to_string()),
                ("body".to_string(), "Body".to_string()),
            ])
        }

        fn has_style_plugin(&self) -> bool {
            self.styled
        }

        fn field_output(&self, row_index: usize, field: &str) -> Option<PropValue> {
            if field == "title" && row_index == 1 {
                return None;
            }
            Some(PropValue::Markup(format!("{} {}", field, row_index)))
        }

        fn is_field_hidden(&self, field: &str, output: Option<&PropValue>) -> bool {
            self.hidden.contains(&field) || output.is_none()
        }
    }

    fn settings(field: &str) -> Settings {
        json!({ "views_field": field }).as_object().unwrap().clone()
    }

    fn rows() -> ContextValue<'static> {
        ContextValue::Rows(vec![
            ViewRow::new(0, PropValue::Markup("<li>a</li>".to_string())),
            ViewRow::new(1, PropValue::Markup("<li>b</li>".to_string())),
        ])
    }

    fn run(source: &ViewRowsSource, contexts: &Contexts<'_>) -> Result<PropValue, SourceError> {
        let renderer = MarkupRenderer;
        let tokens = TokenReplacer::new();
        let definition = PropDefinition::default();
        let cx = SourceContext::new("slot", &definition, Services::new(&renderer, &tokens), contexts);
        source.prop_value(&cx)
    }

    #[test]
    fn whole_rows_without_field() {
        let view = FakeView { styled: true, hidden: &[] };
        let mut contexts = Contexts::new();
        contexts.insert(ROWS_CONTEXT.to_string(), rows());
        contexts.insert(VIEW_CONTEXT.to_string(), ContextValue::View(&view));

        let expected = PropValue::List(vec![
            RenderFragment::markup("<li>a</li>").into(),
            RenderFragment::markup("<li>b</li>").into(),
        ]);
        assert_eq!(run(&ViewRowsSource::new(Settings::new()), &contexts).unwrap(), expected);
        // Unknown fields fall back to whole rows
        assert_eq!(run(&ViewRowsSource::new(settings("nope")), &contexts).unwrap(), expected);
    }

    #[test]
    fn no_view_yields_nothing() {
        let mut contexts = Contexts::new();
        contexts.insert(ROWS_CONTEXT.to_string(), rows());

        let value = run(&ViewRowsSource::new(Settings::new()), &contexts).unwrap();
        assert_eq!(value, PropValue::List(Vec::new()));
    }

    #[test]
    fn single_field_blanks_hidden_outputs() {
        let view = FakeView { styled: true, hidden: &[] };
        let mut contexts = Contexts::new();
        contexts.insert(ROWS_CONTEXT.to_string(), rows());
        contexts.insert(VIEW_CONTEXT.to_string(), ContextValue::View(&view));

        let value = run(&ViewRowsSource::new(settings("title")), &contexts).unwrap();
        assert_eq!(
            value,
            PropValue::List(vec![
                RenderFragment::markup("title 0").into(),
                PropValue::List(Vec::new()),
            ])
        );

        let value = run(&ViewRowsSource::new(settings("body")), &contexts).unwrap();
        assert_eq!(
            value,
            PropValue::List(vec![
                RenderFragment::markup("body 0").into(),
                RenderFragment::markup("body 1").into(),
            ])
        );
    }

    #[test]
    fn missing_style_plugin_yields_nothing() {
        let view = FakeView { styled: false, hidden: &[] };
        let mut contexts = Contexts::new();
        contexts.insert(ROWS_CONTEXT.to_string(), rows());
        contexts.insert(VIEW_CONTEXT.to_string(), ContextValue::View(&view));

        assert_eq!(
            run(&ViewRowsSource::new(settings("body")), &contexts).unwrap(),
            PropValue::List(Vec::new())
        );
    }

    #[test]
    fn missing_rows_is_an_error() {
        let contexts = Contexts::new();
        let err = run(&ViewRowsSource::new(Settings::new()), &contexts).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Context(ContextError::Missing(name)) if name == ROWS_CONTEXT
        ));
    }

    #[test]
    fn field_options_and_dependencies_come_from_the_view() {
        let view = FakeView { styled: true, hidden: &[] };
        let renderer = MarkupRenderer;
        let tokens = TokenReplacer::new();
        let definition = PropDefinition::default();
        let mut contexts = Contexts::new();
        contexts.insert(VIEW_CONTEXT.to_string(), ContextValue::View(&view));
        let cx = SourceContext::new("slot", &definition, Services::new(&renderer, &tokens), &contexts);

        let source = ViewRowsSource::new(Settings::new());
        let fields = source.setting_fields(&cx);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].options.len(), 2);
        assert_eq!(fields[0].empty_option.as_deref(), Some("All"));

        let deps = source.calculate_dependencies(&cx);
        assert!(deps.config.contains("views.view.frontpage"));
    }
}
