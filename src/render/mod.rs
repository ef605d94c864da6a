//! # Render Services
//!
//! The normalizer never renders anything itself: when a render fragment has
//! to collapse to a string it asks a [`Renderer`], and token placeholders are
//! resolved by a [`TokenService`]. Both are passed in explicitly.
//!
//! The built-in implementations are deliberately small:
//!
//! | Service | Built-in | Handles |
//! |---------|----------|---------|
//! | [`Renderer`] | [`MarkupRenderer`] | `#markup`, `#plain_text`, `#prefix`/`#suffix`, `#access`, children |
//! | [`TokenService`] | [`TokenReplacer`] | `[type:field]` and `[type:field:sub]` placeholders |

mod token;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::domain::{PropValue, RenderFragment};

pub use token::{Entity, TokenData, TokenError, TokenOptions, TokenOutput, TokenReplacer, TokenService};

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Unsupported render element: {0}")]
    Unsupported(String),

    #[error("Malformed render property '{property}': expected {expected}, got {found}")]
    Malformed {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Turns render fragments into markup
pub trait Renderer {
    fn render(&self, fragment: &RenderFragment) -> Result<String, RenderError>;
}

/// Minimal renderer for fragments built from markup and text
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl MarkupRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_value(&self, value: &PropValue, out: &mut String) -> Result<(), RenderError> {
        match value {
            PropValue::Null => {}
            PropValue::Markup(markup) => out.push_str(markup),
            PropValue::Fragment(fragment) => out.push_str(&self.render(fragment)?),
            PropValue::List(items) => {
                for item in items {
                    self.render_value(item, out)?;
                }
            }
            PropValue::Map(entries) => {
                for (_, item) in entries {
                    self.render_value(item, out)?;
                }
            }
            scalar => {
                if let Some(text) = scalar.cast_string() {
                    out.push_str(&escape_html(&text));
                }
            }
        }
        Ok(())
    }

    fn string_property<'a>(
        fragment: &'a RenderFragment,
        property: &str,
    ) -> Result<Option<&'a str>, RenderError> {
        match fragment.get(property) {
            None | Some(PropValue::Null) => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or(RenderError::Malformed {
                property: property.to_string(),
                expected: "string",
                found: value.kind(),
            }),
        }
    }
}

impl Renderer for MarkupRenderer {
    fn render(&self, fragment: &RenderFragment) -> Result<String, RenderError> {
        if let Some(access) = fragment.get("#access") {
            if !access.is_truthy() {
                return Ok(String::new());
            }
        }

        for property in ["#theme", "#type"] {
            if let Some(value) = fragment.get(property) {
                return Err(RenderError::Unsupported(format!(
                    "{} {}",
                    property,
                    value.cast_string().unwrap_or_else(|| value.kind().to_string())
                )));
            }
        }

        let mut out = String::new();
        if let Some(prefix) = Self::string_property(fragment, "#prefix")? {
            out.push_str(prefix);
        }
        if let Some(markup) = Self::string_property(fragment, "#markup")? {
            out.push_str(markup);
        }
        if let Some(text) = Self::string_property(fragment, "#plain_text")? {
            out.push_str(&escape_html(text));
        }
        for (_, child) in fragment.children() {
            self.render_value(child, &mut out)?;
        }
        if let Some(suffix) = Self::string_property(fragment, "#suffix")? {
            out.push_str(suffix);
        }

        Ok(out)
    }
}

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("tag pattern is valid")
});

/// Removes HTML comments and tags, keeping their text content
pub fn strip_tags(markup: &str) -> String {
    TAG_PATTERN.replace_all(markup, "").into_owned()
}

/// Escapes text for safe inclusion in markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: serde_json::Value) -> RenderFragment {
        match PropValue::from(value) {
            PropValue::Fragment(f) => f,
            other => panic!("expected fragment, got {:?}", other),
        }
    }

    #[test]
    fn renders_markup_and_plain_text() {
        let renderer = MarkupRenderer::new();

        let out = renderer
            .render(&fragment(json!({"#markup": "<b>bold</b>"})))
            .unwrap();
        assert_eq!(out, "<b>bold</b>");

        let out = renderer
            .render(&fragment(json!({"#plain_text": "a < b"})))
            .unwrap();
        assert_eq!(out, "a &lt; b");
    }

    #[test]
    fn renders_children_in_order_with_prefix_and_suffix() {
        let renderer = MarkupRenderer::new();
        let out = renderer
            .render(&fragment(json!({
                "#prefix": "<ul>",
                "#suffix": "</ul>",
                "first": {"#markup": "<li>1</li>"},
                "second": {"#markup": "<li>2</li>"},
            })))
            .unwrap();
        assert_eq!(out, "<ul><li>1</li><li>2</li></ul>");
    }

    #[test]
    fn access_false_renders_nothing() {
        let renderer = MarkupRenderer::new();
        let out = renderer
            .render(&fragment(json!({"#markup": "secret", "#access": false})))
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn theme_is_unsupported() {
        let renderer = MarkupRenderer::new();
        let err = renderer
            .render(&fragment(json!({"#theme": "item_list"})))
            .unwrap_err();
        assert_eq!(err, RenderError::Unsupported("#theme item_list".to_string()));
    }

    #[test]
    fn non_string_markup_is_malformed() {
        let renderer = MarkupRenderer::new();
        let err = renderer
            .render(&fragment(json!({"#markup": ["a"]})))
            .unwrap_err();
        assert!(matches!(err, RenderError::Malformed { ref property, .. } if property == "#markup"));
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p><!-- note -->"), "Hello world");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn escape_html_escapes_specials() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;");
    }
}
