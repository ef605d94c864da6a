//! Token placeholder replacement
//!
//! Placeholders look like `[node:title]`: a token type, then a field name,
//! optionally followed by more `:`-separated keys that walk into nested
//! field values (`[node:author:name]`). Token data maps a token type to the
//! entity providing the values.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::escape_html;

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Token [{token}] resolves to a {found}, expected a scalar")]
    NotScalar { token: String, found: &'static str },
}

/// An entity whose fields can be used as token values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type id, e.g. `node` or `taxonomy_term`
    pub entity_type: String,

    /// Entity id; `None` for entities that were never saved
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.map(str::to_string),
            fields: serde_json::Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns true if the entity was never saved
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Cache tag identifying this entity
    pub fn cache_tag(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(|id| format!("{}:{}", self.entity_type, id))
    }
}

/// Token type -> entity
pub type TokenData = HashMap<String, Entity>;

/// Replacement options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenOptions {
    /// Remove placeholders that cannot be resolved instead of leaving them
    pub clear: bool,
}

impl TokenOptions {
    pub fn clear() -> Self {
        Self { clear: true }
    }
}

/// Markup produced by a replacement, with the cache tags of the entities used
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOutput {
    pub text: String,
    pub cache_tags: Vec<String>,
}

/// Replaces token placeholders in templates
pub trait TokenService {
    /// Replaces placeholders with HTML-escaped values
    fn replace(
        &self,
        text: &str,
        data: &TokenData,
        options: TokenOptions,
    ) -> Result<TokenOutput, TokenError>;

    /// Replaces placeholders with raw values, for plain-text output
    fn replace_plain(
        &self,
        text: &str,
        data: &TokenData,
        options: TokenOptions,
    ) -> Result<String, TokenError>;
}

/// Built-in token service over [`Entity`] fields
#[derive(Debug, Clone)]
pub struct TokenReplacer {
    pattern: Regex,
}

impl Default for TokenReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenReplacer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\[([\w-]+):([^\[\]\s]+)\]").expect("token pattern is valid"),
        }
    }

    /// Lists the placeholders found in a template, in order
    pub fn scan<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    fn run(
        &self,
        text: &str,
        data: &TokenData,
        options: TokenOptions,
        escape: bool,
    ) -> Result<TokenOutput, TokenError> {
        let mut output = TokenOutput::default();
        let mut last = 0;

        for captures in self.pattern.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            output.text.push_str(&text[last..whole.start()]);
            last = whole.end();

            let token_type = &captures[1];
            let path = &captures[2];
            let entity = data.get(token_type);

            match entity.map(|e| Self::resolve(e, path)).transpose() {
                Err(found) => {
                    return Err(TokenError::NotScalar {
                        token: format!("{}:{}", token_type, path),
                        found,
                    })
                }
                Ok(Some(Some(value))) => {
                    if escape {
                        output.text.push_str(&escape_html(&value));
                    } else {
                        output.text.push_str(&value);
                    }
                    if let Some(tag) = entity.and_then(Entity::cache_tag) {
                        if !output.cache_tags.contains(&tag) {
                            output.cache_tags.push(tag);
                        }
                    }
                }
                Ok(_) => {
                    if !options.clear {
                        output.text.push_str(whole.as_str());
                    }
                }
            }
        }

        output.text.push_str(&text[last..]);
        Ok(output)
    }

    /// Resolves a `field[:key...]` path against an entity.
    ///
    /// `Ok(None)` means the path does not exist; `Err` names the kind of the
    /// composite value found where a scalar was expected.
    fn resolve(entity: &Entity, path: &str) -> Result<Option<String>, &'static str> {
        let mut segments = path.split(':');
        let Some(first) = segments.next() else {
            return Ok(None);
        };

        let mut current = match first {
            "id" => return Ok(entity.id.clone()),
            "entity_type" => return Ok(Some(entity.entity_type.clone())),
            field => match entity.fields.get(field) {
                Some(value) => value,
                None => return Ok(None),
            },
        };

        for segment in segments {
            let next = match current {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }

        match current {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s.clone())),
            serde_json::Value::Bool(b) => Ok(Some(if *b { "1" } else { "" }.to_string())),
            serde_json::Value::Number(n) => Ok(Some(n.to_string())),
            serde_json::Value::Array(_) => Err("list"),
            serde_json::Value::Object(_) => Err("map"),
        }
    }
}

impl TokenService for TokenReplacer {
    fn replace(
        &self,
        text: &str,
        data: &TokenData,
        options: TokenOptions,
    ) -> Result<TokenOutput, TokenError> {
        self.run(text, data, options, true)
    }

    fn replace_plain(
        &self,
        text: &str,
        data: &TokenData,
        options: TokenOptions,
    ) -> Result<String, TokenError> {
        self.run(text, data, options, false).map(|output| output.text)
    }
}
