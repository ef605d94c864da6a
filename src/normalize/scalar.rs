//! Scalar coercion
//!
//! Collapses markup, fragments and composites down to a single scalar.

use crate::domain::{PropValue, RenderFragment};
use crate::render::{self, RenderError};

use super::Normalizer;

/// Nesting depth `coerce_to_string` allows when it falls back to JSON
const STRING_JSON_DEPTH: usize = 3;

impl Normalizer<'_> {
    /// Downcasts a value to a scalar.
    ///
    /// - markup becomes its string
    /// - a fragment with render properties is rendered, optionally without tags
    /// - other composites collapse to their first non-null member, recursively
    /// - empty composites become null
    ///
    /// Scalars and null are returned unchanged.
    pub fn coerce_to_scalar(
        &self,
        value: PropValue,
        strip_tags: bool,
    ) -> Result<PropValue, RenderError> {
        match value {
            PropValue::Markup(markup) => Ok(PropValue::String(markup)),
            PropValue::Fragment(fragment) => self.coerce_fragment(fragment, strip_tags),
            PropValue::List(items) => self.coerce_members(items, strip_tags),
            PropValue::Map(entries) => {
                self.coerce_members(entries.into_iter().map(|(_, v)| v), strip_tags)
            }
            scalar => Ok(scalar),
        }
    }

    /// Converts a value to a string.
    ///
    /// Null is the empty string. Tags are kept. A value that is still a
    /// composite after scalar coercion is encoded as JSON, empty if it nests
    /// deeper than three levels.
    pub fn coerce_to_string(&self, value: PropValue) -> Result<String, RenderError> {
        if value.is_null() {
            return Ok(String::new());
        }

        Ok(match self.coerce_to_scalar(value, false)? {
            PropValue::Null => String::new(),
            PropValue::String(s) | PropValue::Markup(s) => s,
            scalar @ (PropValue::Bool(_) | PropValue::Int(_) | PropValue::Float(_)) => {
                scalar.cast_string().unwrap_or_default()
            }
            composite => encode_json_bounded(&composite, STRING_JSON_DEPTH),
        })
    }

    fn coerce_fragment(
        &self,
        fragment: RenderFragment,
        strip_tags: bool,
    ) -> Result<PropValue, RenderError> {
        if fragment.is_empty() {
            return Ok(PropValue::Null);
        }

        if fragment.properties().next().is_none() {
            return self.coerce_members(
                fragment.into_entries().into_iter().map(|(_, v)| v),
                strip_tags,
            );
        }

        let rendered = self.renderer().render(&fragment)?;
        Ok(PropValue::String(if strip_tags {
            render::strip_tags(&rendered)
        } else {
            rendered
        }))
    }

    fn coerce_members(
        &self,
        members: impl IntoIterator<Item = PropValue>,
        strip_tags: bool,
    ) -> Result<PropValue, RenderError> {
        for member in members {
            if member.is_null() {
                continue;
            }
            return self.coerce_to_scalar(member, strip_tags);
        }
        Ok(PropValue::Null)
    }
}

/// Encodes a value as JSON, or returns an empty string when it nests deeper
/// than `depth` levels
pub fn encode_json_bounded(value: &PropValue, depth: usize) -> String {
    if nesting(value) > depth {
        return String::new();
    }
    serde_json::to_string(&value.to_json()).unwrap_or_default()
}

fn nesting(value: &PropValue) -> usize {
    match value {
        PropValue::List(items) => 1 + items.iter().map(nesting).max().unwrap_or(0),
        PropValue::Map(entries) => 1 + entries.iter().map(|(_, v)| nesting(v)).max().unwrap_or(0),
        PropValue::Fragment(fragment) => {
            1 + fragment
                .entries()
                .iter()
                .map(|(_, v)| nesting(v))
                .max()
                .unwrap_or(0)
        }
        _ => 0,
    }
}
