//! Runtime prop values
//!
//! Whatever a source produces (a token replacement, a view row, a plain
//! setting) is resolved once, at the boundary, into a [`PropValue`].
//! Everything downstream pattern-matches on the variant instead of probing
//! the value for capabilities.
//!
//! Equality is strict: `Int(1)`, `Float(1.0)` and `String("1")` are three
//! different values. Enum membership relies on that.

use serde::{Deserialize, Serialize};

/// Ordered key/value entries of a composite value
pub type Entries = Vec<(String, PropValue)>;

/// A render fragment: a composite structure carrying `#`-prefixed render
/// properties (`#markup`, `#plain_text`, `#cache`, ...) next to optional
/// children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFragment {
    entries: Entries,
}

impl RenderFragment {
    /// Creates an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fragment from ordered entries
    pub fn from_entries(entries: Entries) -> Self {
        Self { entries }
    }

    /// Fragment wrapping already-safe markup
    pub fn markup(markup: impl Into<String>) -> Self {
        Self::new().with("#markup", PropValue::Markup(markup.into()))
    }

    /// Fragment wrapping text that must be escaped when rendered
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new().with("#plain_text", PropValue::String(text.into()))
    }

    /// Returns true if the key names a render property rather than a child
    pub fn is_property(key: &str) -> bool {
        key.starts_with('#')
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces an entry, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: PropValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Looks up an entry by key
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Render properties, in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries
            .iter()
            .filter(|(k, _)| Self::is_property(k))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Child elements, in declaration order
    pub fn children(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries
            .iter()
            .filter(|(k, _)| !Self::is_property(k))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// All entries
    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn into_entries(self) -> Entries {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A value flowing from a source into a component prop
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Already-rendered markup (or any value with a string form)
    Markup(String),
    /// A structure the render service knows how to turn into markup
    Fragment(RenderFragment),
    /// A plain list
    List(Vec<PropValue>),
    /// A keyed composite without render properties
    Map(Entries),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    /// Scalars are the only values enum coercion will cast
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            PropValue::Bool(_) | PropValue::Int(_) | PropValue::Float(_) | PropValue::String(_)
        )
    }

    /// Returns the string slice of a string or markup value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) | PropValue::Markup(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::String(_) => "string",
            PropValue::Markup(_) => "markup",
            PropValue::Fragment(_) => "fragment",
            PropValue::List(_) => "list",
            PropValue::Map(_) => "map",
        }
    }

    /// String cast of a scalar: `true` is `"1"`, `false` is `""`, numbers use
    /// their shortest display form. `None` for non-scalars.
    pub fn cast_string(&self) -> Option<String> {
        match self {
            PropValue::Bool(true) => Some("1".to_string()),
            PropValue::Bool(false) => Some(String::new()),
            PropValue::Int(i) => Some(i.to_string()),
            PropValue::Float(f) => Some(f.to_string()),
            PropValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Lenient integer cast of a scalar. Strings use their leading numeric
    /// prefix and cast to `0` when there is none; floats truncate.
    pub fn cast_int(&self) -> Option<i64> {
        match self {
            PropValue::Bool(b) => Some(i64::from(*b)),
            PropValue::Int(i) => Some(*i),
            PropValue::Float(f) => Some(*f as i64),
            PropValue::String(s) => Some(match numeric_prefix(s) {
                Some((prefix, true)) => prefix
                    .parse::<i64>()
                    .unwrap_or_else(|_| prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0)),
                Some((prefix, false)) => prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0),
                None => 0,
            }),
            _ => None,
        }
    }

    /// Lenient float cast of a scalar, same prefix rules as [`Self::cast_int`]
    pub fn cast_float(&self) -> Option<f64> {
        match self {
            PropValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            PropValue::Int(i) => Some(*i as f64),
            PropValue::Float(f) => Some(*f),
            PropValue::String(s) => Some(
                numeric_prefix(s)
                    .and_then(|(prefix, _)| prefix.parse::<f64>().ok())
                    .unwrap_or(0.0),
            ),
            _ => None,
        }
    }

    /// Loose truthiness: null, `false`, zero, `""`, `"0"` and empty
    /// composites are false
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Int(i) => *i != 0,
            PropValue::Float(f) => *f != 0.0,
            PropValue::String(s) | PropValue::Markup(s) => !(s.is_empty() || s == "0"),
            PropValue::Fragment(f) => !f.is_empty(),
            PropValue::List(items) => !items.is_empty(),
            PropValue::Map(entries) => !entries.is_empty(),
        }
    }

    /// Converts to a JSON value. Markup becomes a string, fragments become
    /// objects, non-finite floats become null.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            PropValue::Null => Value::Null,
            PropValue::Bool(b) => Value::Bool(*b),
            PropValue::Int(i) => Value::from(*i),
            PropValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropValue::String(s) | PropValue::Markup(s) => Value::String(s.clone()),
            PropValue::Fragment(fragment) => entries_to_json(fragment.entries()),
            PropValue::List(items) => Value::Array(items.iter().map(PropValue::to_json).collect()),
            PropValue::Map(entries) => entries_to_json(entries),
        }
    }
}

fn entries_to_json(entries: &Entries) -> serde_json::Value {
    serde_json::Value::Object(
        entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

/// Finds the leading numeric prefix of a string, after leading whitespace.
///
/// Returns the prefix and whether it is integral (no fraction or exponent).
fn numeric_prefix(s: &str) -> Option<(&str, bool)> {
    let t = s.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = t.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i = 1;
    }

    let int_end = digits_from(i);
    let int_digits = int_end - i;
    i = int_end;
    let mut integral = true;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        let frac_digits = frac_end - (i + 1);
        if int_digits + frac_digits > 0 {
            i = frac_end;
            integral = false;
        }
    }

    if int_digits == 0 && integral {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
            integral = false;
        }
    }

    Some((&t[..i], integral))
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => PropValue::Null,
            Value::Bool(b) => PropValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropValue::Int(i),
                None => PropValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => PropValue::String(s),
            Value::Array(items) => PropValue::List(items.into_iter().map(PropValue::from).collect()),
            Value::Object(map) => {
                let is_fragment = map.keys().any(|k| RenderFragment::is_property(k));
                let entries: Entries = map.into_iter().map(|(k, v)| (k, PropValue::from(v))).collect();
                if is_fragment {
                    PropValue::Fragment(RenderFragment::from_entries(entries))
                } else {
                    PropValue::Map(entries)
                }
            }
        }
    }
}

impl From<PropValue> for serde_json::Value {
    fn from(value: PropValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(value: Vec<PropValue>) -> Self {
        PropValue::List(value)
    }
}

impl From<RenderFragment> for PropValue {
    fn from(value: RenderFragment) -> Self {
        PropValue::Fragment(value)
    }
}
