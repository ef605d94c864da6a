//! Argument parsing helpers shared by commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads a JSON document given inline or as `@path`.
///
/// Files may also be YAML.
pub fn read_document<T: DeserializeOwned>(arg: &str) -> Result<T> {
    match arg.strip_prefix('@') {
        Some(path) => read_file(Path::new(path)),
        None => serde_json::from_str(arg).context("Failed to parse JSON argument"),
    }
}

/// Reads a YAML (or JSON) file
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses a value argument: JSON when it parses, a plain string otherwise
pub fn parse_value(arg: &str) -> serde_json::Value {
    serde_json::from_str(arg).unwrap_or_else(|_| serde_json::Value::String(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn value_falls_back_to_string() {
        assert_eq!(parse_value("2"), json!(2));
        assert_eq!(parse_value("\"2\""), json!("2"));
        assert_eq!(parse_value("[1, \"a\"]"), json!([1, "a"]));
        assert_eq!(parse_value("primary"), json!("primary"));
    }

    #[test]
    fn document_from_file_accepts_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prop.yml");
        fs::write(&path, "type: string\nenum: [a, b]\n").unwrap();

        let value: serde_json::Value = read_document(&format!("@{}", path.display())).unwrap();
        assert_eq!(value, json!({"type": "string", "enum": ["a", "b"]}));
    }

    #[test]
    fn invalid_inline_json_is_an_error() {
        let err = read_document::<serde_json::Value>("{type: ").unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }
}
