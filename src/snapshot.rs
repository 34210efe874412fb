//! The decoded config file: a flat, case-insensitive key/value view.
//!
//! Every supported format is decoded into `serde_json::Value` so the resolver
//! deals with one value model. Only top-level keys are addressable; nested
//! tables are kept but never coerce into an option.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::BindError;

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    #[cfg(feature = "yaml")]
    Yaml,
}

/// Extensions tried for each search directory, in order.
#[cfg(feature = "yaml")]
pub const EXTENSIONS: &[&str] = &["json", "toml", "yaml", "yml"];
#[cfg(not(feature = "yaml"))]
pub const EXTENSIONS: &[&str] = &["json", "toml"];

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => "YAML",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key/value view of one config file, immutable for a resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    path: Option<PathBuf>,
    entries: HashMap<String, serde_json::Value>,
}

impl Snapshot {
    /// A snapshot with no keys, used when no config file exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode `content` as `format`. `path` is recorded and used in errors.
    ///
    /// The top level must be a table (TOML), object (JSON) or mapping (YAML).
    /// An empty YAML document counts as an empty mapping.
    pub fn parse(content: &str, format: ConfigFormat, path: &Path) -> Result<Self, BindError> {
        let fail = |reason: String| BindError::ConfigParse {
            path: path.to_path_buf(),
            format: format.name(),
            reason,
        };

        let root: serde_json::Value = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| fail(e.to_string()))?,
            ConfigFormat::Toml => toml::from_str::<toml::Table>(content)
                .map(|table| toml_to_json(toml::Value::Table(table)))
                .map_err(|e| fail(e.to_string()))?,
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| fail(e.to_string()))?,
        };

        let map = match root {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(fail(format!(
                    "top level must be a table of keys, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut snapshot = Self::from_entries(map);
        snapshot.path = Some(path.to_path_buf());
        Ok(snapshot)
    }

    /// Decode raw file bytes. Content that is not UTF-8 is a parse error.
    pub fn decode(bytes: &[u8], format: ConfigFormat, path: &Path) -> Result<Self, BindError> {
        let content = std::str::from_utf8(bytes).map_err(|e| BindError::ConfigParse {
            path: path.to_path_buf(),
            format: format.name(),
            reason: format!("file is not valid UTF-8: {e}"),
        })?;
        Self::parse(content, format, path)
    }

    /// Build a snapshot from in-memory pairs. Keys are lowercased; when two
    /// pairs differ only by case, the later one wins. Decoded files hand their
    /// keys over in sorted order, not file order.
    pub fn from_entries<K: AsRef<str>>(
        entries: impl IntoIterator<Item = (K, serde_json::Value)>,
    ) -> Self {
        Self {
            path: None,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v))
                .collect(),
        }
    }

    /// Case-insensitive lookup. Null values count as absent.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries
            .get(&key.to_lowercase())
            .filter(|v| !v.is_null())
    }

    /// The file this snapshot was decoded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// TOML values in the shared JSON model. Datetimes become their RFC 3339 text;
/// non-finite floats become strings since JSON numbers can't hold them.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a table",
    }
}
