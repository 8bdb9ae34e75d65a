use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::LoadError;

/// Top-level color used for `true` cells in the event list.
pub const BOOLEAN_COLOR_TRUE_KEY: &str = "defaultBooleanColorTrue";
/// Top-level color used for `false` cells in the event list.
pub const BOOLEAN_COLOR_FALSE_KEY: &str = "defaultBooleanColorFalse";
/// Nested mapping holding the PDF export settings.
pub const PDF_SETTINGS_KEY: &str = "pdfSettings";

/// Adapter settings object: an ordered mapping from setting name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// Create an empty settings object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a settings object from a JSON payload.
    ///
    /// Fails with [`LoadError::Malformed`] when the payload is not a JSON
    /// object.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LoadError::Malformed {
                message: format!("expected an object, got {}", kind(&other)),
            }),
        }
    }

    /// Return the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the settings and return them as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Return a top-level setting.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Return the value stored at `path`, if every segment resolves.
    pub fn get_path(&self, path: &ConfigPath) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut map = &self.0;
        for key in parents {
            map = map.get(key)?.as_object()?;
        }
        map.get(last)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Store `value` at `path`, creating intermediate mappings as needed.
    ///
    /// Intermediate values that are not mappings are replaced.
    pub(crate) fn set_path(&mut self, path: &ConfigPath, value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut map = &mut self.0;
        for key in parents {
            let entry = map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(inner) = entry else {
                return;
            };
            map = inner;
        }
        map.insert(last.clone(), value);
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Config {
    type Error = LoadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Non-empty key sequence addressing a value inside a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    keys: Vec<String>,
}

impl ConfigPath {
    /// Build a path from keys. Returns `None` for an empty sequence.
    pub fn new<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return None;
        }
        Some(Self { keys })
    }

    /// Parse a dotted attribute name such as `pdfSettings.headerColor`.
    ///
    /// Empty segments are rejected.
    pub fn parse(dotted: &str) -> Option<Self> {
        if dotted.split('.').any(str::is_empty) {
            return None;
        }
        Self::new(dotted.split('.'))
    }

    /// Return the path segments.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn split_last(&self) -> Option<(&String, &[String])> {
        self.keys.split_last()
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys.join("."))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
