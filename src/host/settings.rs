//! Host settings object
//!
//! A JSON-object backed key/value store with a separate defaults layer.
//! Reads fall back to the defaults layer and then to an empty value of the
//! requested type, so a missing key is never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key/value settings handed over by the host
///
/// Only user-set values are serialized; defaults are re-declared by the
/// script on every start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsData {
    values: Map<String, Value>,
    #[serde(skip)]
    defaults: Map<String, Value>,
}

impl SettingsData {
    /// Create an empty settings object
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.values.get(key).or_else(|| self.defaults.get(key))
    }

    /// String value of `key`, or `""`
    pub fn get_string(&self, key: &str) -> String {
        self.lookup(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Floating point value of `key`, or `0.0`
    pub fn get_double(&self, key: &str) -> f64 {
        self.lookup(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Array value of `key`, or an empty array
    pub fn get_array(&self, key: &str) -> Vec<Value> {
        self.lookup(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    /// Set a string value
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// Set a floating point value
    ///
    /// Non-finite values have no JSON representation and clear the key instead.
    pub fn set_double(&mut self, key: &str, value: f64) {
        match serde_json::Number::from_f64(value) {
            Some(number) => {
                self.values.insert(key.to_string(), Value::Number(number));
            }
            None => {
                self.values.remove(key);
            }
        }
    }

    /// Set an array value
    pub fn set_array(&mut self, key: &str, value: Vec<Value>) {
        self.values.insert(key.to_string(), Value::Array(value));
    }

    /// Declare the default string for `key`
    pub fn set_default_string(&mut self, key: &str, value: impl Into<String>) {
        self.defaults
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// Declare the default floating point value for `key`
    pub fn set_default_double(&mut self, key: &str, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.defaults.insert(key.to_string(), Value::Number(number));
        }
    }

    /// Whether the user set `key` explicitly
    pub fn has_user_value(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
