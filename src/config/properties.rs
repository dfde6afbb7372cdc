//! Property schema rendered by the host's settings UI

use super::models::{DELAY_KEY, DELAY_MAX, DELAY_MIN, DELAY_STEP, SCENE_NAME_KEY, SOURCE_NAME_KEY};
use crate::host::SettingsData;
use serde::Serialize;

/// Widget kind of a property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyKind {
    /// Single line text field
    Text {
        /// Default text
        default: String,
    },
    /// Floating point slider
    FloatSlider {
        /// Minimum value
        min: f64,
        /// Maximum value
        max: f64,
        /// Step size
        step: f64,
        /// Default value
        default: f64,
    },
}

/// A single settings property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Settings key
    pub key: String,
    /// Label shown next to the widget
    pub label: String,
    /// Widget kind and range
    pub kind: PropertyKind,
}

/// Ordered list of properties declared to the host
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySchema {
    properties: Vec<Property>,
}

impl PropertySchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn add_text(&mut self, key: &str, label: &str, default: &str) -> &mut Self {
        self.properties.push(Property {
            key: key.to_string(),
            label: label.to_string(),
            kind: PropertyKind::Text {
                default: default.to_string(),
            },
        });
        self
    }

    /// Add a floating point slider
    pub fn add_float_slider(
        &mut self,
        key: &str,
        label: &str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> &mut Self {
        self.properties.push(Property {
            key: key.to_string(),
            label: label.to_string(),
            kind: PropertyKind::FloatSlider {
                min,
                max,
                step,
                default,
            },
        });
        self
    }

    /// Properties in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the schema declares nothing
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by key
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.key == key)
    }

    /// Write every property's default into the settings default layer
    pub fn apply_defaults(&self, settings: &mut SettingsData) {
        for property in &self.properties {
            match &property.kind {
                PropertyKind::Text { default } => {
                    settings.set_default_string(&property.key, default.clone());
                }
                PropertyKind::FloatSlider { default, .. } => {
                    settings.set_default_double(&property.key, *default);
                }
            }
        }
    }
}

/// The cover script's settings: source name, scene name, reveal delay
pub fn cover_properties() -> PropertySchema {
    let mut schema = PropertySchema::new();
    schema
        .add_text(SOURCE_NAME_KEY, "Rust Map Source Name:", "")
        .add_text(SCENE_NAME_KEY, "Rust Scene Name:", "")
        .add_float_slider(
            DELAY_KEY,
            "Reveal Delay (sec):",
            DELAY_MIN,
            DELAY_MAX,
            DELAY_STEP,
            0.0,
        );
    schema
}
