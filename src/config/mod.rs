//! Configuration module
//!
//! This module holds the cover settings model, the property schema declared
//! to the host's settings UI, and persistence of the host settings object.
//! Settings are stored in %APPDATA%\MapCover\settings.json with atomic writes
//! to prevent corruption.

pub mod manager;
pub mod models;
pub mod properties;

pub use manager::ConfigManager;
pub use models::{CoverSettings, DELAY_KEY, DELAY_MAX, DELAY_MIN, SCENE_NAME_KEY, SOURCE_NAME_KEY};
pub use properties::{Property, PropertyKind, PropertySchema, cover_properties};
