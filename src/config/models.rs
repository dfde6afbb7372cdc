//! Configuration data models
//!
//! This module defines the cover settings and the settings keys they are
//! read from.

use crate::host::SettingsData;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings key of the image source covering the map
pub const SOURCE_NAME_KEY: &str = "rust_map_source_name";
/// Settings key of the scene name
pub const SCENE_NAME_KEY: &str = "rust_scene_name";
/// Settings key of the reveal delay in seconds
pub const DELAY_KEY: &str = "rust_map_delay";

/// Lower bound of the reveal delay slider (seconds)
pub const DELAY_MIN: f64 = 0.0;
/// Upper bound of the reveal delay slider (seconds)
pub const DELAY_MAX: f64 = 5.0;
/// Step of the reveal delay slider (seconds)
pub const DELAY_STEP: f64 = 0.1;

/// Settings of the map cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverSettings {
    /// Name of the image source covering the map (empty = no-op)
    pub image_source_name: String,
    /// Scene name; stored but not consulted when toggling
    pub scene_name: String,
    /// Delay before the source is shown again after key release (seconds)
    pub delay_seconds: f64,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            image_source_name: String::new(),
            scene_name: String::new(),
            delay_seconds: 0.0,
        }
    }
}

impl CoverSettings {
    /// Read the three cover keys from a host settings object
    pub fn from_settings(settings: &SettingsData) -> Self {
        Self {
            image_source_name: settings.get_string(SOURCE_NAME_KEY),
            scene_name: settings.get_string(SCENE_NAME_KEY),
            delay_seconds: settings.get_double(DELAY_KEY),
        }
    }

    /// Write the three cover keys into a host settings object
    pub fn write_to(&self, settings: &mut SettingsData) {
        settings.set_string(SOURCE_NAME_KEY, self.image_source_name.clone());
        settings.set_string(SCENE_NAME_KEY, self.scene_name.clone());
        settings.set_double(DELAY_KEY, self.delay_seconds);
    }

    /// Reveal delay as a duration
    ///
    /// Negative and non-finite delays count as zero.
    pub fn reveal_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CoverSettings::default();
        assert!(settings.image_source_name.is_empty());
        assert!(settings.scene_name.is_empty());
        assert_eq!(settings.reveal_delay(), Duration::ZERO);
    }

    #[test]
    fn test_settings_round_trip() {
        let cover = CoverSettings {
            image_source_name: "Cover".to_string(),
            scene_name: "Main".to_string(),
            delay_seconds: 2.5,
        };

        let mut settings = SettingsData::new();
        cover.write_to(&mut settings);

        assert_eq!(settings.get_string(SOURCE_NAME_KEY), "Cover");
        assert_eq!(settings.get_string(SCENE_NAME_KEY), "Main");
        assert!((settings.get_double(DELAY_KEY) - 2.5).abs() < f64::EPSILON);
        assert_eq!(CoverSettings::from_settings(&settings), cover);
    }

    #[test]
    fn test_invalid_delays_count_as_zero() {
        for delay in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let cover = CoverSettings {
                delay_seconds: delay,
                ..CoverSettings::default()
            };
            assert_eq!(cover.reveal_delay(), Duration::ZERO, "delay {delay}");
        }
    }

    #[test]
    fn test_delay_above_slider_range_is_kept() {
        let cover = CoverSettings {
            delay_seconds: 7.5,
            ..CoverSettings::default()
        };
        assert_eq!(cover.reveal_delay(), Duration::from_millis(7500));
    }
}
