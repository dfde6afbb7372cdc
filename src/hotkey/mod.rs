//! Hotkey binding module
//!
//! The cover is driven by a single push-to-hide hotkey action registered
//! with the host. The host owns key capture and dispatch; this module only
//! registers the action once, restores the user's key combinations from the
//! settings object and writes them back when the host saves.
//!
//! Saved combinations are stored as a JSON array under the action name:
//!
//! ```text
//! "RustMap_Push_to_Hide": [{"key": "OBS_KEY_M", "shift": false, ...}]
//! ```

pub mod binding;

pub use binding::{HOTKEY_DESCRIPTION, HOTKEY_NAME, HotkeyBinding};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of host key names
const KEY_PREFIX: &str = "OBS_KEY_";

/// A key with its modifier state, as saved by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombo {
    /// Host key name (e.g. `OBS_KEY_M`)
    pub key: String,
    /// Shift held
    #[serde(default)]
    pub shift: bool,
    /// Control held
    #[serde(default)]
    pub control: bool,
    /// Alt held
    #[serde(default)]
    pub alt: bool,
    /// Command / Super held
    #[serde(default)]
    pub command: bool,
}

impl KeyCombo {
    /// A bare key without modifiers
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
            control: false,
            alt: false,
            command: false,
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.control {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.command {
            f.write_str("Super+")?;
        }
        f.write_str(self.key.strip_prefix(KEY_PREFIX).unwrap_or(self.key.as_str()))
    }
}

/// Failure to parse a key combination like `ctrl+shift+m`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyComboParseError {
    /// No key given
    #[error("empty key combination")]
    Empty,
    /// A modifier position held something else
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
}

impl FromStr for KeyCombo {
    type Err = KeyComboParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts
            .pop()
            .filter(|key| !key.is_empty())
            .ok_or(KeyComboParseError::Empty)?;

        let key = if key.starts_with(KEY_PREFIX) {
            key.to_string()
        } else {
            format!("{KEY_PREFIX}{}", key.to_ascii_uppercase())
        };
        let mut combo = Self::new(key);

        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combo.control = true,
                "shift" => combo.shift = true,
                "alt" => combo.alt = true,
                "super" | "cmd" | "command" => combo.command = true,
                _ => return Err(KeyComboParseError::UnknownModifier(modifier.to_string())),
            }
        }

        Ok(combo)
    }
}
