//! Registration and persistence of the push-to-hide hotkey

use super::KeyCombo;
use crate::error::{MapCoverError, Result};
use crate::host::{Host, HotkeyCallback, HotkeyId, SettingsData};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Action name; also the settings key holding the saved combinations
pub const HOTKEY_NAME: &str = "RustMap_Push_to_Hide";

/// Label shown in the host's hotkey settings
pub const HOTKEY_DESCRIPTION: &str = "RustMap Push to Hide";

/// A hotkey action registered with the host
#[derive(Debug)]
pub struct HotkeyBinding {
    id: HotkeyId,
    name: String,
}

impl HotkeyBinding {
    /// Register the action and restore its saved key combinations
    pub fn register(
        host: &dyn Host,
        settings: &SettingsData,
        name: &str,
        description: &str,
        callback: HotkeyCallback,
    ) -> Self {
        let saved = decode_saved(settings, name);
        let id = host.register_hotkey(name, description, callback);
        host.load_hotkey(id, &saved);
        info!(
            "Registered hotkey '{}' with {} saved binding(s)",
            name,
            saved.len()
        );
        Self {
            id,
            name: name.to_string(),
        }
    }

    /// Host handle of the action
    pub fn id(&self) -> HotkeyId {
        self.id
    }

    /// Action name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reload saved key combinations into the existing action
    pub fn restore(&self, host: &dyn Host, settings: &SettingsData) {
        let saved = decode_saved(settings, &self.name);
        debug!(
            "Restoring {} binding(s) for hotkey '{}'",
            saved.len(),
            self.name
        );
        host.load_hotkey(self.id, &saved);
    }

    /// Write the action's current key combinations into `settings`
    pub fn save(&self, host: &dyn Host, settings: &mut SettingsData) -> Result<()> {
        let combos = host.save_hotkey(self.id);
        let values = combos
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Saving {} binding(s) for hotkey '{}'", values.len(), self.name);
        settings.set_array(&self.name, values);
        Ok(())
    }
}

/// Decode one saved entry
pub fn decode_combo(name: &str, value: Value) -> Result<KeyCombo> {
    serde_json::from_value(value).map_err(|source| MapCoverError::InvalidHotkeyData {
        name: name.to_string(),
        source,
    })
}

/// Decode the saved array under `name`, skipping unreadable entries
fn decode_saved(settings: &SettingsData, name: &str) -> Vec<KeyCombo> {
    settings
        .get_array(name)
        .into_iter()
        .filter_map(|value| match decode_combo(name, value) {
            Ok(combo) => Some(combo),
            Err(e) => {
                warn!("Skipping saved hotkey entry: {}", e);
                None
            }
        })
        .collect()
}
