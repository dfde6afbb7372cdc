//! Host-facing script lifecycle
//!
//! `MapCoverScript` wires the host hooks to the visibility controller and the
//! push-to-hide hotkey. The host owns the instance and calls the `Script`
//! hooks; nothing here is global.

use crate::config::{CoverSettings, PropertySchema, cover_properties};
use crate::controller::{ControllerOptions, VisibilityController};
use crate::hotkey::{HOTKEY_DESCRIPTION, HOTKEY_NAME, HotkeyBinding};
use crate::host::{Host, Script, SettingsData};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Text shown in the host's script panel
pub const DESCRIPTION: &str = "Adds a hotkey for your Rust game map cover.\n\n\
     Tutorial:\n\
     - rust_map_source_name: The image source name used to cover the Rust map.\n\
     - rust_scene_name: The scene affected by the hotkey. Leave blank if irrelevant.\n\
     - reveal delay: Time the map cover stays hidden after the hotkey is released (seconds).\n\n\
     Setup:\n\
     - Go to OBS Hotkeys and set the 'RustMap Push to Hide' hotkey to match your map key.";

/// The map cover script
pub struct MapCoverScript {
    host: Arc<dyn Host>,
    controller: Arc<VisibilityController>,
    hotkey: Option<HotkeyBinding>,
}

impl MapCoverScript {
    /// Create the script with the scheduled reveal policy
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::with_options(host, ControllerOptions::default())
    }

    /// Create the script with explicit controller options
    pub fn with_options(host: Arc<dyn Host>, options: ControllerOptions) -> Self {
        let controller = Arc::new(VisibilityController::with_options(
            Arc::clone(&host),
            CoverSettings::default(),
            options,
        ));
        Self {
            host,
            controller,
            hotkey: None,
        }
    }

    /// The visibility controller driven by the hotkey
    pub fn controller(&self) -> &Arc<VisibilityController> {
        &self.controller
    }

    /// The registered hotkey, once loaded
    pub fn hotkey(&self) -> Option<&HotkeyBinding> {
        self.hotkey.as_ref()
    }
}

impl Script for MapCoverScript {
    fn description(&self) -> String {
        DESCRIPTION.to_string()
    }

    fn properties(&self) -> PropertySchema {
        cover_properties()
    }

    fn defaults(&self, settings: &mut SettingsData) {
        cover_properties().apply_defaults(settings);
    }

    fn load(&mut self, settings: &mut SettingsData) {
        if let Some(hotkey) = &self.hotkey {
            warn!("Script loaded twice; keeping hotkey '{}'", hotkey.name());
            hotkey.restore(self.host.as_ref(), settings);
        } else {
            let controller: Weak<VisibilityController> = Arc::downgrade(&self.controller);
            let callback = Box::new(move |pressed: bool| {
                if let Some(controller) = controller.upgrade() {
                    controller.on_hotkey_event(pressed);
                }
            });
            self.hotkey = Some(HotkeyBinding::register(
                self.host.as_ref(),
                settings,
                HOTKEY_NAME,
                HOTKEY_DESCRIPTION,
                callback,
            ));
        }

        self.update(settings);
        info!("Map cover script loaded");
    }

    fn save(&mut self, settings: &mut SettingsData) {
        let Some(hotkey) = &self.hotkey else {
            debug!("No hotkey registered, nothing to save");
            return;
        };

        if let Err(e) = hotkey.save(self.host.as_ref(), settings) {
            error!("Failed to save hotkey '{}': {}", hotkey.name(), e);
        }
    }

    fn update(&mut self, settings: &SettingsData) {
        self.controller
            .update_configuration(CoverSettings::from_settings(settings));
    }

    fn unload(&mut self) {
        if self.controller.flush_pending_reveal() {
            info!("Pending reveal applied on unload");
        }
    }
}
