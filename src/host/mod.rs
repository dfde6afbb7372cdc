//! Host application abstraction
//!
//! Everything the cover script touches lives inside the host: scenes, scene
//! items, hotkeys and the settings object. This module defines the narrow
//! surface the script calls into and the lifecycle hooks the host calls back.
//!
//! # Architecture
//!
//! - `Host`: scene graph and hotkey calls issued by the script
//! - `Script`: lifecycle hooks the host invokes (load, save, update, ...)
//! - `SourceLease`: RAII wrapper releasing a counted source reference
//! - `SettingsData`: key/value settings object handed over by the host
//! - `MemoryHost`: in-process host used by the binary and the tests
//!
//! # Reference Counting
//!
//! `Host::current_scene` returns a counted reference that must be released
//! with `Host::release_source`. Callers go through `SourceLease::current_scene`
//! so the release happens on every exit path.

pub mod memory;
pub mod settings;

pub use memory::{MemoryHost, VisibilityChange};
pub use settings::SettingsData;

use crate::config::PropertySchema;
use crate::hotkey::KeyCombo;

/// Handle of a hotkey action registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyId(pub u64);

/// Counted reference to a host source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Scene graph belonging to a scene source (borrowed, not counted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub u64);

/// Entry of a scene graph (borrowed, not counted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneItemId(pub u64);

/// Callback invoked by the host on hotkey press (`true`) and release (`false`)
pub type HotkeyCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Calls the script issues against the host
///
/// Lookups return `None` when the host has nothing to offer; none of them
/// fail in any other way.
pub trait Host: Send + Sync {
    /// Register a frontend hotkey action and return its handle
    fn register_hotkey(&self, name: &str, description: &str, callback: HotkeyCallback)
    -> HotkeyId;

    /// Restore previously saved key combinations into a hotkey
    fn load_hotkey(&self, id: HotkeyId, combos: &[KeyCombo]);

    /// Current key combinations bound to a hotkey
    fn save_hotkey(&self, id: HotkeyId) -> Vec<KeyCombo>;

    /// Currently active scene source, as a counted reference
    fn current_scene(&self) -> Option<SourceId>;

    /// Release a counted source reference
    fn release_source(&self, source: SourceId);

    /// Scene graph of a source, if the source is a scene
    fn scene_from_source(&self, source: SourceId) -> Option<SceneId>;

    /// Find the scene item whose source carries `name`
    fn find_scene_item(&self, scene: SceneId, name: &str) -> Option<SceneItemId>;

    /// Show or hide a scene item
    fn set_item_visible(&self, item: SceneItemId, visible: bool);
}

/// Lifecycle hooks the host invokes on a loaded script
pub trait Script {
    /// Text shown in the host's script panel
    fn description(&self) -> String;

    /// Properties rendered by the host's settings UI
    fn properties(&self) -> PropertySchema;

    /// Populate default values before the first update
    fn defaults(&self, _settings: &mut SettingsData) {}

    /// Called once when the script is loaded
    fn load(&mut self, settings: &mut SettingsData);

    /// Called when the host persists its settings
    fn save(&mut self, settings: &mut SettingsData);

    /// Called whenever the user edits settings
    fn update(&mut self, settings: &SettingsData);

    /// Called before the script is unloaded
    fn unload(&mut self) {}
}

/// Counted source reference released when dropped
pub struct SourceLease<'a> {
    host: &'a dyn Host,
    source: SourceId,
}

impl<'a> SourceLease<'a> {
    /// Acquire the host's current scene, if any
    pub fn current_scene(host: &'a dyn Host) -> Option<Self> {
        host.current_scene().map(|source| Self { host, source })
    }

    /// The leased source
    pub fn source(&self) -> SourceId {
        self.source
    }
}

impl Drop for SourceLease<'_> {
    fn drop(&mut self) {
        self.host.release_source(self.source);
    }
}
