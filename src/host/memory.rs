//! In-process host
//!
//! `MemoryHost` keeps a small scene graph and a hotkey table in memory. It
//! backs the interactive binary and the test suite, and records every
//! visibility change with a timestamp so delays can be checked.

use super::{Host, HotkeyCallback, HotkeyId, SceneId, SceneItemId, SourceId};
use crate::hotkey::KeyCombo;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// A visibility change applied through `Host::set_item_visible`
#[derive(Debug, Clone)]
pub struct VisibilityChange {
    /// Source name of the changed item
    pub item: String,
    /// New visibility
    pub visible: bool,
    /// When the change was applied
    pub at: Instant,
}

struct MemoryItem {
    name: String,
    visible: bool,
}

struct MemorySource {
    name: String,
    /// Scene graph, `None` for plain sources
    items: Option<Vec<MemoryItem>>,
}

struct MemoryHotkey {
    name: String,
    description: String,
    bindings: Vec<KeyCombo>,
    callback: Arc<dyn Fn(bool) + Send + Sync>,
}

#[derive(Default)]
struct MemoryState {
    sources: Vec<MemorySource>,
    current: Option<SourceId>,
    live_references: usize,
    hotkeys: Vec<MemoryHotkey>,
    changes: Vec<VisibilityChange>,
}

/// Host implementation holding its scene graph in memory
#[derive(Default)]
pub struct MemoryHost {
    state: Mutex<MemoryState>,
}

fn index(id: u64) -> usize {
    usize::try_from(id).unwrap_or(usize::MAX)
}

fn item_id(scene: usize, item: usize) -> SceneItemId {
    SceneItemId(((scene as u64) << 32) | item as u64)
}

fn split_item_id(id: SceneItemId) -> (usize, usize) {
    (index(id.0 >> 32), index(id.0 & 0xFFFF_FFFF))
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    fn add_source_inner(&self, name: &str, items: Option<Vec<MemoryItem>>) -> SourceId {
        let mut state = self.state.lock();
        state.sources.push(MemorySource {
            name: name.to_string(),
            items,
        });
        SourceId(state.sources.len() as u64 - 1)
    }

    /// Add an empty scene
    pub fn add_scene(&self, name: &str) -> SourceId {
        self.add_source_inner(name, Some(Vec::new()))
    }

    /// Add a source that is not a scene
    pub fn add_source(&self, name: &str) -> SourceId {
        self.add_source_inner(name, None)
    }

    /// Add an item to a scene; ignored if `scene` is not a scene
    pub fn add_item(&self, scene: SourceId, name: &str, visible: bool) {
        let mut state = self.state.lock();
        match state
            .sources
            .get_mut(index(scene.0))
            .and_then(|source| source.items.as_mut())
        {
            Some(items) => items.push(MemoryItem {
                name: name.to_string(),
                visible,
            }),
            None => warn!("Cannot add item '{}' to non-scene source {:?}", name, scene),
        }
    }

    /// Rename every item named `from` in every scene
    pub fn rename_items(&self, from: &str, to: &str) {
        let mut state = self.state.lock();
        for items in state.sources.iter_mut().filter_map(|s| s.items.as_mut()) {
            for item in items.iter_mut().filter(|item| item.name == from) {
                item.name = to.to_string();
            }
        }
    }

    /// Switch the active scene
    pub fn set_current_scene(&self, source: Option<SourceId>) {
        self.state.lock().current = source;
    }

    /// Name of the active scene
    pub fn current_scene_name(&self) -> Option<String> {
        let state = self.state.lock();
        state
            .current
            .and_then(|id| state.sources.get(index(id.0)))
            .map(|source| source.name.clone())
    }

    /// Visibility of the first item named `item` in scene `scene`
    pub fn is_visible(&self, scene: &str, item: &str) -> Option<bool> {
        let state = self.state.lock();
        state
            .sources
            .iter()
            .filter(|source| source.name == scene)
            .filter_map(|source| source.items.as_ref())
            .flatten()
            .find(|entry| entry.name == item)
            .map(|entry| entry.visible)
    }

    /// Visibility of every item of every scene, in insertion order
    pub fn snapshot(&self) -> Vec<(String, String, bool)> {
        let state = self.state.lock();
        state
            .sources
            .iter()
            .filter_map(|source| source.items.as_ref().map(|items| (source, items)))
            .flat_map(|(source, items)| {
                items
                    .iter()
                    .map(move |item| (source.name.clone(), item.name.clone(), item.visible))
            })
            .collect()
    }

    /// Number of counted source references not yet released
    pub fn outstanding_references(&self) -> usize {
        self.state.lock().live_references
    }

    /// Every visibility change applied so far
    pub fn changes(&self) -> Vec<VisibilityChange> {
        self.state.lock().changes.clone()
    }

    /// Names and descriptions of registered hotkeys
    pub fn registered_hotkeys(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .hotkeys
            .iter()
            .map(|hotkey| (hotkey.name.clone(), hotkey.description.clone()))
            .collect()
    }

    /// Replace the key combinations bound to a registered hotkey, as the
    /// user would in the host's hotkey settings
    pub fn bind_hotkey(&self, name: &str, combos: Vec<KeyCombo>) -> bool {
        let mut state = self.state.lock();
        match state.hotkeys.iter_mut().find(|hotkey| hotkey.name == name) {
            Some(hotkey) => {
                hotkey.bindings = combos;
                true
            }
            None => false,
        }
    }

    /// Fire a registered hotkey by action name
    ///
    /// The callback runs without the host lock held, so it may call back
    /// into the host.
    pub fn fire_hotkey(&self, name: &str, pressed: bool) -> bool {
        let callback = self
            .state
            .lock()
            .hotkeys
            .iter()
            .find(|hotkey| hotkey.name == name)
            .map(|hotkey| Arc::clone(&hotkey.callback));

        match callback {
            Some(callback) => {
                callback(pressed);
                true
            }
            None => false,
        }
    }

    /// Simulate a physical key event, firing every hotkey bound to `combo`
    ///
    /// Returns the number of hotkeys fired.
    pub fn key_event(&self, combo: &KeyCombo, pressed: bool) -> usize {
        let callbacks: Vec<_> = self
            .state
            .lock()
            .hotkeys
            .iter()
            .filter(|hotkey| hotkey.bindings.contains(combo))
            .map(|hotkey| Arc::clone(&hotkey.callback))
            .collect();

        for callback in &callbacks {
            callback(pressed);
        }
        callbacks.len()
    }
}

impl Host for MemoryHost {
    fn register_hotkey(
        &self,
        name: &str,
        description: &str,
        callback: HotkeyCallback,
    ) -> HotkeyId {
        let mut state = self.state.lock();
        state.hotkeys.push(MemoryHotkey {
            name: name.to_string(),
            description: description.to_string(),
            bindings: Vec::new(),
            callback: Arc::from(callback),
        });
        debug!("Registered hotkey '{}'", name);
        HotkeyId(state.hotkeys.len() as u64 - 1)
    }

    fn load_hotkey(&self, id: HotkeyId, combos: &[KeyCombo]) {
        let mut state = self.state.lock();
        if let Some(hotkey) = state.hotkeys.get_mut(index(id.0)) {
            hotkey.bindings = combos.to_vec();
        }
    }

    fn save_hotkey(&self, id: HotkeyId) -> Vec<KeyCombo> {
        self.state
            .lock()
            .hotkeys
            .get(index(id.0))
            .map(|hotkey| hotkey.bindings.clone())
            .unwrap_or_default()
    }

    fn current_scene(&self) -> Option<SourceId> {
        let mut state = self.state.lock();
        let current = state.current?;
        state.live_references += 1;
        Some(current)
    }

    fn release_source(&self, source: SourceId) {
        let mut state = self.state.lock();
        if state.live_references == 0 {
            warn!("Released source {:?} without a live reference", source);
            return;
        }
        state.live_references -= 1;
    }

    fn scene_from_source(&self, source: SourceId) -> Option<SceneId> {
        let state = self.state.lock();
        state
            .sources
            .get(index(source.0))
            .and_then(|source| source.items.as_ref())
            .map(|_| SceneId(source.0))
    }

    fn find_scene_item(&self, scene: SceneId, name: &str) -> Option<SceneItemId> {
        let state = self.state.lock();
        let scene_index = index(scene.0);
        state
            .sources
            .get(scene_index)
            .and_then(|source| source.items.as_ref())
            .and_then(|items| items.iter().position(|item| item.name == name))
            .map(|item_index| item_id(scene_index, item_index))
    }

    fn set_item_visible(&self, item: SceneItemId, visible: bool) {
        let (scene_index, item_index) = split_item_id(item);
        let mut state = self.state.lock();
        let Some(entry) = state
            .sources
            .get_mut(scene_index)
            .and_then(|source| source.items.as_mut())
            .and_then(|items| items.get_mut(item_index))
        else {
            warn!("Visibility change for unknown scene item {:?}", item);
            return;
        };

        entry.visible = visible;
        let change = VisibilityChange {
            item: entry.name.clone(),
            visible,
            at: Instant::now(),
        };
        state.changes.push(change);
    }
}
