//! Integration tests for `mapcover`
//!
//! Drives the script and controller through the public API against an
//! in-process host: toggle timing, no-op lookups, configuration and hotkey
//! persistence across a simulated restart.

use crossbeam_channel::{Receiver, Sender, unbounded};
use mapcover::{
    MapCoverScript,
    config::{ConfigManager, CoverSettings, DELAY_KEY, SCENE_NAME_KEY, SOURCE_NAME_KEY},
    controller::{ControllerOptions, RevealPolicy, VisibilityController},
    host::{
        Host, HotkeyCallback, HotkeyId, MemoryHost, SceneId, SceneItemId, Script, SettingsData,
        SourceId,
    },
    hotkey::{HOTKEY_NAME, KeyCombo},
};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Host that reports every visibility change on a channel
struct ObservedHost {
    inner: MemoryHost,
    events: Sender<(bool, Instant)>,
}

impl ObservedHost {
    fn new() -> (Arc<Self>, Receiver<(bool, Instant)>) {
        let (events, rx) = unbounded();
        let host = Arc::new(Self {
            inner: MemoryHost::new(),
            events,
        });
        let scene = host.inner.add_scene("Main");
        host.inner.add_item(scene, "Cover", true);
        host.inner.set_current_scene(Some(scene));
        (host, rx)
    }
}

impl Host for ObservedHost {
    fn register_hotkey(
        &self,
        name: &str,
        description: &str,
        callback: HotkeyCallback,
    ) -> HotkeyId {
        self.inner.register_hotkey(name, description, callback)
    }

    fn load_hotkey(&self, id: HotkeyId, combos: &[KeyCombo]) {
        self.inner.load_hotkey(id, combos);
    }

    fn save_hotkey(&self, id: HotkeyId) -> Vec<KeyCombo> {
        self.inner.save_hotkey(id)
    }

    fn current_scene(&self) -> Option<SourceId> {
        self.inner.current_scene()
    }

    fn release_source(&self, source: SourceId) {
        self.inner.release_source(source);
    }

    fn scene_from_source(&self, source: SourceId) -> Option<SceneId> {
        self.inner.scene_from_source(source)
    }

    fn find_scene_item(&self, scene: SceneId, name: &str) -> Option<SceneItemId> {
        self.inner.find_scene_item(scene, name)
    }

    fn set_item_visible(&self, item: SceneItemId, visible: bool) {
        self.inner.set_item_visible(item, visible);
        let _ = self.events.send((visible, Instant::now()));
    }
}

fn cover_host() -> Arc<MemoryHost> {
    let host = Arc::new(MemoryHost::new());
    let scene = host.add_scene("Main");
    host.add_item(scene, "Background", true);
    host.add_item(scene, "Cover", true);
    host.add_item(scene, "Webcam", false);
    host.set_current_scene(Some(scene));
    host
}

fn cover_settings(delay_seconds: f64) -> CoverSettings {
    CoverSettings {
        image_source_name: "Cover".to_string(),
        scene_name: "Main".to_string(),
        delay_seconds,
    }
}

/// Press hides synchronously, release reveals no earlier than the delay
#[test]
fn test_press_then_delayed_reveal() {
    let (host, events) = ObservedHost::new();
    let controller = VisibilityController::new(host.clone(), cover_settings(0.25));

    controller.on_hotkey_event(true);
    let (visible, _) = events.try_recv().expect("press should hide synchronously");
    assert!(!visible);

    let released = Instant::now();
    controller.on_hotkey_event(false);
    assert!(events.try_recv().is_err(), "reveal must not happen before the delay");

    let (visible, at) = events
        .recv_timeout(Duration::from_secs(3))
        .expect("reveal should fire");
    assert!(visible);
    assert!(at.duration_since(released) >= Duration::from_millis(250));
    assert_eq!(host.inner.outstanding_references(), 0);
}

/// A zero delay reveals before `on_hotkey_event` returns
#[test]
fn test_zero_delay_reveals_immediately() {
    let (host, events) = ObservedHost::new();
    let controller = VisibilityController::new(host.clone(), cover_settings(0.0));

    controller.on_hotkey_event(true);
    controller.on_hotkey_event(false);

    let changes: Vec<bool> = events.try_iter().map(|(visible, _)| visible).collect();
    assert_eq!(changes, vec![false, true]);
}

/// Press during the reveal delay keeps the cover up
#[test]
fn test_rapid_toggle_keeps_latest_press() {
    let (host, events) = ObservedHost::new();
    let controller = VisibilityController::new(host.clone(), cover_settings(0.1));

    controller.on_hotkey_event(true);
    controller.on_hotkey_event(false);
    controller.on_hotkey_event(true);
    controller.on_hotkey_event(false);
    controller.on_hotkey_event(true);

    thread::sleep(Duration::from_millis(350));
    let changes: Vec<bool> = events.try_iter().map(|(visible, _)| visible).collect();
    assert_eq!(changes, vec![false, false, false]);
    assert_eq!(host.inner.is_visible("Main", "Cover"), Some(false));
}

/// The blocking policy reproduces the overlapping reveal of the legacy script
#[test]
fn test_blocking_policy_overlapping_release_still_reveals() {
    let (host, events) = ObservedHost::new();
    let controller = Arc::new(VisibilityController::with_options(
        host.clone(),
        cover_settings(0.15),
        ControllerOptions {
            reveal_policy: RevealPolicy::Blocking,
        },
    ));

    controller.on_hotkey_event(true);
    let releasing = Arc::clone(&controller);
    let release = thread::spawn(move || releasing.on_hotkey_event(false));

    // Press again while the first release is still sleeping
    thread::sleep(Duration::from_millis(30));
    controller.on_hotkey_event(true);
    release.join().unwrap();

    let changes: Vec<bool> = events.try_iter().map(|(visible, _)| visible).collect();
    assert_eq!(changes, vec![false, false, true]);
}

/// Toggles through the full script, configured by host settings
#[test]
fn test_script_settings_and_hotkey_flow() {
    let host = cover_host();
    let mut script = MapCoverScript::new(host.clone());
    let mut settings = SettingsData::new();
    script.defaults(&mut settings);
    settings.set_string(SOURCE_NAME_KEY, "Cover");
    script.load(&mut settings);

    let combo: KeyCombo = "m".parse().unwrap();
    host.bind_hotkey(HOTKEY_NAME, vec![combo.clone()]);

    assert_eq!(host.key_event(&combo, true), 1);
    assert_eq!(host.is_visible("Main", "Cover"), Some(false));
    assert_eq!(host.key_event(&combo, false), 1);
    assert_eq!(host.is_visible("Main", "Cover"), Some(true));

    // Settings edits apply to the next toggle
    settings.set_string(SOURCE_NAME_KEY, "Background");
    script.update(&settings);
    host.key_event(&combo, true);
    assert_eq!(host.is_visible("Main", "Background"), Some(false));
    assert_eq!(host.is_visible("Main", "Cover"), Some(true));
}

/// Updating the configuration and reading it back through the settings
/// accessors yields the same values
#[test]
fn test_configuration_round_trip() {
    let mut script = MapCoverScript::new(cover_host());
    let mut settings = SettingsData::new();
    script.load(&mut settings);

    cover_settings(2.5).write_to(&mut settings);
    script.update(&settings);

    let applied = script.controller().settings();
    let mut read_back = SettingsData::new();
    applied.write_to(&mut read_back);

    assert_eq!(read_back.get_string(SOURCE_NAME_KEY), "Cover");
    assert_eq!(read_back.get_string(SCENE_NAME_KEY), "Main");
    assert!((read_back.get_double(DELAY_KEY) - 2.5).abs() < f64::EPSILON);
}

/// Saved key bindings survive a simulated restart through the settings file
#[test]
fn test_hotkey_binding_survives_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("settings.json");
    let combos = vec![
        "ctrl+shift+m".parse::<KeyCombo>().unwrap(),
        "F5".parse::<KeyCombo>().unwrap(),
    ];

    // First session: user binds keys, host saves
    {
        let host = cover_host();
        let mut script = MapCoverScript::new(host.clone());
        let mut settings = SettingsData::new();
        script.load(&mut settings);
        host.bind_hotkey(HOTKEY_NAME, combos.clone());

        script.save(&mut settings);
        ConfigManager::save_to(&path, &settings).unwrap();
    }

    // Second session: fresh host, settings read back from disk
    let host = cover_host();
    let mut script = MapCoverScript::new(host.clone());
    let mut settings = ConfigManager::load_from(&path).unwrap();
    script.load(&mut settings);

    let restored = host.save_hotkey(script.hotkey().unwrap().id());
    assert_eq!(restored, combos);
}

/// Lookup failures never leak the current-scene reference
#[test]
fn test_references_released_on_every_path() {
    let host = Arc::new(MemoryHost::new());
    let controller = VisibilityController::new(host.clone(), cover_settings(0.0));

    // No current scene
    controller.on_hotkey_event(true);
    // Current source is not a scene
    let webcam = host.add_source("Webcam");
    host.set_current_scene(Some(webcam));
    controller.on_hotkey_event(true);
    // Scene without the cover
    let scene = host.add_scene("Main");
    host.set_current_scene(Some(scene));
    controller.on_hotkey_event(true);
    // Scene with the cover
    host.add_item(scene, "Cover", true);
    controller.on_hotkey_event(true);
    controller.on_hotkey_event(false);

    assert_eq!(host.outstanding_references(), 0);
    assert_eq!(host.changes().len(), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A source name absent from the active scene leaves the graph unchanged
    #[test]
    fn prop_unknown_source_is_noop(
        name in "[A-Za-z0-9 _-]{0,24}",
        visible in any::<bool>(),
    ) {
        prop_assume!(!["Background", "Cover", "Webcam"].contains(&name.as_str()));

        let host = cover_host();
        let before = host.snapshot();
        let controller = VisibilityController::new(
            host.clone(),
            CoverSettings {
                image_source_name: name,
                scene_name: String::new(),
                delay_seconds: 0.0,
            },
        );

        prop_assert!(!controller.set_visible(visible));
        controller.on_hotkey_event(true);
        controller.on_hotkey_event(false);

        prop_assert_eq!(host.snapshot(), before);
        prop_assert!(host.changes().is_empty());
        prop_assert_eq!(host.outstanding_references(), 0);
    }
}
