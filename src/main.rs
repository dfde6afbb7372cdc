//! `mapcover` - interactive map cover session
//!
//! Runs the map cover script against an in-process host with a single scene,
//! driven by commands read from stdin. Settings and hotkey bindings persist
//! to %APPDATA%\MapCover\settings.json between sessions.

use anyhow::{Context, Result};
use mapcover::{
    MapCoverScript,
    config::{ConfigManager, DELAY_KEY, SCENE_NAME_KEY, SOURCE_NAME_KEY},
    controller::{ControllerOptions, RevealPolicy},
    error::get_user_friendly_error,
    host::{Host, MemoryHost, Script, SettingsData},
    hotkey::{HOTKEY_NAME, KeyCombo},
    utils,
};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{info, warn};

/// Scene created when no scene name is configured
const DEFAULT_SCENE: &str = "Scene";
/// Cover item created when no source name is configured
const DEFAULT_SOURCE: &str = "Map Cover";

const HELP: &str = "Commands:\n  \
    press | release      fire the push-to-hide hotkey\n  \
    down <key> | up <key> send a key event (e.g. down ctrl+m)\n  \
    bind <key>           bind the hotkey to a key combination\n  \
    source <name>        set the cover source name\n  \
    delay <seconds>      set the reveal delay\n  \
    status               show the current state\n  \
    quit                 save and exit";

fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    let policy = if std::env::args().any(|arg| arg == "--blocking") {
        RevealPolicy::Blocking
    } else {
        RevealPolicy::Scheduled
    };

    let mut settings = ConfigManager::load().context("Failed to load settings")?;

    let host = Arc::new(MemoryHost::new());
    let mut script = MapCoverScript::with_options(
        host.clone(),
        ControllerOptions {
            reveal_policy: policy,
        },
    );
    script.defaults(&mut settings);
    build_scene(&host, &settings);
    script.load(&mut settings);

    println!("{}\n", script.description());
    println!("{HELP}");
    info!("Session started with {:?} reveal policy", policy);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        if !run_command(line.trim(), &host, &mut script, &mut settings) {
            break;
        }
    }

    script.save(&mut settings);
    script.unload();
    if let Err(e) = ConfigManager::save(&settings) {
        eprintln!("{}", get_user_friendly_error(&e));
        return Err(e).context("Failed to save settings");
    }

    info!("Session ended");
    Ok(())
}

/// Create the configured scene with the cover source and make it current
fn build_scene(host: &MemoryHost, settings: &SettingsData) {
    let scene_name = non_empty_or(settings.get_string(SCENE_NAME_KEY), DEFAULT_SCENE);
    let source_name = non_empty_or(settings.get_string(SOURCE_NAME_KEY), DEFAULT_SOURCE);

    let scene = host.add_scene(&scene_name);
    host.add_item(scene, "Game Capture", true);
    host.add_item(scene, &source_name, true);
    host.set_current_scene(Some(scene));
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Execute one command; returns `false` when the session should end
fn run_command(
    line: &str,
    host: &MemoryHost,
    script: &mut MapCoverScript,
    settings: &mut SettingsData,
) -> bool {
    let (command, argument) = line
        .split_once(' ')
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));

    match command {
        "" => {}
        "press" => {
            host.fire_hotkey(HOTKEY_NAME, true);
        }
        "release" => {
            host.fire_hotkey(HOTKEY_NAME, false);
        }
        "down" | "up" => match argument.parse::<KeyCombo>() {
            Ok(combo) => {
                let fired = host.key_event(&combo, command == "down");
                if fired == 0 {
                    println!("{combo} is not bound");
                }
            }
            Err(e) => println!("Invalid key: {e}"),
        },
        "bind" => match argument.parse::<KeyCombo>() {
            Ok(combo) => {
                println!("Bound '{HOTKEY_NAME}' to {combo}");
                host.bind_hotkey(HOTKEY_NAME, vec![combo]);
            }
            Err(e) => println!("Invalid key: {e}"),
        },
        "source" => {
            let previous = settings.get_string(SOURCE_NAME_KEY);
            let previous = non_empty_or(previous, DEFAULT_SOURCE);
            host.rename_items(&previous, argument);
            settings.set_string(SOURCE_NAME_KEY, argument);
            script.update(settings);
        }
        "delay" => match argument.parse::<f64>() {
            Ok(seconds) => {
                settings.set_double(DELAY_KEY, seconds);
                script.update(settings);
            }
            Err(e) => println!("Invalid delay: {e}"),
        },
        "status" => print_status(host, script),
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        other => {
            warn!("Unknown command '{}'", other);
            println!("Unknown command '{other}'. Type 'help' for commands.");
        }
    }
    true
}

fn print_status(host: &MemoryHost, script: &MapCoverScript) {
    let controller = script.controller();
    let cover = controller.settings();
    let scene = host.current_scene_name().unwrap_or_default();

    let visibility = match host.is_visible(&scene, &cover.image_source_name) {
        Some(true) => "visible",
        Some(false) => "hidden",
        None => "not in scene",
    };

    println!("Scene:   {scene}");
    println!("Source:  '{}' ({visibility})", cover.image_source_name);
    println!("Delay:   {}s", cover.delay_seconds);
    if controller.has_pending_reveal() {
        println!("Reveal:  pending");
    }

    if let Some(hotkey) = script.hotkey() {
        let bindings: Vec<String> = host
            .save_hotkey(hotkey.id())
            .iter()
            .map(ToString::to_string)
            .collect();
        if bindings.is_empty() {
            println!("Hotkey:  unbound");
        } else {
            println!("Hotkey:  {}", bindings.join(", "));
        }
    }
}
