//! `mapcover` - Push-to-hide map cover for streaming scenes
//!
//! Hides an image source in the host's active scene while a hotkey is held
//! and brings it back after a configurable delay once the key is released.
//! The host owns scenes, hotkeys and settings; this crate talks to it through
//! the `Host` trait and answers its lifecycle hooks through `Script`.
//!
//! # Architecture
//!
//! - `MapCoverScript`: lifecycle hooks, owns the controller and the hotkey
//! - `VisibilityController`: hides on press, reveals after the delay
//! - `HotkeyBinding`: registers the push-to-hide action and persists its keys
//! - `MemoryHost`: in-process host used by the binary and the tests

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod hotkey;
pub mod script;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{MapCoverError, Result};
pub use script::MapCoverScript;
