//! Visibility controller module
//!
//! This module hides the cover source on hotkey press and brings
//! it back after a configurable delay on release.
//!
//! # Architecture
//!
//! - `VisibilityController`: resolves the cover source in the current scene
//!   and applies visibility changes through the `Host` trait
//! - `RevealScheduler`: cancelable one-shot timer for the delayed reveal
//! - `RevealPolicy`: scheduled (default) or blocking reveal
//!
//! # Event Flow
//!
//! ```text
//! Host hotkey → on_hotkey_event(true)  → hide now (cancels pending reveal)
//!             → on_hotkey_event(false) → RevealScheduler → show after delay
//! ```
//!
//! # Reveal Policies
//!
//! With the scheduled policy a press during the reveal delay cancels the
//! pending reveal, so the cover stays up while the key is held. The
//! blocking policy sleeps on the releasing thread instead; overlapping
//! releases then race and a press cannot cancel an earlier release.
//!
//! # Lookup Failures
//!
//! No current scene, a current source that is not a scene, or a missing
//! source name all make a toggle a silent no-op. They are never surfaced
//! to the user and only show up in `trace` level logs.

pub mod cover_controller;
pub mod reveal;

pub use cover_controller::{ControllerOptions, RevealPolicy, VisibilityController};
pub use reveal::RevealScheduler;
