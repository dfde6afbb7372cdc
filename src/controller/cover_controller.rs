//! Visibility toggle controller
//!
//! Hides the cover source on hotkey press and shows it again after the
//! configured delay on release.

use super::reveal::RevealScheduler;
use crate::config::CoverSettings;
use crate::host::{Host, SourceLease};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// How a key release brings the cover back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Cancelable timer; a press during the delay cancels the reveal
    #[default]
    Scheduled,
    /// Sleep on the releasing thread, then show. Overlapping releases are
    /// not ordered and a press during the delay does not cancel anything.
    Blocking,
}

/// Construction options for [`VisibilityController`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    /// Reveal behavior on key release
    pub reveal_policy: RevealPolicy,
}

/// Settings and host handle shared with the reveal worker
struct CoverTarget {
    host: Arc<dyn Host>,
    settings: RwLock<CoverSettings>,
}

impl CoverTarget {
    /// Apply `visible` to the configured source in the current scene.
    /// Returns whether a scene item was found.
    fn set_visible(&self, visible: bool) -> bool {
        let name = self.settings.read().image_source_name.clone();
        let host = self.host.as_ref();

        let Some(lease) = SourceLease::current_scene(host) else {
            trace!("No current scene, skipping visibility change");
            return false;
        };
        let Some(scene) = host.scene_from_source(lease.source()) else {
            trace!("Current source is not a scene, skipping visibility change");
            return false;
        };
        let Some(item) = host.find_scene_item(scene, &name) else {
            trace!("Source '{}' not in current scene, skipping", name);
            return false;
        };

        host.set_item_visible(item, visible);
        debug!("Set '{}' visible={}", name, visible);
        true
    }
}

/// Hotkey driven visibility controller
pub struct VisibilityController {
    target: Arc<CoverTarget>,
    reveal: RevealScheduler,
    policy: RevealPolicy,
}

impl VisibilityController {
    /// Create a controller with the scheduled reveal policy
    pub fn new(host: Arc<dyn Host>, settings: CoverSettings) -> Self {
        Self::with_options(host, settings, ControllerOptions::default())
    }

    /// Create a controller with explicit options
    pub fn with_options(
        host: Arc<dyn Host>,
        settings: CoverSettings,
        options: ControllerOptions,
    ) -> Self {
        let target = Arc::new(CoverTarget {
            host,
            settings: RwLock::new(settings),
        });

        let worker_target = Arc::clone(&target);
        let reveal = RevealScheduler::spawn(move || {
            worker_target.set_visible(true);
        });

        Self {
            target,
            reveal,
            policy: options.reveal_policy,
        }
    }

    /// Handle a hotkey press (`true`) or release (`false`)
    ///
    /// Press hides the cover immediately. Release shows it after the
    /// configured delay, according to the reveal policy.
    pub fn on_hotkey_event(&self, pressed: bool) {
        if pressed {
            debug!("Hotkey pressed, hiding cover");
            self.reveal.preempt(|| self.target.set_visible(false));
            return;
        }

        let delay = self.target.settings.read().reveal_delay();
        debug!("Hotkey released, revealing after {:?}", delay);

        match self.policy {
            RevealPolicy::Scheduled if delay.is_zero() => {
                self.reveal.preempt(|| self.target.set_visible(true));
            }
            RevealPolicy::Scheduled => self.reveal.schedule(delay),
            RevealPolicy::Blocking => {
                std::thread::sleep(delay);
                self.target.set_visible(true);
            }
        }
    }

    /// Show or hide the configured source in the current scene
    ///
    /// A missing scene, scene graph or source is a no-op; the return value
    /// tells whether the change was applied.
    pub fn set_visible(&self, visible: bool) -> bool {
        self.target.set_visible(visible)
    }

    /// Replace the configuration; the next toggle uses it
    pub fn update_configuration(&self, settings: CoverSettings) {
        info!(
            "Cover settings updated: source='{}', scene='{}', delay={}s",
            settings.image_source_name, settings.scene_name, settings.delay_seconds
        );
        *self.target.settings.write() = settings;
    }

    /// Snapshot of the current configuration
    pub fn settings(&self) -> CoverSettings {
        self.target.settings.read().clone()
    }

    /// Drop a pending reveal without running it
    pub fn cancel_pending_reveal(&self) -> bool {
        self.reveal.cancel()
    }

    /// Show the cover now if a reveal is pending; returns whether one was
    pub fn flush_pending_reveal(&self) -> bool {
        self.reveal.flush()
    }

    /// Whether a reveal is waiting to fire
    pub fn has_pending_reveal(&self) -> bool {
        self.reveal.is_pending()
    }

    /// Reveal policy in use
    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }
}
