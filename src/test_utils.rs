//! Shared test utilities for `mapcover` unit tests.
//!
//! This module is only compiled during testing (`#[cfg(test)]`).

use crate::host::MemoryHost;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the APPDATA environment variable.
static APPDATA_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Host with a current scene "Main" holding a visible "Cover" item
pub fn host_with_cover() -> Arc<MemoryHost> {
    let host = Arc::new(MemoryHost::new());
    let scene = host.add_scene("Main");
    host.add_item(scene, "Background", true);
    host.add_item(scene, "Cover", true);
    host.set_current_scene(Some(scene));
    host
}

/// RAII guard that sets the APPDATA environment variable for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because other
/// threads may read the environment concurrently. The `APPDATA_LOCK` mutex
/// keeps modifications serial and the guard restores the original value on
/// drop, including on panic.
pub struct AppdataGuard {
    original: Option<String>,
    // Held for the lifetime of the guard
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under APPDATA_LOCK"
)]
impl AppdataGuard {
    /// Create a new guard that sets APPDATA to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = APPDATA_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var("APPDATA").ok();
        // SAFETY: APPDATA_LOCK serializes every writer; the original value is
        // restored on drop.
        unsafe {
            std::env::set_var("APPDATA", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under APPDATA_LOCK"
)]
impl Drop for AppdataGuard {
    fn drop(&mut self) {
        // SAFETY: still holding APPDATA_LOCK; see `AppdataGuard::new`.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var("APPDATA", original);
            }
        } else {
            unsafe {
                std::env::remove_var("APPDATA");
            }
        }
    }
}
