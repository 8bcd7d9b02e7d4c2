use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::locator::WindowLocator;
use crate::metrics::{FailureCounters, FailureSnapshot};
use crate::notify::{NotificationSink, MODE_CHANGED_EVENT};
use crate::platform::{PlatformAdapter, WindowHandle};

/// Owns the click-through flag and the cached window handle.
///
/// Mode changes go through one mutex, so the key watcher and any other
/// trigger (a UI command, say) can call [`toggle`](Self::toggle) concurrently.
/// The guard is held across the native write and the emit, so events leave in
/// the same order the state changed. Window lookup happens before the guard
/// is taken and never under it.
pub struct ClickThroughController {
    platform: Arc<dyn PlatformAdapter>,
    sink: Arc<dyn NotificationSink>,
    locator: WindowLocator,
    click_through: Mutex<bool>,
    failures: FailureCounters,
}

impl ClickThroughController {
    pub fn new(
        window_title: impl Into<String>,
        platform: Arc<dyn PlatformAdapter>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            platform,
            sink,
            locator: WindowLocator::new(window_title),
            click_through: Mutex::new(false),
            failures: FailureCounters::default(),
        }
    }

    /// Flips click-through on the overlay window and emits `modeChanged`.
    ///
    /// Returns the new mode, or `None` when the window could not be resolved,
    /// in which case nothing changes and nothing is emitted. A failed native
    /// write is logged and counted but the flag still flips, so the reported
    /// mode can drift from what the OS actually applied.
    pub fn toggle(&self) -> Option<bool> {
        let window = self.resolve_window()?;

        let mut click_through = self.lock();
        *click_through = !*click_through;
        let enabled = *click_through;

        if let Err(err) = self.platform.set_click_through(window, enabled) {
            log::warn!("[Overlay] click-through write ignored: {err}");
            self.failures.record_native(&err);
        }
        self.failures.record_toggle();

        log::info!(
            "[Overlay] click-through {}",
            if enabled { "enabled" } else { "disabled" }
        );
        self.sink.emit(MODE_CHANGED_EVENT, enabled);
        Some(enabled)
    }

    /// Resolves (and caches) the overlay window without touching the mode.
    pub fn resolve_window(&self) -> Option<WindowHandle> {
        match self.locator.resolve(self.platform.as_ref()) {
            Ok(window) => Some(window),
            Err(err) => {
                log::debug!("[Overlay] {err}");
                self.failures.record_locate(&err);
                None
            }
        }
    }

    pub fn is_click_through(&self) -> bool {
        *self.lock()
    }

    pub fn failures(&self) -> FailureSnapshot {
        self.failures.snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.click_through.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
