use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::error::NativeError;
use crate::platform::{PlatformAdapter, WindowHandle};

/// Why the target window could not be resolved this time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("no top-level window titled {0:?}")]
    NotFound(String),

    /// Lookup failed natively; behaves exactly like `NotFound`.
    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Lazily resolves the overlay window by title and caches the handle.
///
/// The cache is never invalidated: once a handle is found it is returned
/// without asking the OS again, even if the window has since been destroyed.
/// Misses are not cached, so the next call queries again.
///
/// The cache lock is only held to read or store the handle, never across
/// `find_window`: on macOS that call waits for the main thread, which may
/// itself be waiting on whoever holds a lock.
#[derive(Debug)]
pub struct WindowLocator {
    title: String,
    cached: Mutex<Option<WindowHandle>>,
}

impl WindowLocator {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cached(&self) -> Option<WindowHandle> {
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn resolve(&self, platform: &dyn PlatformAdapter) -> Result<WindowHandle, LocateError> {
        if let Some(window) = self.cached() {
            return Ok(window);
        }

        match platform.find_window(&self.title)? {
            Some(window) => {
                // Concurrent lookups may both succeed; the first stored wins
                let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
                let window = *cached.get_or_insert(window);
                log::debug!("[Locator] {:?} resolved to {:#x}", self.title, window.as_raw());
                Ok(window)
            }
            None => Err(LocateError::NotFound(self.title.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;

    const WINDOW: WindowHandle = WindowHandle::from_raw(0xBEEF);

    #[test]
    fn second_resolve_uses_cache() {
        let platform = MockPlatform::with_window(WINDOW);
        let locator = WindowLocator::new("HoverInk");

        assert_eq!(locator.resolve(&platform), Ok(WINDOW));
        assert_eq!(locator.resolve(&platform), Ok(WINDOW));
        assert_eq!(platform.find_calls(), 1);
    }

    #[test]
    fn cached_handle_survives_window_disappearing() {
        let platform = MockPlatform::with_window(WINDOW);
        let locator = WindowLocator::new("HoverInk");
        locator.resolve(&platform).unwrap();

        platform.set_window(None);
        assert_eq!(locator.resolve(&platform), Ok(WINDOW));
        assert_eq!(platform.find_calls(), 1);
    }

    #[test]
    fn miss_is_not_cached() {
        let platform = MockPlatform::new();
        let locator = WindowLocator::new("HoverInk");

        assert_eq!(
            locator.resolve(&platform),
            Err(LocateError::NotFound("HoverInk".into()))
        );
        assert_eq!(locator.cached(), None);

        platform.set_window(Some(WINDOW));
        assert_eq!(locator.resolve(&platform), Ok(WINDOW));
        assert_eq!(platform.find_calls(), 2);
    }

    #[test]
    fn encoding_failure_resolves_nothing() {
        let platform = MockPlatform::with_window(WINDOW);
        platform.fail_encoding(true);
        let locator = WindowLocator::new("Hover\0Ink");

        let err = locator.resolve(&platform).unwrap_err();
        assert!(matches!(err, LocateError::Native(NativeError::Encoding { .. })));
        assert_eq!(locator.cached(), None);
    }
}
