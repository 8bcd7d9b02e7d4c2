//! Native primitives behind the click-through core.
//!
//! Exactly one [`PlatformAdapter`] is linked into a build: the Win32 style-bit
//! adapter, the Cocoa adapter, or [`inert::InertPlatform`] everywhere else.
//! Locator, controller and watcher only ever see the trait.

use crate::error::NativeError;

pub mod inert;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

/// Opaque reference to one top-level window.
///
/// Holds the raw `HWND` value on Windows and a retained `NSWindow` pointer on
/// macOS. Handles are never re-validated; once the window is gone every
/// operation on a stale handle is a silent no-op or a swallowed failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// The three per-platform primitives.
pub trait PlatformAdapter: Send + Sync {
    /// Searches top-level windows for an exact title match.
    ///
    /// `Ok(None)` means no such window right now. A title the OS cannot
    /// represent is reported as [`NativeError::Encoding`].
    fn find_window(&self, title: &str) -> Result<Option<WindowHandle>, NativeError>;

    /// Makes `window` pass pointer input through (`enabled`) or reclaim it.
    fn set_click_through(&self, window: WindowHandle, enabled: bool) -> Result<(), NativeError>;

    /// Whether the toggle key is held right now, regardless of focus.
    fn is_toggle_key_pressed(&self) -> bool;
}

/// One-off preparation applied to the window once it first resolves.
///
/// Only the Cocoa adapter needs this: it strips the decorations the shell
/// adds so the window composites as fully transparent.
pub trait WindowSetup: Send + Sync {
    fn prepare_window(&self, window: WindowHandle) -> Result<(), NativeError>;
}
