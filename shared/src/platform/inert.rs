// Placeholder adapter for targets without a native implementation.
//
// Linux would need X11 input shapes (XShapeCombineRectangles on ShapeInput)
// or a Wayland input region, plus XGrabKey/evdev for the key. None of that is
// wired up, so this adapter never sees the key and never finds the window.

use std::sync::atomic::{AtomicBool, Ordering};

use super::{PlatformAdapter, WindowHandle};
use crate::error::NativeError;

/// Stub adapter: key never pressed, window never found, writes ignored.
#[derive(Debug, Default)]
pub struct InertPlatform {
    warned: AtomicBool,
}

impl PlatformAdapter for InertPlatform {
    fn find_window(&self, title: &str) -> Result<Option<WindowHandle>, NativeError> {
        if !self.warned.swap(true, Ordering::Relaxed) {
            log::warn!("[Overlay] click-through is not supported on this platform; {title:?} stays interactive");
        }
        Ok(None)
    }

    fn set_click_through(&self, _window: WindowHandle, _enabled: bool) -> Result<(), NativeError> {
        Ok(())
    }

    fn is_toggle_key_pressed(&self) -> bool {
        false
    }
}
