// macOS click-through adapter using Cocoa via objc2.
//
// Strategy:
//   • The overlay NSWindow is found by title among NSApp.windows and kept
//     retained for the life of the process.
//   • Click-through is NSWindow.setIgnoresMouseEvents, queued on the main
//     thread without waiting for it to run.
//   • The toggle key (Escape, key code 53) is read from the HID system state
//     with CGEventSourceKeyState, so it is seen whichever app has focus.
//   • Once the window exists it is made fully transparent: clear background,
//     no NSVisualEffectView blur, clear non-opaque backing layer.

#![cfg(target_os = "macos")]

mod dispatch;

use std::ffi::c_void;

use hoverink_shared::error::NativeError;
use hoverink_shared::platform::{PlatformAdapter, WindowHandle, WindowSetup};
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{msg_send, ClassType, MainThreadMarker};
use objc2_app_kit::{NSApplication, NSColor, NSVisualEffectView, NSWindow};
use objc2_foundation::{NSObjectProtocol, NSUInteger};

// ── Core Graphics FFI ───────────────────────────────────────────────────────

type CGEventSourceStateID = i32;
type CGKeyCode = u16;
type CGColorRef = *const c_void;

const K_CG_EVENT_SOURCE_STATE_HID_SYSTEM_STATE: CGEventSourceStateID = 1;
const KEY_ESCAPE: CGKeyCode = 53;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventSourceKeyState(state_id: CGEventSourceStateID, key: CGKeyCode) -> bool;
    fn CGColorGetConstantColor(color_name: *const c_void) -> CGColorRef;
    static kCGColorClear: *const c_void;
}

// ── Adapter ─────────────────────────────────────────────────────────────────

/// Compositor-object adapter for macOS.
#[derive(Debug, Default, Clone, Copy)]
pub struct CocoaPlatform;

impl PlatformAdapter for CocoaPlatform {
    fn find_window(&self, title: &str) -> Result<Option<WindowHandle>, NativeError> {
        Ok(dispatch::main_sync(|| find_window_on_main(title)).flatten())
    }

    fn set_click_through(&self, window: WindowHandle, enabled: bool) -> Result<(), NativeError> {
        let raw = window.as_raw();
        dispatch::main_async(move || unsafe {
            if let Some(window) = ns_window(raw) {
                window.setIgnoresMouseEvents(enabled);
            }
        });
        Ok(())
    }

    fn is_toggle_key_pressed(&self) -> bool {
        unsafe { CGEventSourceKeyState(K_CG_EVENT_SOURCE_STATE_HID_SYSTEM_STATE, KEY_ESCAPE) }
    }
}

impl WindowSetup for CocoaPlatform {
    fn prepare_window(&self, window: WindowHandle) -> Result<(), NativeError> {
        let raw = window.as_raw();
        dispatch::main_async(move || unsafe {
            if let Some(window) = ns_window(raw) {
                make_transparent(window);
            }
        });
        Ok(())
    }
}

// ── Internal ────────────────────────────────────────────────────────────────

/// Must run on the main thread.
fn find_window_on_main(title: &str) -> Option<WindowHandle> {
    let mtm = MainThreadMarker::new()?;
    let windows = NSApplication::sharedApplication(mtm).windows();
    let count: NSUInteger = windows.count();
    for i in 0..count {
        let window = windows.objectAtIndex(i);
        if window.title().to_string() == title {
            log::debug!("[macOS] found {title:?} at index {i} of {count}");
            // Keep the reference alive for the process lifetime
            let raw = Retained::into_raw(window);
            return Some(WindowHandle::from_raw(raw as usize));
        }
    }
    None
}

/// Turns a handle back into the window it was created from.
///
/// Safety: `raw` must come from `find_window_on_main`, and the caller must be
/// on the main thread.
unsafe fn ns_window<'a>(raw: usize) -> Option<&'a NSWindow> {
    (raw as *const NSWindow).as_ref()
}

/// Clears every layer of background AppKit and the webview shell may draw.
///
/// Safety: main thread only.
unsafe fn make_transparent(window: &NSWindow) {
    let clear = NSColor::clearColor();
    let _: () = msg_send![window, setBackgroundColor: &*clear];
    window.setOpaque(false);

    let Some(content) = window.contentView() else {
        return;
    };

    // A translucent shell window gets an NSVisualEffectView that paints a
    // dark blur behind the webview
    let subviews = content.subviews();
    for i in 0..subviews.count() {
        let view = subviews.objectAtIndex(i);
        if view.isKindOfClass(NSVisualEffectView::class()) {
            view.removeFromSuperview();
        }
    }

    content.setWantsLayer(true);
    let layer: *mut AnyObject = msg_send![&*content, layer];
    if let Some(layer) = layer.as_ref() {
        let _: () = msg_send![layer, setBackgroundColor: CGColorGetConstantColor(kCGColorClear)];
        let _: () = msg_send![layer, setOpaque: false];
    }
    log::info!("[macOS] overlay window made transparent");
}
