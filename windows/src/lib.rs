// Win32 click-through adapter using windows-rs.
//
// Click-through is the style-bit strategy: read GWL_EXSTYLE, add
// WS_EX_LAYERED | WS_EX_TRANSPARENT (or drop WS_EX_TRANSPARENT again) and
// write it back. The toggle key is Escape, read with GetAsyncKeyState so it
// works while another application has focus.

#![cfg(target_os = "windows")]

use hoverink_shared::error::NativeError;
use hoverink_shared::platform::{PlatformAdapter, WindowHandle};
use hoverink_shared::style;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{GetLastError, SetLastError, HWND, WIN32_ERROR};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_ESCAPE};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, GWL_EXSTYLE, WINDOW_LONG_PTR_INDEX, WS_EX_LAYERED, WS_EX_TRANSPARENT,
};

const _: () = assert!(WS_EX_TRANSPARENT.0 as isize == style::WS_EX_TRANSPARENT);
const _: () = assert!(WS_EX_LAYERED.0 as isize == style::WS_EX_LAYERED);

/// High bit of GetAsyncKeyState: key is down right now.
const KEY_DOWN: u16 = 0x8000;

/// Style-bit adapter for Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl PlatformAdapter for Win32Platform {
    fn find_window(&self, title: &str) -> Result<Option<WindowHandle>, NativeError> {
        let name = wide(title)?;

        // FindWindowW reports a miss as an error with no last-error code
        match unsafe { FindWindowW(PCWSTR::null(), PCWSTR(name.as_ptr())) } {
            Ok(hwnd) if !hwnd.is_invalid() => Ok(Some(WindowHandle::from_raw(hwnd.0 as usize))),
            Ok(_) => Ok(None),
            Err(err) => {
                log::debug!("[Windows] FindWindowW({title:?}): {err}");
                Ok(None)
            }
        }
    }

    fn set_click_through(&self, window: WindowHandle, enabled: bool) -> Result<(), NativeError> {
        let hwnd = hwnd(window);

        unsafe {
            let current = long_ptr::get(hwnd, GWL_EXSTYLE);
            let next = style::compose_ex_style(current, enabled);

            // A zero return is only a failure when the last error is set
            SetLastError(WIN32_ERROR(0));
            if long_ptr::set(hwnd, GWL_EXSTYLE, next) == 0 {
                let code = GetLastError();
                if code.0 != 0 {
                    return Err(NativeError::Call {
                        call: long_ptr::SET_CALL,
                        code: i64::from(code.0),
                    });
                }
            }
            log::debug!("[Windows] ex-style {current:#x} -> {next:#x}");
        }
        Ok(())
    }

    fn is_toggle_key_pressed(&self) -> bool {
        let state = unsafe { GetAsyncKeyState(i32::from(VK_ESCAPE.0)) };
        (state as u16 & KEY_DOWN) != 0
    }
}

// The *LongPtr* entry points only exist on 64-bit; 32-bit Windows keeps the
// window longs pointer-sized under the plain names.
#[cfg(target_pointer_width = "64")]
mod long_ptr {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowLongPtrW, SetWindowLongPtrW};

    pub(crate) const SET_CALL: &str = "SetWindowLongPtrW";

    pub(crate) unsafe fn get(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> isize {
        GetWindowLongPtrW(hwnd, index)
    }

    pub(crate) unsafe fn set(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: isize) -> isize {
        SetWindowLongPtrW(hwnd, index, value)
    }
}

#[cfg(target_pointer_width = "32")]
mod long_ptr {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowLongW, SetWindowLongW};

    pub(crate) const SET_CALL: &str = "SetWindowLongW";

    pub(crate) unsafe fn get(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> isize {
        GetWindowLongW(hwnd, index) as isize
    }

    pub(crate) unsafe fn set(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: isize) -> isize {
        SetWindowLongW(hwnd, index, value as i32) as isize
    }
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.as_raw() as *mut std::ffi::c_void)
}

/// NUL-terminated UTF-16 for the W APIs. Interior NULs would silently
/// truncate the title, so they are rejected.
fn wide(title: &str) -> Result<Vec<u16>, NativeError> {
    if title.contains('\0') {
        return Err(NativeError::Encoding {
            title: title.to_owned(),
        });
    }
    Ok(title.encode_utf16().chain(std::iter::once(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_title_is_nul_terminated() {
        let encoded = wide("HoverInk").unwrap();
        assert_eq!(encoded.len(), "HoverInk".len() + 1);
        assert_eq!(encoded.last(), Some(&0));
    }

    #[test]
    fn interior_nul_is_an_encoding_failure() {
        assert!(matches!(
            wide("Hover\0Ink"),
            Err(NativeError::Encoding { .. })
        ));
    }

    #[test]
    fn missing_window_is_not_found() {
        let platform = Win32Platform;
        let title = "HoverInk test window that does not exist 7f3a";
        assert_eq!(platform.find_window(title), Ok(None));
    }

    #[test]
    fn style_write_to_dead_handle_reports_the_call() {
        let platform = Win32Platform;
        let result = platform.set_click_through(WindowHandle::from_raw(0), true);
        match result {
            Err(NativeError::Call { call, code }) => {
                assert_eq!(call, long_ptr::SET_CALL);
                assert_ne!(code, 0);
            }
            other => panic!("expected a failed style write, got {other:?}"),
        }
    }

    #[test]
    fn handle_round_trips_through_hwnd() {
        let window = WindowHandle::from_raw(0x0002_04A6);
        assert_eq!(hwnd(window).0 as usize, window.as_raw());
    }
}
