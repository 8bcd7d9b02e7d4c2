//! Scriptable adapter for tests.
//!
//! Counts window lookups, replays a key-state script, and keeps a simulated
//! extended style word that is updated with the same composition rules as
//! the Win32 adapter.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{PlatformAdapter, WindowHandle, WindowSetup};
use crate::error::NativeError;
use crate::style;

/// A mock implementation of [`PlatformAdapter`] and [`WindowSetup`].
#[derive(Debug, Default)]
pub struct MockPlatform {
    window: Mutex<Option<WindowHandle>>,
    find_calls: AtomicUsize,
    key_polls: AtomicUsize,
    encoding_failure: AtomicBool,
    write_failure: AtomicBool,
    keys: Mutex<VecDeque<bool>>,
    ex_style: Mutex<isize>,
    writes: Mutex<Vec<(WindowHandle, bool)>>,
    prepared: Mutex<Vec<WindowHandle>>,
}

impl MockPlatform {
    /// A platform with no matching window.
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform where the target window exists as `window`.
    pub fn with_window(window: WindowHandle) -> Self {
        let platform = Self::default();
        platform.set_window(Some(window));
        platform
    }

    /// Makes the window appear or disappear for subsequent lookups.
    pub fn set_window(&self, window: Option<WindowHandle>) {
        *self.window.lock().expect("lock poisoned") = window;
    }

    /// Makes lookups fail as if the title could not be encoded.
    pub fn fail_encoding(&self, fail: bool) {
        self.encoding_failure.store(fail, Ordering::SeqCst);
    }

    /// Makes click-through writes report a native failure.
    pub fn fail_writes(&self, fail: bool) {
        self.write_failure.store(fail, Ordering::SeqCst);
    }

    /// Queues key states returned by successive polls; once drained the key
    /// reads as released.
    pub fn script_keys(&self, states: impl IntoIterator<Item = bool>) {
        self.keys.lock().expect("lock poisoned").extend(states);
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn key_polls(&self) -> usize {
        self.key_polls.load(Ordering::SeqCst)
    }

    /// The simulated extended style word.
    pub fn ex_style(&self) -> isize {
        *self.ex_style.lock().expect("lock poisoned")
    }

    /// Every attempted click-through write, failed ones included.
    pub fn writes(&self) -> Vec<(WindowHandle, bool)> {
        self.writes.lock().expect("lock poisoned").clone()
    }

    /// Windows passed to [`WindowSetup::prepare_window`].
    pub fn prepared(&self) -> Vec<WindowHandle> {
        self.prepared.lock().expect("lock poisoned").clone()
    }
}

impl PlatformAdapter for MockPlatform {
    fn find_window(&self, title: &str) -> Result<Option<WindowHandle>, NativeError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.encoding_failure.load(Ordering::SeqCst) {
            return Err(NativeError::Encoding {
                title: title.to_owned(),
            });
        }
        Ok(*self.window.lock().expect("lock poisoned"))
    }

    fn set_click_through(&self, window: WindowHandle, enabled: bool) -> Result<(), NativeError> {
        self.writes
            .lock()
            .expect("lock poisoned")
            .push((window, enabled));
        if self.write_failure.load(Ordering::SeqCst) {
            return Err(NativeError::Call {
                call: "SetWindowLongPtrW",
                code: 1400,
            });
        }
        let mut ex_style = self.ex_style.lock().expect("lock poisoned");
        *ex_style = style::compose_ex_style(*ex_style, enabled);
        Ok(())
    }

    fn is_toggle_key_pressed(&self) -> bool {
        self.key_polls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(false)
    }
}

impl WindowSetup for MockPlatform {
    fn prepare_window(&self, window: WindowHandle) -> Result<(), NativeError> {
        self.prepared.lock().expect("lock poisoned").push(window);
        Ok(())
    }
}
