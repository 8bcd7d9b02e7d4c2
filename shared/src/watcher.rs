// Global toggle-key watcher.
//
// Polls the key state on its own thread, independent of window focus, and
// toggles once per press. Only the previous poll's state is kept.

use std::sync::Arc;

use crate::config::WatcherConfig;
use crate::controller::ClickThroughController;
use crate::lifetime::ShutdownSignal;
use crate::platform::PlatformAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Key up; the next press fires.
    Idle,
    /// Key held and already actioned; waits for release.
    Armed,
}

/// Outcome of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Idle,
    Fired,
    Held,
    Released,
}

pub struct KeyWatcher {
    platform: Arc<dyn PlatformAdapter>,
    controller: Arc<ClickThroughController>,
    config: WatcherConfig,
    state: WatchState,
}

impl KeyWatcher {
    pub fn new(
        platform: Arc<dyn PlatformAdapter>,
        controller: Arc<ClickThroughController>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            platform,
            controller,
            config,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Reads the key once and toggles on the rising edge.
    pub fn poll(&mut self) -> Poll {
        let pressed = self.platform.is_toggle_key_pressed();
        match (self.state, pressed) {
            (WatchState::Idle, true) => {
                self.state = WatchState::Armed;
                self.controller.toggle();
                Poll::Fired
            }
            (WatchState::Idle, false) => Poll::Idle,
            (WatchState::Armed, true) => Poll::Held,
            (WatchState::Armed, false) => {
                self.state = WatchState::Idle;
                Poll::Released
            }
        }
    }

    /// Polls until `shutdown` is cancelled.
    ///
    /// Waits out the startup grace first, and after every toggle pauses for
    /// the settle delay before resuming the normal cadence.
    pub fn run(mut self, shutdown: &ShutdownSignal) {
        let grace = self.config.startup_grace();
        let settle = self.config.settle_delay();
        let interval = self.config.poll_interval();

        if !grace.is_zero() {
            log::debug!("[Overlay] key watcher waiting {grace:?} before first poll");
            if shutdown.sleep(grace) {
                return;
            }
        }
        log::info!("[Overlay] key watcher polling every {interval:?}");

        loop {
            if self.poll() == Poll::Fired && !settle.is_zero() && shutdown.sleep(settle) {
                break;
            }
            if shutdown.sleep(interval) {
                break;
            }
        }
        log::info!("[Overlay] key watcher stopped");
    }
}
