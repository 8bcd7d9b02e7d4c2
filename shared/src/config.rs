use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Title of the overlay window created by the application shell.
pub const WINDOW_TITLE: &str = "HoverInk";

/// Overlay settings. Everything is fixed at build time; nothing is read from
/// disk or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Exact title of the window to make click-through.
    pub window_title: String,
    pub watcher: WatcherConfig,
    /// Retry schedule for the one-off window preparation.
    pub window_setup: SetupRetry,
}

/// Key watcher timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Delay between two key-state polls.
    pub poll_interval_ms: u64,
    /// Extra pause after a toggle fires, long enough to outlast a key press.
    pub settle_delay_ms: u64,
    /// Wait before the first poll while the window is still coming up.
    pub startup_grace_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetupRetry {
    pub attempts: u32,
    pub interval_ms: u64,
}

impl OverlayConfig {
    /// Settings for the platform this binary is built for.
    pub fn for_target() -> Self {
        Self {
            window_title: WINDOW_TITLE.into(),
            watcher: WatcherConfig::for_target(),
            window_setup: SetupRetry::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::for_target()
    }
}

impl WatcherConfig {
    /// Win32 polling: fast cadence plus a settle pause after each toggle.
    pub const fn style_bit() -> Self {
        Self {
            poll_interval_ms: 10,
            settle_delay_ms: 300,
            startup_grace_ms: 0,
        }
    }

    /// Cocoa polling: one frame per poll, grace period while AppKit finishes
    /// bringing the window up.
    pub const fn event_source() -> Self {
        Self {
            poll_interval_ms: 16,
            settle_delay_ms: 0,
            startup_grace_ms: 2_000,
        }
    }

    /// Idle cadence for the stub adapter, whose key is never pressed.
    pub const fn inert() -> Self {
        Self {
            poll_interval_ms: 1_000,
            settle_delay_ms: 0,
            startup_grace_ms: 0,
        }
    }

    pub const fn for_target() -> Self {
        if cfg!(target_os = "windows") {
            Self::style_bit()
        } else if cfg!(target_os = "macos") {
            Self::event_source()
        } else {
            Self::inert()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::for_target()
    }
}

impl SetupRetry {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SetupRetry {
    fn default() -> Self {
        Self {
            attempts: 50,
            interval_ms: 100,
        }
    }
}
