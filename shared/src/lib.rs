//! Click-through toggling core for the HoverInk overlay.
//!
//! Finds the overlay window by title, flips it between input-transparent and
//! interactive, and watches a global key that drives the flip. The native
//! half lives behind [`platform::PlatformAdapter`]; the application shell
//! provides a [`notify::NotificationSink`] and calls [`Overlay::builder`] once
//! its window exists.

pub mod config;
pub mod controller;
pub mod error;
pub mod lifetime;
pub mod locator;
pub mod metrics;
pub mod notify;
pub mod overlay;
pub mod platform;
pub mod style;
pub mod watcher;

pub use config::{OverlayConfig, WatcherConfig, WINDOW_TITLE};
pub use controller::ClickThroughController;
pub use error::NativeError;
pub use metrics::FailureSnapshot;
pub use notify::{NotificationSink, MODE_CHANGED_EVENT};
pub use overlay::{Overlay, OverlayBuilder};
pub use platform::{PlatformAdapter, WindowHandle, WindowSetup};
