// Overlay lifecycle: the startup hook and the background threads it owns.
//
// `Overlay::builder(..).start()` is called once by the application shell when
// the UI context exists. It spawns the key watcher and, when the platform
// needs it, a bounded retry loop that prepares the window once it appears.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::{OverlayConfig, SetupRetry};
use crate::controller::ClickThroughController;
use crate::lifetime::ShutdownSignal;
use crate::notify::NotificationSink;
use crate::platform::{PlatformAdapter, WindowSetup};
use crate::watcher::KeyWatcher;

pub struct OverlayBuilder {
    config: OverlayConfig,
    platform: Arc<dyn PlatformAdapter>,
    sink: Arc<dyn NotificationSink>,
    window_setup: Option<Arc<dyn WindowSetup>>,
}

impl OverlayBuilder {
    /// Prepares the window once it first resolves, retrying per
    /// `config.window_setup`.
    pub fn window_setup(mut self, setup: Arc<dyn WindowSetup>) -> Self {
        self.window_setup = Some(setup);
        self
    }

    /// Spawns the background threads.
    pub fn start(self) -> io::Result<Overlay> {
        let controller = Arc::new(ClickThroughController::new(
            self.config.window_title.clone(),
            self.platform.clone(),
            self.sink,
        ));
        let shutdown = ShutdownSignal::new();
        let mut workers = Vec::with_capacity(2);

        if let Some(setup) = self.window_setup {
            let controller = controller.clone();
            let shutdown = shutdown.clone();
            let retry = self.config.window_setup;
            workers.push(
                thread::Builder::new()
                    .name("hoverink-window-setup".into())
                    .spawn(move || prepare_when_ready(&controller, setup.as_ref(), retry, &shutdown))?,
            );
        }

        let watcher = KeyWatcher::new(self.platform, controller.clone(), self.config.watcher);
        let watcher_shutdown = shutdown.clone();
        let spawned = thread::Builder::new()
            .name("hoverink-key-watcher".into())
            .spawn(move || watcher.run(&watcher_shutdown));
        match spawned {
            Ok(handle) => workers.push(handle),
            Err(err) => {
                shutdown.cancel();
                return Err(err);
            }
        }

        log::info!(
            "[Overlay] started for window {:?}",
            self.config.window_title
        );
        Ok(Overlay {
            controller,
            shutdown,
            workers,
        })
    }
}

/// Running overlay core.
///
/// Dropping it leaves the threads running for the rest of the process;
/// [`shutdown`](Self::shutdown) stops them.
pub struct Overlay {
    controller: Arc<ClickThroughController>,
    shutdown: ShutdownSignal,
    workers: Vec<JoinHandle<()>>,
}

impl Overlay {
    pub fn builder(
        config: OverlayConfig,
        platform: Arc<dyn PlatformAdapter>,
        sink: Arc<dyn NotificationSink>,
    ) -> OverlayBuilder {
        OverlayBuilder {
            config,
            platform,
            sink,
            window_setup: None,
        }
    }

    pub fn controller(&self) -> &Arc<ClickThroughController> {
        &self.controller
    }

    /// Toggles from outside the key watcher (tray item, UI command).
    pub fn toggle(&self) -> Option<bool> {
        self.controller.toggle()
    }

    /// Signals every background loop and waits for them to exit.
    pub fn shutdown(mut self) {
        self.shutdown.cancel();
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("worker").to_owned();
            if worker.join().is_err() {
                log::warn!("[Overlay] {name} panicked");
            }
        }
        log::info!("[Overlay] stopped");
    }

    /// Signals every background loop and joins them on a helper thread.
    ///
    /// For the UI thread: a worker may be blocked on a main-queue dispatch
    /// that only drains once the caller returns, so joining inline there can
    /// hang forever. Cancellation takes effect before this returns.
    pub fn shutdown_detached(self) -> io::Result<JoinHandle<()>> {
        self.shutdown.cancel();
        thread::Builder::new()
            .name("hoverink-shutdown".into())
            .spawn(move || self.shutdown())
    }
}

fn prepare_when_ready(
    controller: &ClickThroughController,
    setup: &dyn WindowSetup,
    retry: SetupRetry,
    shutdown: &ShutdownSignal,
) {
    for attempt in 1..=retry.attempts {
        if shutdown.sleep(retry.interval()) {
            return;
        }
        let Some(window) = controller.resolve_window() else {
            continue;
        };
        match setup.prepare_window(window) {
            Ok(()) => log::info!("[Overlay] window prepared (attempt {attempt})"),
            Err(err) => log::warn!("[Overlay] window preparation failed: {err}"),
        }
        return;
    }
    log::warn!(
        "[Overlay] window not found after {} attempts; skipping preparation",
        retry.attempts
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatcherConfig;
    use crate::error::NativeError;
    use crate::notify::RecordingSink;
    use crate::platform::mock::MockPlatform;
    use crate::platform::WindowHandle;
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    const WINDOW: WindowHandle = WindowHandle::from_raw(0x5150);

    fn quick_config(attempts: u32) -> OverlayConfig {
        OverlayConfig {
            watcher: WatcherConfig {
                poll_interval_ms: 1,
                settle_delay_ms: 0,
                startup_grace_ms: 0,
            },
            window_setup: SetupRetry {
                attempts,
                interval_ms: 2,
            },
            ..OverlayConfig::default()
        }
    }

    fn wait_for(mut done: impl FnMut() -> bool) {
        for _ in 0..1_000 {
            if done() {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn prepares_window_once_it_appears() {
        let platform = Arc::new(MockPlatform::new());
        let overlay = Overlay::builder(quick_config(1_000), platform.clone(), Arc::new(RecordingSink::new()))
            .window_setup(platform.clone())
            .start()
            .unwrap();

        thread::sleep(Duration::from_millis(20));
        assert!(platform.prepared().is_empty());

        platform.set_window(Some(WINDOW));
        wait_for(|| !platform.prepared().is_empty());
        overlay.shutdown();

        assert_eq!(platform.prepared(), vec![WINDOW]);
    }

    #[test]
    fn gives_up_after_configured_attempts() {
        let platform = Arc::new(MockPlatform::new());
        let overlay = Overlay::builder(quick_config(3), platform.clone(), Arc::new(RecordingSink::new()))
            .window_setup(platform.clone())
            .start()
            .unwrap();

        thread::sleep(Duration::from_millis(50));
        platform.set_window(Some(WINDOW));
        thread::sleep(Duration::from_millis(20));
        overlay.shutdown();

        assert!(platform.prepared().is_empty());
    }

    #[test]
    fn no_setup_thread_without_window_setup() {
        let platform = Arc::new(MockPlatform::with_window(WINDOW));
        let overlay = Overlay::builder(quick_config(5), platform.clone(), Arc::new(RecordingSink::new()))
            .start()
            .unwrap();

        thread::sleep(Duration::from_millis(20));
        overlay.shutdown();

        assert!(platform.prepared().is_empty());
        assert_eq!(platform.find_calls(), 0);
    }

    #[test]
    fn manual_toggle_shares_state_with_watcher() {
        let platform = Arc::new(MockPlatform::with_window(WINDOW));
        let sink = Arc::new(RecordingSink::new());
        let overlay = Overlay::builder(quick_config(5), platform.clone(), sink.clone())
            .start()
            .unwrap();

        assert_eq!(overlay.toggle(), Some(true));
        platform.script_keys([true, false]);
        wait_for(|| sink.len() == 2);
        overlay.shutdown();

        assert_eq!(sink.mode_changes(), vec![true, false]);
    }

    /// Lookup that parks until the test releases it, like a main-queue
    /// dispatch issued while the main thread is busy.
    struct ParkedLookup {
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl PlatformAdapter for ParkedLookup {
        fn find_window(&self, _title: &str) -> Result<Option<WindowHandle>, NativeError> {
            if let Some(entered) = self.entered.lock().unwrap().take() {
                let _ = entered.send(());
            }
            let _ = self.release.lock().unwrap().recv();
            Ok(None)
        }

        fn set_click_through(&self, _window: WindowHandle, _enabled: bool) -> Result<(), NativeError> {
            Ok(())
        }

        fn is_toggle_key_pressed(&self) -> bool {
            false
        }
    }

    impl WindowSetup for ParkedLookup {
        fn prepare_window(&self, _window: WindowHandle) -> Result<(), NativeError> {
            Ok(())
        }
    }

    #[test]
    fn detached_shutdown_returns_while_a_lookup_is_blocked() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let platform = Arc::new(ParkedLookup {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
        });
        let overlay = Overlay::builder(quick_config(1_000), platform.clone(), Arc::new(RecordingSink::new()))
            .window_setup(platform)
            .start()
            .unwrap();
        entered_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let joiner = overlay.shutdown_detached().unwrap();
        assert!(!joiner.is_finished());

        release_tx.send(()).unwrap();
        joiner.join().unwrap();
    }
}
