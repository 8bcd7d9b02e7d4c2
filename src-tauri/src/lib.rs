use serde::Serialize;
use std::sync::{Arc, Mutex};
use tauri::{AppHandle, Emitter, Manager, RunEvent, State};

use hoverink_shared::{ClickThroughController, FailureSnapshot, NotificationSink, Overlay, OverlayConfig};

#[cfg(target_os = "windows")]
type NativePlatform = hoverink_windows::Win32Platform;
#[cfg(target_os = "macos")]
type NativePlatform = hoverink_macos::CocoaPlatform;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
type NativePlatform = hoverink_shared::platform::inert::InertPlatform;

/// Forwards mode changes to the webview as global events.
struct AppEmitter(AppHandle);

impl NotificationSink for AppEmitter {
    fn emit(&self, name: &str, payload: bool) {
        if let Err(err) = self.0.emit(name, payload) {
            log::debug!("[Shell] emit {name} failed: {err}");
        }
    }
}

/// Shared application state
#[derive(Default)]
pub struct OverlayState {
    overlay: Mutex<Option<Overlay>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStatus {
    pub running: bool,
    pub click_through: bool,
    pub failures: FailureSnapshot,
}

fn controller(app: &AppHandle) -> Option<Arc<ClickThroughController>> {
    let state: State<OverlayState> = app.state();
    let guard = state.overlay.lock().unwrap_or_else(|e| e.into_inner());
    guard.as_ref().map(|overlay| overlay.controller().clone())
}

// Commands are async so they run off the main thread: the controller may be
// waiting on the main thread (Cocoa lookup, Win32 style messages) while it
// holds its own lock.

/// Tauri command: current mode and failure counters
#[tauri::command]
async fn overlay_status(app: AppHandle) -> OverlayStatus {
    match controller(&app) {
        Some(controller) => OverlayStatus {
            running: true,
            click_through: controller.is_click_through(),
            failures: controller.failures(),
        },
        None => OverlayStatus {
            running: false,
            click_through: false,
            failures: FailureSnapshot::default(),
        },
    }
}

/// Tauri command: toggle from the UI. Returns the new mode, or null when the
/// window could not be found.
#[tauri::command]
async fn toggle_click_through(app: AppHandle) -> Option<bool> {
    controller(&app)?.toggle()
}

fn start_overlay(app: &AppHandle) -> std::io::Result<Overlay> {
    let config = OverlayConfig::for_target();
    let platform = Arc::new(NativePlatform::default());
    let sink = Arc::new(AppEmitter(app.clone()));

    #[allow(unused_mut)]
    let mut builder = Overlay::builder(config, platform.clone(), sink);
    #[cfg(target_os = "macos")]
    {
        builder = builder.window_setup(platform);
    }
    builder.start()
}

/// Build and run the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .manage(OverlayState::default())
        .setup(|app| {
            let overlay = start_overlay(app.handle())?;
            let state: State<OverlayState> = app.state();
            *state.overlay.lock().unwrap_or_else(|e| e.into_inner()) = Some(overlay);
            log::info!("[Shell] HoverInk ready; press Escape to toggle click-through");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![overlay_status, toggle_click_through])
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(err) => {
            eprintln!("[Shell] error while building tauri application: {err}");
            std::process::exit(1);
        }
    };

    app.run(|handle, event| {
        if let RunEvent::Exit = event {
            let state: State<OverlayState> = handle.state();
            let overlay = state.overlay.lock().unwrap_or_else(|e| e.into_inner()).take();
            // Exit runs on the main thread; joining here could wait on a
            // worker that is itself waiting for the main queue
            if let Some(overlay) = overlay {
                if let Err(err) = overlay.shutdown_detached() {
                    log::warn!("[Shell] could not hand off overlay shutdown: {err}");
                }
            }
        }
    });
}
