//! The window orchestrator.
//!
//! Owns the live [`WindowRegistry`] and decides, for every open request,
//! which windows to create, which to reuse, what each one loads and which
//! ends up focused. It also tracks the host's window lifecycle so the
//! session can be captured at shutdown and restored at the next start.

mod dev_host;
mod focus;
mod open;
pub mod policy;
mod request;
mod restore;
mod wait;

pub use policy::{NewWindowDecision, PlatformCapabilities, decide_new_window};
pub use request::{OpenConfiguration, OpenContext, OpenResult, OpenTargets, OpenedWindow};
pub use wait::{WaitHandle, WaitMarker};

use crate::placement::PlacementEngine;
use crate::session::{SessionStore, ShutdownCapture, WindowsState};
use crate::traits::{BackupRegistry, FileSystem, RecentsSink, WindowHost, WorkspaceResolver};
use crate::window::{WindowGeometry, WindowId, WindowRegistry};
use par_windows_config::Config;
use wait::WaitListeners;

/// Collaborators the orchestrator consults but does not own the state of
pub struct Services {
    pub fs: Box<dyn FileSystem>,
    pub workspaces: Box<dyn WorkspaceResolver>,
    pub backups: Box<dyn BackupRegistry>,
    pub recents: Box<dyn RecentsSink>,
}

/// Facts about how this process was started
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupContext {
    /// Restarted to apply an update; restores every window
    pub relaunched_after_update: bool,
    pub platform: PlatformCapabilities,
}

pub struct Orchestrator<H: WindowHost> {
    settings: Config,
    host: H,
    services: Services,
    registry: WindowRegistry,
    session: SessionStore,
    /// State persisted by the previous run, read once at construction
    previous_state: WindowsState,
    capture: ShutdownCapture,
    waiters: WaitListeners,
    placement: PlacementEngine,
    startup: StartupContext,
}

impl<H: WindowHost> Orchestrator<H> {
    pub fn new(
        settings: Config,
        host: H,
        services: Services,
        session: SessionStore,
        startup: StartupContext,
    ) -> Self {
        let previous_state = session.load();
        let placement = PlacementEngine::new(
            settings.new_window_dimensions,
            (settings.default_window_width, settings.default_window_height),
            startup.platform.global_menu_bar,
        );
        Self {
            settings,
            host,
            services,
            registry: WindowRegistry::new(),
            session,
            previous_state,
            capture: ShutdownCapture::new(),
            waiters: WaitListeners::default(),
            placement,
            startup,
        }
    }

    pub fn settings(&self) -> &Config {
        &self.settings
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn previous_state(&self) -> &WindowsState {
        &self.previous_state
    }

    /// Number of wait listeners not yet fired
    pub fn pending_waits(&self) -> usize {
        self.waiters.len()
    }

    // ── Host lifecycle hooks ────────────────────────────────────────────────

    pub fn notify_window_focused(&mut self, window: WindowId) {
        if !self.registry.mark_focused(window) {
            log::debug!("Focus event for unknown window {}", window);
        }
    }

    /// The window reloaded on its own (user action, crash recovery)
    pub fn notify_window_reloaded(&mut self, window: WindowId) {
        self.waiters.fire(window, "reloaded");
    }

    pub fn notify_ui_state_changed(&mut self, window: WindowId, ui_state: WindowGeometry) {
        self.registry.update_ui_state(window, ui_state);
    }

    /// The window is about to close: capture it, forget it and release any
    /// wait on it
    pub fn on_before_window_close(&mut self, window: WindowId) {
        let Some(record) = self.registry.get(window).cloned() else {
            log::debug!("Close event for unknown window {}", window);
            return;
        };
        let bounds = self.host.current_bounds(window);
        self.capture
            .window_closing(&record, bounds, self.registry.len());
        self.registry.remove(window);
        self.waiters.fire(window, "closed");
        log::info!("Window {} closed ({} remaining)", window, self.registry.len());

        if self.capture.is_shutting_down() {
            self.persist();
        }
    }

    /// The user asked the application to quit. Windows closing after this
    /// count as part of the session, whether or not
    /// [`on_before_shutdown`](Self::on_before_shutdown) has fired yet.
    pub fn on_quit_requested(&mut self) {
        log::info!("Quit requested with {} open windows", self.registry.len());
        self.capture.begin_quit();
    }

    /// The application is about to quit: capture every open window and
    /// persist. Safe to call more than once.
    pub fn on_before_shutdown(&mut self) {
        let host = &self.host;
        let windows: Vec<_> = self
            .registry
            .windows()
            .iter()
            .map(|record| (record, host.current_bounds(record.id)))
            .collect();
        log::info!("Shutting down with {} open windows", windows.len());
        self.capture.begin_shutdown(windows);
        self.persist();
    }

    /// The state that would be persisted right now
    pub fn pending_state(&self) -> WindowsState {
        self.capture.build_state(&self.previous_state)
    }

    fn persist(&mut self) {
        let state = self.capture.build_state(&self.previous_state);
        self.session.save(&state);
    }
}
