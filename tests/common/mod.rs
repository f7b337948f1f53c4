//! Shared integration test helpers for par-windows.
//!
//! Provides in-memory collaborators (filesystem, workspace resolver) and a
//! [`Harness`] that wires an [`Orchestrator`] to a [`HeadlessHost`], a
//! shared recents list and an in-memory session slot.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{Harness, cli, uri};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per test file.

#![allow(dead_code)]

use anyhow::anyhow;
use par_windows::backups::InMemoryBackups;
use par_windows::host::{HeadlessHost, HostEvent};
use par_windows::orchestrator::{OpenConfiguration, OpenContext, OpenResult, WaitMarker};
use par_windows::recents::{RecentlyOpened, SharedRecents};
use par_windows::session::{MemoryStateSlot, SessionStore, WindowsState};
use par_windows::traits::{FileKind, FileSystem, WorkspaceResolver};
use par_windows::window::{OpenedContent, WindowRecord};
use par_windows::workspace::{WorkspaceId, WorkspaceIdentity};
use par_windows::{Orchestrator, ResourceUri, Services, StartupContext, WindowId};
use par_windows_config::Config;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// `file://` URI for an absolute test path
pub fn uri(path: &str) -> ResourceUri {
    ResourceUri::parse(&format!("file://{path}")).expect("test path should form a URI")
}

/// Command-line request for `paths`, resolved against `/`
pub fn cli(paths: &[&str]) -> OpenConfiguration {
    OpenConfiguration::new(OpenContext::CommandLine)
        .with_cli_paths(paths.iter().copied())
        .with_cwd("/")
}

/// First open request of a process, without targets
pub fn startup() -> OpenConfiguration {
    OpenConfiguration {
        initial_startup: true,
        ..OpenConfiguration::new(OpenContext::CommandLine).with_cwd("/")
    }
}

pub fn marker(name: &str) -> WaitMarker {
    WaitMarker(PathBuf::from(format!("/tmp/{name}.wait")))
}

// ── Filesystem ──────────────────────────────────────────────────────────────

/// In-memory filesystem; clones share entries so tests can change it while
/// an orchestrator holds a copy
#[derive(Clone, Default)]
pub struct FakeFs(Arc<Mutex<HashMap<PathBuf, FileKind>>>);

impl FakeFs {
    pub fn with_dirs(dirs: &[&str]) -> Self {
        let fs = Self::default();
        for dir in dirs {
            fs.add_dir(dir);
        }
        fs
    }

    pub fn add_dir(&self, path: &str) {
        self.0.lock().insert(PathBuf::from(path), FileKind::Directory);
    }

    pub fn add_file(&self, path: &str) {
        self.0.lock().insert(PathBuf::from(path), FileKind::File);
    }

    pub fn remove(&self, path: &str) {
        self.0.lock().remove(Path::new(path));
    }
}

impl FileSystem for FakeFs {
    fn stat(&self, path: &Path) -> Option<FileKind> {
        self.0.lock().get(path).copied()
    }
}

// ── Workspaces ──────────────────────────────────────────────────────────────

/// Workspace resolver over known config files; ad-hoc workspaces are
/// derived from the folder list without touching disk
#[derive(Clone, Default)]
pub struct FakeWorkspaces {
    configs: Arc<Mutex<HashMap<ResourceUri, Vec<ResourceUri>>>>,
    fail_ad_hoc: Arc<Mutex<bool>>,
    created: Arc<Mutex<usize>>,
}

impl FakeWorkspaces {
    /// Register a readable workspace config with its root folders
    pub fn add_config(&self, config: &str, folders: &[&str]) {
        self.configs
            .lock()
            .insert(uri(config), folders.iter().map(|f| uri(f)).collect());
    }

    pub fn fail_ad_hoc(&self) {
        *self.fail_ad_hoc.lock() = true;
    }

    /// Number of ad-hoc workspaces created so far
    pub fn created(&self) -> usize {
        *self.created.lock()
    }
}

impl WorkspaceResolver for FakeWorkspaces {
    fn resolve_workspace_config(&self, config: &ResourceUri) -> Option<WorkspaceIdentity> {
        self.configs
            .lock()
            .get(config)
            .map(|folders| WorkspaceIdentity::from_config(config.clone()).with_folders(folders.clone()))
    }

    fn create_ad_hoc_workspace(
        &mut self,
        folders: &[ResourceUri],
        _remote_authority: Option<&str>,
    ) -> anyhow::Result<WorkspaceIdentity> {
        if *self.fail_ad_hoc.lock() {
            return Err(anyhow!("workspace storage is read-only"));
        }
        *self.created.lock() += 1;
        let key = WorkspaceId::for_folders(folders);
        let config = uri(&format!("/state/workspaces/{key}/workspace.code-workspace"));
        Ok(WorkspaceIdentity::from_config(config).with_folders(folders.to_vec()))
    }
}

// ── Harness ─────────────────────────────────────────────────────────────────

/// An orchestrator plus handles on everything it talks to
pub struct Harness {
    pub orchestrator: Orchestrator<HeadlessHost>,
    pub fs: FakeFs,
    pub workspaces: FakeWorkspaces,
    pub backups: InMemoryBackups,
    pub recents: SharedRecents,
    pub state: MemoryStateSlot,
    pub config: Config,
    pub startup: StartupContext,
}

impl Harness {
    pub fn new(fs: FakeFs) -> Self {
        Self::with_config(fs, Config::default())
    }

    pub fn with_config(fs: FakeFs, config: Config) -> Self {
        Self::build(
            fs,
            FakeWorkspaces::default(),
            InMemoryBackups::default(),
            MemoryStateSlot::new(),
            config,
            StartupContext::default(),
        )
    }

    pub fn build(
        fs: FakeFs,
        workspaces: FakeWorkspaces,
        backups: InMemoryBackups,
        state: MemoryStateSlot,
        config: Config,
        startup: StartupContext,
    ) -> Self {
        let recents: SharedRecents = Arc::new(Mutex::new(RecentlyOpened::new(
            config.max_recent_entries,
        )));
        let services = Services {
            fs: Box::new(fs.clone()),
            workspaces: Box::new(workspaces.clone()),
            backups: Box::new(backups.clone()),
            recents: Box::new(recents.clone()),
        };
        let orchestrator = Orchestrator::new(
            config.clone(),
            HeadlessHost::default(),
            services,
            SessionStore::new(Box::new(state.clone())),
            startup,
        );
        Self {
            orchestrator,
            fs,
            workspaces,
            backups,
            recents,
            state,
            config,
            startup,
        }
    }

    pub fn open(&mut self, config: OpenConfiguration) -> OpenResult {
        self.orchestrator.open(config)
    }

    /// Quit the application: shutdown signal, then every window closes
    pub fn shutdown(&mut self) {
        self.orchestrator.on_before_shutdown();
        for id in self.window_ids() {
            self.close(id);
        }
    }

    /// Quit on a platform that closes every window before the shutdown
    /// signal arrives
    pub fn quit_closing_windows_first(&mut self) {
        self.orchestrator.on_quit_requested();
        for id in self.window_ids() {
            self.close(id);
        }
        self.orchestrator.on_before_shutdown();
    }

    /// The user closes one window
    pub fn close(&mut self, id: WindowId) {
        self.orchestrator.on_before_window_close(id);
        self.orchestrator.host_mut().close(id);
    }

    /// Shut down and start a fresh process over the same state slot
    pub fn restart(mut self) -> Self {
        self.shutdown();
        let startup = self.startup;
        self.relaunch(startup)
    }

    /// Start a fresh process over the same state without shutting down
    pub fn relaunch(self, startup: StartupContext) -> Self {
        Self::build(
            self.fs,
            self.workspaces,
            self.backups,
            self.state,
            self.config,
            startup,
        )
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.orchestrator
            .registry()
            .windows()
            .iter()
            .map(|w| w.id)
            .collect()
    }

    pub fn record(&self, id: WindowId) -> &WindowRecord {
        self.orchestrator
            .registry()
            .get(id)
            .expect("window should be registered")
    }

    pub fn content(&self, id: WindowId) -> OpenedContent {
        self.record(id).content.clone()
    }

    /// Windows showing `folder`
    pub fn windows_on(&self, folder: &str) -> Vec<WindowId> {
        let folder = uri(folder);
        self.orchestrator
            .registry()
            .windows()
            .iter()
            .filter(|w| w.content.folder() == Some(&folder))
            .map(|w| w.id)
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        self.orchestrator.host_mut().take_events()
    }

    pub fn created_count(events: &[HostEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, HostEvent::Created { .. }))
            .count()
    }

    /// State as persisted in the slot
    pub fn saved_state(&self) -> WindowsState {
        self.state
            .contents()
            .map(|json| serde_json::from_str(&json).expect("saved state should parse"))
            .unwrap_or_default()
    }
}
