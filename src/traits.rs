//! Contracts between the orchestrator and its collaborators.
//!
//! The orchestrator never touches a real window system, filesystem, backup
//! store or recents list directly. Each of those sits behind one of these
//! traits so the open algorithm can be driven by in-memory fakes in tests.

use crate::backups::BackupSlot;
use crate::error::HostError;
use crate::placement::Display;
use crate::recents::RecentEntry;
use crate::uri::ResourceUri;
use crate::window::{LoadPayload, WindowGeometry, WindowId, WindowInstruction};
use crate::workspace::WorkspaceIdentity;
use std::path::Path;

// ── WindowHost ───────────────────────────────────────────────────────────────

/// The window system: materializes windows and delivers instructions.
pub trait WindowHost {
    /// Create a window at `geometry` and start loading `payload` in it.
    fn create(
        &mut self,
        geometry: &WindowGeometry,
        payload: &LoadPayload,
    ) -> Result<WindowId, HostError>;

    /// Deliver an instruction to an existing window.
    fn send(&mut self, window: WindowId, instruction: WindowInstruction);

    /// Bring a window to the front.
    fn focus(&mut self, window: WindowId);

    /// Current bounds of a window, if the host can report them.
    fn current_bounds(&self, window: WindowId) -> Option<WindowGeometry>;

    /// Whether the window finished loading and accepts instructions.
    fn is_ready(&self, window: WindowId) -> bool;

    /// Attached displays.
    fn displays(&self) -> Vec<Display>;

    /// Mouse cursor position in global coordinates.
    fn cursor_position(&self) -> Option<(i32, i32)>;
}

// ── FileSystem ───────────────────────────────────────────────────────────────

/// Kind of an existing filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

/// Local filesystem lookups used while resolving paths
pub trait FileSystem {
    /// `None` when nothing exists at `path`
    fn stat(&self, path: &Path) -> Option<FileKind>;
}

// ── WorkspaceResolver ────────────────────────────────────────────────────────

/// Reads workspace configs and creates ad-hoc workspaces.
pub trait WorkspaceResolver {
    /// Identity of the workspace whose config lives at `uri`, or `None` when
    /// `uri` is not a readable workspace config.
    fn resolve_workspace_config(&self, uri: &ResourceUri) -> Option<WorkspaceIdentity>;

    /// Create (or reuse) a workspace grouping `folders`. The same folder list
    /// always yields the same identity.
    fn create_ad_hoc_workspace(
        &mut self,
        folders: &[ResourceUri],
        remote_authority: Option<&str>,
    ) -> anyhow::Result<WorkspaceIdentity>;
}

// ── BackupRegistry ───────────────────────────────────────────────────────────

/// Windows that left unsaved state behind and must be restored
pub trait BackupRegistry {
    fn folder_backups(&self) -> Vec<ResourceUri>;
    fn workspace_backups(&self) -> Vec<WorkspaceIdentity>;
    fn empty_window_backups(&self) -> Vec<BackupSlot>;
}

// ── RecentsSink ──────────────────────────────────────────────────────────────

/// Receives entries for the recently opened list
pub trait RecentsSink {
    fn add_recent(&mut self, entries: Vec<RecentEntry>);
}
