//! Window session state persisted across restarts
//!
//! At shutdown the open windows are captured into a [`WindowsState`] and
//! written to a state slot; at the next startup that state decides which
//! windows are reconstructed and where they appear.

pub mod capture;
pub mod restore;
pub mod storage;

pub use capture::ShutdownCapture;
pub use restore::windows_to_restore;
pub use storage::{FileStateSlot, MemoryStateSlot, SessionStore, StateSlot};

use crate::backups::BackupSlot;
use crate::uri::ResourceUri;
use crate::window::{OpenedContent, WindowGeometry, WindowRecord};
use crate::workspace::WorkspaceIdentity;
use serde::{Deserialize, Serialize};

/// Everything the window manager remembers between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsState {
    /// Timestamp when the state was saved (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_window: Option<WindowSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_extension_development_host_window: Option<WindowSnapshot>,
    /// Only populated when two or more windows were open at shutdown
    #[serde(default)]
    pub opened_windows: Vec<WindowSnapshot>,
}

impl WindowsState {
    pub fn is_empty(&self) -> bool {
        self.last_active_window.is_none()
            && self.last_extension_development_host_window.is_none()
            && self.opened_windows.is_empty()
    }
}

/// Persisted subset of a window record.
///
/// At most one of `workspace`, `folder_uri` and `backup_slot` is set; none
/// set means a truly empty window with nothing to restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_uri: Option<ResourceUri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_slot: Option<BackupSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_authority: Option<String>,
    pub ui_state: WindowGeometry,
}

impl WindowSnapshot {
    /// Snapshot of `record`, with `bounds` replacing its stored UI state
    pub fn from_record(record: &WindowRecord, bounds: Option<WindowGeometry>) -> Self {
        let mut snapshot = Self::for_content(&record.content, record.ui_state);
        if record.content.is_empty() {
            snapshot.backup_slot = record.backup_slot.clone();
        }
        snapshot.remote_authority = record.remote_authority.clone();
        if let Some(bounds) = bounds {
            snapshot.ui_state = bounds;
        }
        snapshot
    }

    pub fn for_content(content: &OpenedContent, ui_state: WindowGeometry) -> Self {
        let (workspace, folder_uri) = match content {
            OpenedContent::Workspace(identity) => (Some(identity.clone()), None),
            OpenedContent::Folder(uri) => (None, Some(uri.clone())),
            OpenedContent::Empty => (None, None),
        };
        Self {
            workspace,
            folder_uri,
            backup_slot: None,
            remote_authority: None,
            ui_state,
        }
    }

    /// What the snapshotted window showed
    pub fn content(&self) -> OpenedContent {
        if let Some(workspace) = &self.workspace {
            OpenedContent::Workspace(workspace.clone())
        } else if let Some(folder) = &self.folder_uri {
            OpenedContent::Folder(folder.clone())
        } else {
            OpenedContent::Empty
        }
    }

    /// Whether this snapshot names a workspace, a folder or a backup
    pub fn has_identity(&self) -> bool {
        self.workspace.is_some() || self.folder_uri.is_some() || self.backup_slot.is_some()
    }

    /// Same restorable identity as `other` (empty windows compare by slot)
    pub fn same_identity(&self, other: &WindowSnapshot) -> bool {
        match (&self.workspace, &other.workspace) {
            (Some(a), Some(b)) => return a == b,
            (Some(_), None) | (None, Some(_)) => return false,
            (None, None) => {}
        }
        match (&self.folder_uri, &other.folder_uri) {
            (Some(a), Some(b)) => return a == b,
            (Some(_), None) | (None, Some(_)) => return false,
            (None, None) => {}
        }
        self.backup_slot.is_some() && self.backup_slot == other.backup_slot
    }

    /// Enforce the single-identity rule on data read back from disk
    pub(crate) fn normalize(&mut self) {
        if self.workspace.is_some() {
            self.folder_uri = None;
            self.backup_slot = None;
        } else if self.folder_uri.is_some() {
            self.backup_slot = None;
        }
    }
}
