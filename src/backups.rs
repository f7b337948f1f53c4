//! Backup slots and an in-memory backup registry.
//!
//! A backup slot is the opaque key under which a window's unsaved editor
//! state is kept, so it can be recovered after a crash or hot exit.

use crate::traits::BackupRegistry;
use crate::uri::ResourceUri;
use crate::workspace::{WorkspaceId, WorkspaceIdentity};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a window's backup location
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupSlot(pub String);

impl BackupSlot {
    /// Fresh slot for a new empty window
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Slot for a workspace window
    pub fn for_workspace(id: &WorkspaceId) -> Self {
        Self(format!("workspace-{id}"))
    }

    /// Slot for a folder window
    pub fn for_folder(folder: &ResourceUri) -> Self {
        Self(format!(
            "folder-{}",
            WorkspaceId::for_folders(std::slice::from_ref(folder))
        ))
    }
}

impl fmt::Display for BackupSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backup registry held in memory; the host fills it from its backup store
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackups {
    pub folders: Vec<ResourceUri>,
    pub workspaces: Vec<WorkspaceIdentity>,
    pub empty_windows: Vec<BackupSlot>,
}

impl BackupRegistry for InMemoryBackups {
    fn folder_backups(&self) -> Vec<ResourceUri> {
        self.folders.clone()
    }

    fn workspace_backups(&self) -> Vec<WorkspaceIdentity> {
        self.workspaces.clone()
    }

    fn empty_window_backups(&self) -> Vec<BackupSlot> {
        self.empty_windows.clone()
    }
}
