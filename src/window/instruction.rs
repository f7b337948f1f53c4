//! Instructions and load payloads sent from the orchestrator to the host.

use super::OpenedContent;
use crate::backups::BackupSlot;
use crate::orchestrator::WaitMarker;
use crate::uri::ResourceUri;

/// A file to show in a window, with an optional cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToOpen {
    pub uri: ResourceUri,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Files that travel together to one window
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileBatch {
    pub files: Vec<FileToOpen>,
    /// Exactly two files to compare side by side
    pub diff: Option<(FileToOpen, FileToOpen)>,
    pub remote_authority: Option<String>,
    /// Signalled when the receiving window closes or reloads
    pub wait_marker: Option<WaitMarker>,
}

impl FileBatch {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.diff.is_none()
    }

    pub fn len(&self) -> usize {
        self.files.len() + if self.diff.is_some() { 2 } else { 0 }
    }
}

/// Everything a window needs to (re)load its content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadPayload {
    pub content: OpenedContent,
    pub remote_authority: Option<String>,
    pub backup_slot: Option<BackupSlot>,
    pub files: Option<FileBatch>,
    pub extension_development_paths: Vec<ResourceUri>,
    pub extension_test_mode: bool,
    pub initial_startup: bool,
}

/// Message delivered to an existing window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowInstruction {
    /// Replace the window's content
    Load(LoadPayload),
    /// Show files in the window as it is
    OpenFiles(FileBatch),
    /// Add root folders to the window's workspace
    AddFolders(Vec<ResourceUri>),
}
